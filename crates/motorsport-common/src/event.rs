//! Event identifiers: a round number or a (fuzzy) event name.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifies an event within a season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRef {
    /// Round number within the season (1-based).
    Round(u32),
    /// Free-form name matched against race name, country, locality or circuit.
    Name(String),
}

impl EventRef {
    /// Parse user input. Positive integers are rounds, anything else is a name.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<u32>() {
            Ok(round) if round > 0 => EventRef::Round(round),
            _ => EventRef::Name(trimmed.to_string()),
        }
    }

    /// Check whether this reference names an event described by `fields`.
    ///
    /// Matching is case-insensitive and ignores diacritics, so "Sao Paulo"
    /// matches "São Paulo Grand Prix".
    pub fn matches_any(&self, fields: &[&str]) -> bool {
        match self {
            EventRef::Round(_) => false,
            EventRef::Name(name) => {
                let needle = fold_name(name);
                if needle.is_empty() {
                    return false;
                }
                fields.iter().any(|field| fold_name(field).contains(&needle))
            }
        }
    }
}

impl fmt::Display for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventRef::Round(round) => write!(f, "{}", round),
            EventRef::Name(name) => f.write_str(name),
        }
    }
}

impl Serialize for EventRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EventRef::Round(round) => serializer.serialize_u32(*round),
            EventRef::Name(name) => serializer.serialize_str(name),
        }
    }
}

impl<'de> Deserialize<'de> for EventRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(0) => Err(serde::de::Error::custom("round numbers start at 1")),
            Raw::Number(round) => Ok(EventRef::Round(round)),
            Raw::Text(text) => Ok(EventRef::parse(&text)),
        }
    }
}

/// Lower-case, strip diacritics and collapse non-alphanumerics to single spaces.
pub fn fold_name(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    for ch in input.chars().flat_map(char::to_lowercase) {
        let folded = fold_char(ch);
        if folded.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(folded);
        } else {
            pending_space = true;
        }
    }

    out
}

fn fold_char(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_and_name() {
        assert_eq!(EventRef::parse("21"), EventRef::Round(21));
        assert_eq!(EventRef::parse("0"), EventRef::Name("0".into()));
        assert_eq!(EventRef::parse(" Monza "), EventRef::Name("Monza".into()));
    }

    #[test]
    fn test_fold_name() {
        assert_eq!(fold_name("São Paulo Grand Prix"), "sao paulo grand prix");
        assert_eq!(fold_name("  Emilia-Romagna  "), "emilia romagna");
    }

    #[test]
    fn test_matches_any_ignores_accents() {
        let event = EventRef::parse("Sao Paulo");
        assert!(event.matches_any(&["São Paulo Grand Prix", "Brazil"]));
        assert!(!event.matches_any(&["Mexico City Grand Prix", "Mexico"]));
        assert!(!EventRef::Round(3).matches_any(&["3"]));
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let round: EventRef = serde_json::from_str("5").unwrap();
        assert_eq!(round, EventRef::Round(5));
        let name: EventRef = serde_json::from_str("\"Silverstone\"").unwrap();
        assert_eq!(name, EventRef::Name("Silverstone".into()));
        let numeric_text: EventRef = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(numeric_text, EventRef::Round(12));
        assert!(serde_json::from_str::<EventRef>("0").is_err());
    }
}
