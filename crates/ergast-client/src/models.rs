//! Response models for the Ergast JSON API.
//!
//! Ergast encodes every number as a string. Fields that callers compute with
//! are decoded into numbers; identifiers and free text stay as strings.

use serde::{Deserialize, Deserializer};

use motorsport_common::LapTime;

/// Top-level envelope shared by every Ergast response.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "MRData")]
    pub mr_data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RaceTableData {
    #[serde(rename = "RaceTable")]
    pub race_table: RaceTable,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RaceTable {
    #[serde(rename = "Races", default)]
    pub races: Vec<Race>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandingsTableData {
    #[serde(rename = "StandingsTable")]
    pub standings_table: StandingsTable,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandingsTable {
    #[serde(rename = "StandingsLists", default)]
    pub standings_lists: Vec<StandingsList>,
}

/// One event of a season, optionally carrying a session classification.
#[derive(Debug, Clone, Deserialize)]
pub struct Race {
    #[serde(deserialize_with = "de_number")]
    pub season: i32,
    #[serde(deserialize_with = "de_number")]
    pub round: u32,
    #[serde(rename = "raceName")]
    pub race_name: String,
    #[serde(rename = "Circuit")]
    pub circuit: Circuit,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "Results", default)]
    pub results: Vec<RaceResult>,
    #[serde(rename = "SprintResults", default)]
    pub sprint_results: Vec<RaceResult>,
    #[serde(rename = "QualifyingResults", default)]
    pub qualifying_results: Vec<QualifyingResult>,
}

impl Race {
    /// Text fields an event name is matched against.
    pub fn match_fields(&self) -> [&str; 4] {
        [
            self.race_name.as_str(),
            self.circuit.location.country.as_str(),
            self.circuit.location.locality.as_str(),
            self.circuit.circuit_name.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Circuit {
    #[serde(rename = "circuitId")]
    pub circuit_id: String,
    #[serde(rename = "circuitName")]
    pub circuit_name: String,
    #[serde(rename = "Location")]
    pub location: Location,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub locality: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Driver {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    #[serde(rename = "permanentNumber", default)]
    pub permanent_number: Option<String>,
    /// Three-letter abbreviation. Missing for some historic drivers.
    #[serde(default)]
    pub code: Option<String>,
    #[serde(rename = "givenName")]
    pub given_name: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
    #[serde(default)]
    pub nationality: Option<String>,
}

impl Driver {
    /// Abbreviation, derived from the family name when upstream has none.
    pub fn abbreviation(&self) -> String {
        match &self.code {
            Some(code) if !code.is_empty() => code.clone(),
            _ => self
                .family_name
                .chars()
                .filter(|c| c.is_alphabetic())
                .take(3)
                .collect::<String>()
                .to_uppercase(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Constructor {
    #[serde(rename = "constructorId")]
    pub constructor_id: String,
    pub name: String,
    #[serde(default)]
    pub nationality: Option<String>,
}

/// Finishing time of a classified driver. Only set for drivers on the lead lap.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultTime {
    #[serde(default, deserialize_with = "de_opt_number")]
    pub millis: Option<u64>,
    pub time: String,
}

/// Classification row of a race or sprint.
#[derive(Debug, Clone, Deserialize)]
pub struct RaceResult {
    #[serde(deserialize_with = "de_number")]
    pub position: u32,
    #[serde(rename = "positionText")]
    pub position_text: String,
    #[serde(deserialize_with = "de_number")]
    pub points: f64,
    #[serde(rename = "Driver")]
    pub driver: Driver,
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub grid: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub laps: Option<u32>,
    pub status: String,
    #[serde(rename = "Time", default)]
    pub time: Option<ResultTime>,
}

/// Classification row of a qualifying session.
#[derive(Debug, Clone, Deserialize)]
pub struct QualifyingResult {
    #[serde(deserialize_with = "de_number")]
    pub position: u32,
    #[serde(rename = "Driver")]
    pub driver: Driver,
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
    #[serde(rename = "Q1", default)]
    pub q1: Option<String>,
    #[serde(rename = "Q2", default)]
    pub q2: Option<String>,
    #[serde(rename = "Q3", default)]
    pub q3: Option<String>,
}

impl QualifyingResult {
    /// Fastest lap across Q1, Q2 and Q3, if the driver set a time.
    pub fn fastest_lap(&self) -> Option<LapTime> {
        [&self.q1, &self.q2, &self.q3]
            .into_iter()
            .filter_map(|q| LapTime::parse_optional(q.as_deref()))
            .min()
    }
}

/// Standings after a given round.
#[derive(Debug, Clone, Deserialize)]
pub struct StandingsList {
    #[serde(deserialize_with = "de_number")]
    pub season: i32,
    #[serde(deserialize_with = "de_number")]
    pub round: u32,
    #[serde(rename = "DriverStandings", default)]
    pub driver_standings: Vec<DriverStanding>,
    #[serde(rename = "ConstructorStandings", default)]
    pub constructor_standings: Vec<ConstructorStanding>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriverStanding {
    /// Absent for drivers excluded from the classification.
    #[serde(default, deserialize_with = "de_opt_number")]
    pub position: Option<u32>,
    #[serde(rename = "positionText")]
    pub position_text: String,
    #[serde(deserialize_with = "de_number")]
    pub points: f64,
    #[serde(deserialize_with = "de_number")]
    pub wins: u32,
    #[serde(rename = "Driver")]
    pub driver: Driver,
    #[serde(rename = "Constructors", default)]
    pub constructors: Vec<Constructor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConstructorStanding {
    #[serde(default, deserialize_with = "de_opt_number")]
    pub position: Option<u32>,
    #[serde(rename = "positionText")]
    pub position_text: String,
    #[serde(deserialize_with = "de_number")]
    pub points: f64,
    #[serde(deserialize_with = "de_number")]
    pub wins: u32,
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl StringOrNumber {
    fn into_text(self) -> String {
        match self {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn de_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = StringOrNumber::deserialize(deserializer)?.into_text();
    raw.trim().parse::<T>().map_err(serde::de::Error::custom)
}

fn de_opt_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
{
    let raw = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| r.into_text().trim().parse::<T>().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver_json(code: Option<&str>) -> serde_json::Value {
        let mut driver = serde_json::json!({
            "driverId": "hamilton",
            "givenName": "Lewis",
            "familyName": "Hamilton",
            "nationality": "British"
        });
        if let Some(code) = code {
            driver["code"] = serde_json::Value::String(code.to_string());
        }
        driver
    }

    #[test]
    fn test_abbreviation_falls_back_to_family_name() {
        let with_code: Driver = serde_json::from_value(driver_json(Some("HAM"))).unwrap();
        assert_eq!(with_code.abbreviation(), "HAM");

        let without: Driver = serde_json::from_value(driver_json(None)).unwrap();
        assert_eq!(without.abbreviation(), "HAM");
        assert_eq!(without.full_name(), "Lewis Hamilton");
    }

    #[test]
    fn test_qualifying_fastest_lap_takes_minimum() {
        let row: QualifyingResult = serde_json::from_value(serde_json::json!({
            "number": "44",
            "position": "3",
            "Driver": driver_json(Some("HAM")),
            "Constructor": {"constructorId": "ferrari", "name": "Ferrari"},
            "Q1": "1:30.100",
            "Q2": "1:29.800",
            "Q3": "1:29.950"
        }))
        .unwrap();
        assert_eq!(row.fastest_lap(), Some(LapTime::from_millis(89_800)));
    }

    #[test]
    fn test_qualifying_without_time() {
        let row: QualifyingResult = serde_json::from_value(serde_json::json!({
            "position": "20",
            "Driver": driver_json(Some("HAM")),
            "Constructor": {"constructorId": "ferrari", "name": "Ferrari"},
            "Q1": ""
        }))
        .unwrap();
        assert_eq!(row.fastest_lap(), None);
    }

    #[test]
    fn test_numbers_decoded_from_strings() {
        let standing: DriverStanding = serde_json::from_value(serde_json::json!({
            "positionText": "-",
            "points": "12.5",
            "wins": "0",
            "Driver": driver_json(Some("HAM")),
            "Constructors": []
        }))
        .unwrap();
        assert_eq!(standing.position, None);
        assert_eq!(standing.points, 12.5);
        assert_eq!(standing.wins, 0);
    }
}
