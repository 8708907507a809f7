//! Session kinds within a race weekend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MotorsportError;

/// A classified session of a race weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionKind {
    #[default]
    Race,
    Qualifying,
    Sprint,
}

impl SessionKind {
    /// Display name, as used in response `event` labels.
    pub fn name(&self) -> &'static str {
        match self {
            SessionKind::Race => "Race",
            SessionKind::Qualifying => "Qualifying",
            SessionKind::Sprint => "Sprint",
        }
    }

    /// Ergast resource holding this session's classification.
    pub fn ergast_resource(&self) -> &'static str {
        match self {
            SessionKind::Race => "results",
            SessionKind::Qualifying => "qualifying",
            SessionKind::Sprint => "sprint",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SessionKind {
    type Err = MotorsportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "race" => Ok(SessionKind::Race),
            "q" | "quali" | "qualifying" => Ok(SessionKind::Qualifying),
            "s" | "sprint" => Ok(SessionKind::Sprint),
            _ => Err(MotorsportError::UnknownSession(s.to_string())),
        }
    }
}

impl Serialize for SessionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for SessionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
