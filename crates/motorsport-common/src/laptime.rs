//! Lap time parsing and formatting with millisecond precision.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::MotorsportError;

/// A lap duration in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LapTime {
    millis: u64,
}

impl LapTime {
    pub fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.millis as f64 / 1000.0
    }

    /// Time gap to a faster reference lap. Saturates at zero.
    pub fn delta_from(&self, reference: LapTime) -> LapTime {
        LapTime::from_millis(self.millis.saturating_sub(reference.millis))
    }

    /// Parse an optional upstream time field; empty strings mean "no time set".
    pub fn parse_optional(raw: Option<&str>) -> Option<LapTime> {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse().ok())
    }
}

impl FromStr for LapTime {
    type Err = MotorsportError;

    /// Accepts `m:ss.fff`, `ss.fff` and fewer fractional digits (`1:23.4`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MotorsportError::InvalidParameter {
            param: "lap_time".to_string(),
            message: format!("cannot parse '{}'", s),
        };

        let trimmed = s.trim();
        let (minutes, rest) = match trimmed.split_once(':') {
            Some((m, rest)) => (m.parse::<u64>().map_err(|_| invalid())?, rest),
            None => (0, trimmed),
        };

        let (seconds, fraction) = match rest.split_once('.') {
            Some((sec, frac)) => (sec, frac),
            None => (rest, ""),
        };

        let seconds = seconds.parse::<u64>().map_err(|_| invalid())?;
        if minutes > 0 && seconds >= 60 {
            return Err(invalid());
        }

        if fraction.len() > 3 || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let millis = if fraction.is_empty() {
            0
        } else {
            let padded = format!("{:0<3}", fraction);
            padded.parse::<u64>().map_err(|_| invalid())?
        };

        Ok(LapTime::from_millis((minutes * 60 + seconds) * 1000 + millis))
    }
}

impl fmt::Display for LapTime {
    /// Formats as `m:ss.fff`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.millis / 60_000;
        let seconds = (self.millis / 1000) % 60;
        let millis = self.millis % 1000;
        write!(f, "{}:{:02}.{:03}", minutes, seconds, millis)
    }
}

impl Serialize for LapTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
