//! Daily active-hours window.
//!
//! Times of day are persisted as zero-padded `HH:MM` strings, so their
//! lexical order matches their chronological order. Internally they are
//! parsed into [`NaiveTime`] and compared numerically.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A wall-clock time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Whole hour, wrapping past midnight.
    pub fn at_hour(hour: u32) -> Self {
        Self(NaiveTime::default() + Duration::hours(i64::from(hour % 24)))
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Exactly HH:MM; chrono alone would also accept "9:5".
        if trimmed.len() != 5 {
            return Err(ValidationError::InvalidTimeOfDay(s.to_string()));
        }
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map(Self)
            .map_err(|_| ValidationError::InvalidTimeOfDay(s.to_string()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The half-open daily range `[start, end)` during which the timer may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl ActiveWindow {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, at: NaiveTime) -> bool {
        self.start.time() <= at && at < self.end.time()
    }

    /// Instants at which being inside/outside the window can flip.
    pub fn boundaries(&self) -> [NaiveTime; 2] {
        [self.start.time(), self.end.time()]
    }
}

impl fmt::Display for ActiveWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn parses_and_formats_hh_mm() {
        let tod: TimeOfDay = "09:05".parse().unwrap();
        assert_eq!(tod.to_string(), "09:05");
        assert!("9:05".parse::<TimeOfDay>().is_err());
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("noon".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn ordering_matches_lexical_order() {
        let a: TimeOfDay = "08:59".parse().unwrap();
        let b: TimeOfDay = "17:00".parse().unwrap();
        assert!(a < b);
        assert!("08:59" < "17:00");
    }

    #[test]
    fn window_is_half_open() {
        let w = ActiveWindow::new("09:00".parse().unwrap(), "17:00".parse().unwrap()).unwrap();
        assert!(!w.contains(t(8, 59, 59)));
        assert!(w.contains(t(9, 0, 0)));
        assert!(w.contains(t(16, 59, 59)));
        assert!(!w.contains(t(17, 0, 0)));
    }

    #[test]
    fn window_rejects_inverted_range() {
        let err = ActiveWindow::new("17:00".parse().unwrap(), "09:00".parse().unwrap());
        assert!(matches!(err, Err(ValidationError::InvalidTimeRange { .. })));
        assert!(ActiveWindow::new("09:00".parse().unwrap(), "09:00".parse().unwrap()).is_err());
    }

    #[test]
    fn serde_uses_string_form() {
        let tod = TimeOfDay::new(7, 30).unwrap();
        assert_eq!(serde_json::to_string(&tod).unwrap(), "\"07:30\"");
        let back: TimeOfDay = serde_json::from_str("\"07:30\"").unwrap();
        assert_eq!(back, tod);
    }
}
