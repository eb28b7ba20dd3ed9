//! User settings for the session controller.
//!
//! Settings live in the key-value store, one key per field, so that the
//! settings editor and the controller can update them independently. Missing
//! or unreadable keys fall back to defaults.
//!
//! Validation happens at the editing boundary ([`Settings::validate`]). The
//! controller additionally guards against invalid values that slipped
//! through by keeping the previous value ([`Settings::sanitized_against`]).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{StoreError, ValidationError};
use crate::platform::{normalize_hostname, KeyValueStore};
use crate::storage::keys;
use crate::timer::{ActiveWindow, SessionKind, TimeOfDay};

pub const DEFAULT_WORK_SECS: u64 = 25 * 60;
pub const DEFAULT_SHORT_BREAK_SECS: u64 = 5 * 60;
pub const DEFAULT_LONG_BREAK_SECS: u64 = 15 * 60;
pub const DEFAULT_CYCLES_UNTIL_LONG_BREAK: u32 = 4;

/// Settings keys accepted by [`Settings::set_field`].
pub const FIELD_NAMES: [&str; 6] = [
    "activeStart",
    "activeEnd",
    "workDuration",
    "shortBreakDuration",
    "longBreakDuration",
    "cyclesUntilLongBreak",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub active_start: TimeOfDay,
    pub active_end: TimeOfDay,
    /// Seconds.
    pub work_duration: u64,
    /// Seconds.
    pub short_break_duration: u64,
    /// Seconds.
    pub long_break_duration: u64,
    pub cycles_until_long_break: u32,
    /// Normalised hostnames, unique, in insertion order.
    pub distracting_sites: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            active_start: TimeOfDay::at_hour(9),
            active_end: TimeOfDay::at_hour(17),
            work_duration: DEFAULT_WORK_SECS,
            short_break_duration: DEFAULT_SHORT_BREAK_SECS,
            long_break_duration: DEFAULT_LONG_BREAK_SECS,
            cycles_until_long_break: DEFAULT_CYCLES_UNTIL_LONG_BREAK,
            distracting_sites: Vec::new(),
        }
    }
}

fn read_or<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    default: T,
) -> Result<T, StoreError> {
    match store.get(key)? {
        Some(value) => match serde_json::from_value(value) {
            Ok(v) => Ok(v),
            Err(e) => {
                debug!(key, error = %e, "unreadable setting, using default");
                Ok(default)
            }
        },
        None => Ok(default),
    }
}

fn to_value<T: Serialize>(key: &str, value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Codec {
        key: key.to_string(),
        message: e.to_string(),
    })
}

impl Settings {
    /// Read every field from the store, defaulting the missing ones.
    ///
    /// # Errors
    /// Returns an error only if the store itself fails.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, StoreError> {
        let d = Self::default();
        let stored: Vec<String> = read_or(store, keys::DISTRACTING_SITES, d.distracting_sites)?;
        let mut seen = std::collections::HashSet::new();
        let sites: Vec<String> = stored
            .iter()
            .filter_map(|site| match normalize_hostname(site) {
                Ok(host) => Some(host),
                Err(e) => {
                    debug!(site = %site, error = %e, "dropping unusable stored site");
                    None
                }
            })
            .filter(|host| seen.insert(host.clone()))
            .collect();

        Ok(Self {
            active_start: read_or(store, keys::ACTIVE_START, d.active_start)?,
            active_end: read_or(store, keys::ACTIVE_END, d.active_end)?,
            work_duration: read_or(store, keys::WORK_DURATION, d.work_duration)?,
            short_break_duration: read_or(store, keys::SHORT_BREAK_DURATION, d.short_break_duration)?,
            long_break_duration: read_or(store, keys::LONG_BREAK_DURATION, d.long_break_duration)?,
            cycles_until_long_break: read_or(
                store,
                keys::CYCLES_UNTIL_LONG_BREAK,
                d.cycles_until_long_break,
            )?,
            distracting_sites: sites,
        })
    }

    /// Write every field to the store.
    ///
    /// # Errors
    /// Returns the first store failure; earlier keys stay written.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StoreError> {
        store.set(keys::ACTIVE_START, to_value(keys::ACTIVE_START, &self.active_start)?)?;
        store.set(keys::ACTIVE_END, to_value(keys::ACTIVE_END, &self.active_end)?)?;
        store.set(keys::WORK_DURATION, Value::from(self.work_duration))?;
        store.set(keys::SHORT_BREAK_DURATION, Value::from(self.short_break_duration))?;
        store.set(keys::LONG_BREAK_DURATION, Value::from(self.long_break_duration))?;
        store.set(keys::CYCLES_UNTIL_LONG_BREAK, Value::from(self.cycles_until_long_break))?;
        store.set(
            keys::DISTRACTING_SITES,
            to_value(keys::DISTRACTING_SITES, &self.distracting_sites)?,
        )?;
        Ok(())
    }

    /// Check the whole record as the settings editor would.
    pub fn validate(&self, max_sites: usize) -> Result<(), ValidationError> {
        ActiveWindow::new(self.active_start, self.active_end)?;
        for (field, value) in [
            ("workDuration", self.work_duration),
            ("shortBreakDuration", self.short_break_duration),
            ("longBreakDuration", self.long_break_duration),
            ("cyclesUntilLongBreak", u64::from(self.cycles_until_long_break)),
        ] {
            if value == 0 {
                return Err(ValidationError::NonPositive {
                    field: field.to_string(),
                });
            }
        }
        if self.distracting_sites.len() > max_sites {
            return Err(ValidationError::TooManySites { max: max_sites });
        }
        Ok(())
    }

    /// Replace every invalid field with the value from `prior`.
    pub fn sanitized_against(mut self, prior: &Settings) -> Settings {
        if self.work_duration == 0 {
            warn!("ignoring zero work duration");
            self.work_duration = prior.work_duration;
        }
        if self.short_break_duration == 0 {
            warn!("ignoring zero short break duration");
            self.short_break_duration = prior.short_break_duration;
        }
        if self.long_break_duration == 0 {
            warn!("ignoring zero long break duration");
            self.long_break_duration = prior.long_break_duration;
        }
        if self.cycles_until_long_break == 0 {
            warn!("ignoring zero cycles until long break");
            self.cycles_until_long_break = prior.cycles_until_long_break;
        }
        if self.active_end <= self.active_start {
            warn!(start = %self.active_start, end = %self.active_end, "ignoring inverted active window");
            self.active_start = prior.active_start;
            self.active_end = prior.active_end;
        }
        self
    }

    pub fn window(&self) -> ActiveWindow {
        ActiveWindow {
            start: self.active_start,
            end: self.active_end,
        }
    }

    /// Planned length of a segment of `kind`, in seconds.
    pub fn duration_for(&self, kind: SessionKind) -> u64 {
        match kind {
            SessionKind::Work => self.work_duration,
            SessionKind::ShortBreak => self.short_break_duration,
            SessionKind::LongBreak => self.long_break_duration,
        }
    }

    pub fn is_distracting(&self, host: &str) -> bool {
        self.distracting_sites.iter().any(|s| s == host)
    }

    /// Update one scalar field from its string form.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), ValidationError> {
        let positive = |field: &str| -> Result<u64, ValidationError> {
            match value.trim().parse::<u64>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(ValidationError::NonPositive {
                    field: field.to_string(),
                }),
            }
        };
        match key {
            "activeStart" => self.active_start = value.parse()?,
            "activeEnd" => self.active_end = value.parse()?,
            "workDuration" => self.work_duration = positive(key)?,
            "shortBreakDuration" => self.short_break_duration = positive(key)?,
            "longBreakDuration" => self.long_break_duration = positive(key)?,
            "cyclesUntilLongBreak" => {
                self.cycles_until_long_break = u32::try_from(positive(key)?).map_err(|_| {
                    ValidationError::NonPositive {
                        field: key.to_string(),
                    }
                })?
            }
            other => return Err(ValidationError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Add a hostname to the denylist. Returns `false` if it was already there.
    pub fn add_site(&mut self, raw: &str, max_sites: usize) -> Result<bool, ValidationError> {
        let host = normalize_hostname(raw)?;
        if self.is_distracting(&host) {
            return Ok(false);
        }
        if self.distracting_sites.len() >= max_sites {
            return Err(ValidationError::TooManySites { max: max_sites });
        }
        self.distracting_sites.push(host);
        Ok(true)
    }

    /// Remove a hostname from the denylist. Returns `false` if it was absent.
    pub fn remove_site(&mut self, raw: &str) -> bool {
        let host = normalize_hostname(raw).unwrap_or_else(|_| raw.trim().to_string());
        let before = self.distracting_sites.len();
        self.distracting_sites.retain(|s| *s != host);
        before != self.distracting_sites.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn load_from_empty_store_yields_defaults() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store).unwrap(), Settings::default());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let store = MemoryStore::new();
        let mut s = Settings::default();
        s.set_field("activeStart", "07:30").unwrap();
        s.set_field("workDuration", "3000").unwrap();
        s.add_site("youtube.com", 10).unwrap();
        s.add_site("https://www.reddit.com/", 10).unwrap();
        s.save(&store).unwrap();

        assert_eq!(Settings::load(&store).unwrap(), s);
    }

    #[test]
    fn unreadable_key_falls_back_to_default() {
        let store = MemoryStore::new();
        store.set(keys::WORK_DURATION, Value::from("soon")).unwrap();
        store.set(keys::SHORT_BREAK_DURATION, Value::from(120)).unwrap();
        let s = Settings::load(&store).unwrap();
        assert_eq!(s.work_duration, DEFAULT_WORK_SECS);
        assert_eq!(s.short_break_duration, 120);
    }

    #[test]
    fn load_drops_duplicate_sites() {
        let store = MemoryStore::new();
        store
            .set(
                keys::DISTRACTING_SITES,
                serde_json::json!(["a.com", "b.com", "a.com"]),
            )
            .unwrap();
        let s = Settings::load(&store).unwrap();
        assert_eq!(s.distracting_sites, vec!["a.com", "b.com"]);
    }

    #[test]
    fn load_normalizes_hand_edited_sites() {
        let store = MemoryStore::new();
        store
            .set(
                keys::DISTRACTING_SITES,
                serde_json::json!(["www.YouTube.com", "youtube.com", "not a host", "https://Reddit.com/r/rust"]),
            )
            .unwrap();
        let s = Settings::load(&store).unwrap();
        assert_eq!(s.distracting_sites, vec!["youtube.com", "reddit.com"]);
        assert!(s.is_distracting("youtube.com"));
    }

    #[test]
    fn validate_rejects_bad_input() {
        let mut s = Settings::default();
        s.work_duration = 0;
        assert!(matches!(s.validate(20), Err(ValidationError::NonPositive { .. })));

        let mut s = Settings::default();
        s.active_end = s.active_start;
        assert!(matches!(
            s.validate(20),
            Err(ValidationError::InvalidTimeRange { .. })
        ));

        assert!(Settings::default().validate(20).is_ok());
    }

    #[test]
    fn set_field_rejects_non_positive_and_unknown() {
        let mut s = Settings::default();
        assert!(s.set_field("workDuration", "0").is_err());
        assert!(s.set_field("workDuration", "-5").is_err());
        assert!(s.set_field("colour", "blue").is_err());
        assert_eq!(s.work_duration, DEFAULT_WORK_SECS);
    }

    #[test]
    fn sanitized_keeps_prior_values_for_invalid_fields() {
        let prior = Settings::default();
        let mut incoming = Settings::default();
        incoming.work_duration = 0;
        incoming.long_break_duration = 1200;
        incoming.active_start = TimeOfDay::new(18, 0).unwrap();
        let s = incoming.sanitized_against(&prior);
        assert_eq!(s.work_duration, prior.work_duration);
        assert_eq!(s.long_break_duration, 1200);
        assert_eq!(s.active_start, prior.active_start);
    }

    #[test]
    fn site_cap_is_enforced() {
        let mut s = Settings::default();
        assert!(s.add_site("a.com", 1).unwrap());
        assert!(!s.add_site("a.com", 1).unwrap());
        assert_eq!(s.add_site("b.com", 1), Err(ValidationError::TooManySites { max: 1 }));
        assert!(s.remove_site("www.a.com"));
        assert!(!s.remove_site("a.com"));
    }
}
