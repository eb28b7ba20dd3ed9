//! Persisted session log and countdown snapshot.
//!
//! The log is a single JSON array under [`keys::SESSION_LOG`]. Every append
//! reads the array, pushes the new entry, prunes by age and writes the whole
//! array back. There is no locking: the controller is the only writer.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::keys;
use crate::error::StoreError;
use crate::platform::KeyValueStore;
use crate::timer::SessionKind;

fn default_true() -> bool {
    true
}

/// One finished (or abandoned) segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLogEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    /// Local calendar date the segment ended on.
    pub date: NaiveDate,
    pub started_at: DateTime<FixedOffset>,
    pub ended_at: DateTime<FixedOffset>,
    /// Seconds.
    pub planned_duration: u64,
    /// Wall-clock seconds between start and end, timeouts included.
    pub actual_duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_count: Option<u32>,
    #[serde(
        default,
        alias = "totalAdHocTimeoutDuration",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout_total_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distractions: Option<BTreeMap<String, u64>>,
    /// False when the segment was cut short by the end of the active window.
    #[serde(default = "default_true")]
    pub completed: bool,
}

impl SessionLogEntry {
    pub fn distraction_total(&self) -> u64 {
        self.distractions
            .as_ref()
            .map(|d| d.values().sum())
            .unwrap_or(0)
    }
}

/// The countdown as it stood at the last tick, for restart recovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownSnapshot {
    pub kind: SessionKind,
    pub remaining_seconds: u64,
    pub saved_at: DateTime<FixedOffset>,
}

impl CountdownSnapshot {
    /// Read the snapshot, treating an unreadable value as absent.
    pub fn load(store: &dyn KeyValueStore) -> Result<Option<Self>, StoreError> {
        Ok(store
            .get(keys::COUNTDOWN_SNAPSHOT)?
            .and_then(|v| serde_json::from_value(v).ok()))
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StoreError> {
        let value = serde_json::to_value(self).map_err(|e| StoreError::Codec {
            key: keys::COUNTDOWN_SNAPSHOT.to_string(),
            message: e.to_string(),
        })?;
        store.set(keys::COUNTDOWN_SNAPSHOT, value)
    }

    pub fn clear(store: &dyn KeyValueStore) -> Result<(), StoreError> {
        store.remove(keys::COUNTDOWN_SNAPSHOT)
    }
}

/// All log entries, oldest first. Malformed entries are skipped.
pub fn load(store: &dyn KeyValueStore) -> Result<Vec<SessionLogEntry>, StoreError> {
    let Some(value) = store.get(keys::SESSION_LOG)? else {
        return Ok(Vec::new());
    };
    let Value::Array(items) = value else {
        debug!("session log is not an array, ignoring it");
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "skipping malformed session log entry");
                None
            }
        })
        .collect())
}

/// Keep only entries dated within the last `days` days of `today`.
pub fn prune(entries: &mut Vec<SessionLogEntry>, today: NaiveDate, days: u32) {
    let cutoff = today - Duration::days(i64::from(days));
    entries.retain(|e| e.date > cutoff);
}

/// Append `entry`, prune to `retention_days` (if any) and write back.
///
/// # Errors
/// Returns an error if the store read or write fails; the entry is lost.
pub fn append(
    store: &dyn KeyValueStore,
    entry: SessionLogEntry,
    retention_days: Option<u32>,
) -> Result<(), StoreError> {
    let mut entries = load(store)?;
    let today = entry.date;
    entries.push(entry);
    if let Some(days) = retention_days {
        prune(&mut entries, today, days);
    }
    let value = serde_json::to_value(&entries).map_err(|e| StoreError::Codec {
        key: keys::SESSION_LOG.to_string(),
        message: e.to_string(),
    })?;
    store.set(keys::SESSION_LOG, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;
    use chrono::TimeZone;

    fn entry(date: NaiveDate) -> SessionLogEntry {
        let at = FixedOffset::east_opt(0)
            .unwrap()
            .from_local_datetime(&date.and_hms_opt(10, 0, 0).unwrap())
            .unwrap();
        SessionLogEntry {
            id: format!("e-{date}"),
            kind: SessionKind::Work,
            date,
            started_at: at,
            ended_at: at + Duration::minutes(25),
            planned_duration: 1500,
            actual_duration: 1500,
            timeout_count: Some(0),
            timeout_total_seconds: Some(0),
            distractions: None,
            completed: true,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn append_creates_and_grows_log() {
        let store = MemoryStore::new();
        append(&store, entry(day(1)), None).unwrap();
        append(&store, entry(day(2)), None).unwrap();
        let log = load(&store).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].date, day(2));
    }

    #[test]
    fn retention_prunes_old_days() {
        let store = MemoryStore::new();
        append(&store, entry(day(1)), None).unwrap();
        append(&store, entry(day(5)), None).unwrap();
        append(&store, entry(day(11)), Some(10)).unwrap();
        let dates: Vec<_> = load(&store).unwrap().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(5), day(11)]);
    }

    #[test]
    fn entries_use_camel_case_and_type_tag() {
        let json = serde_json::to_value(entry(day(3))).unwrap();
        assert_eq!(json["type"], "WORK");
        assert_eq!(json["plannedDuration"], 1500);
        assert_eq!(json["date"], "2026-10-03");
        assert!(json.get("distractions").is_none());
    }

    #[test]
    fn legacy_timeout_field_name_is_accepted() {
        let mut json = serde_json::to_value(entry(day(3))).unwrap();
        let obj = json.as_object_mut().unwrap();
        obj.remove("timeoutTotalSeconds");
        obj.remove("completed");
        obj.insert("totalAdHocTimeoutDuration".into(), Value::from(90));
        let parsed: SessionLogEntry = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.timeout_total_seconds, Some(90));
        assert!(parsed.completed);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let store = MemoryStore::new();
        let good = serde_json::to_value(entry(day(2))).unwrap();
        store
            .set(keys::SESSION_LOG, serde_json::json!([{"junk": true}, good]))
            .unwrap();
        assert_eq!(load(&store).unwrap().len(), 1);
    }

    #[test]
    fn snapshot_roundtrip_and_clear() {
        let store = MemoryStore::new();
        let snap = CountdownSnapshot {
            kind: SessionKind::ShortBreak,
            remaining_seconds: 120,
            saved_at: entry(day(1)).started_at,
        };
        snap.save(&store).unwrap();
        assert_eq!(CountdownSnapshot::load(&store).unwrap(), Some(snap));
        CountdownSnapshot::clear(&store).unwrap();
        assert_eq!(CountdownSnapshot::load(&store).unwrap(), None);
    }
}
