//! In-memory collaborators.
//!
//! Used by the test suites to drive the controller deterministically, and by
//! the CLI host for the pieces that have no durable counterpart (the
//! reported tab hostname).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use serde_json::Value;

use super::{ActivityProbe, Clock, KeyValueStore, Notifier, Scheduler};
use crate::error::StoreError;
use crate::events::Notification;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl ManualClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Clock fixed at a naive local timestamp, interpreted at UTC+0.
    pub fn from_local(local: NaiveDateTime) -> Self {
        Self::new(Utc.fix().from_utc_datetime(&local))
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = lock(&self.now);
        *now += Duration::seconds(secs);
    }

    /// Move to `time` on the current date.
    pub fn set_time(&self, time: NaiveTime) {
        let mut now = lock(&self.now);
        let local = now.date_naive().and_time(time);
        if let Some(moved) = now.offset().from_local_datetime(&local).single() {
            *now = moved;
        }
    }

    pub fn set(&self, at: DateTime<FixedOffset>) {
        *lock(&self.now) = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *lock(&self.now)
    }
}

/// HashMap-backed store with a switch to simulate write outages.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every `set`/`remove` fails with [`StoreError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        lock(&self.values).contains_key(key)
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.check_writable()?;
        lock(&self.values).insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        lock(&self.values).remove(key);
        Ok(())
    }
}

/// Keeps every notification it is handed.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.sent).clone()
    }

    pub fn clear(&self) {
        lock(&self.sent).clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        lock(&self.sent).push(notification.clone());
    }
}

/// Records what the controller asked of the scheduler without firing anything.
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    ticking: AtomicBool,
    starts: AtomicUsize,
    daily: Mutex<Vec<NaiveTime>>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking.load(Ordering::SeqCst)
    }

    /// Number of `start_ticking` calls so far.
    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn daily_times(&self) -> Vec<NaiveTime> {
        lock(&self.daily).clone()
    }
}

impl Scheduler for RecordingScheduler {
    fn start_ticking(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.ticking.store(true, Ordering::SeqCst);
    }

    fn stop_ticking(&self) {
        self.ticking.store(false, Ordering::SeqCst);
    }

    fn schedule_daily(&self, at: NaiveTime) {
        lock(&self.daily).push(at);
    }

    fn cancel_daily(&self) {
        lock(&self.daily).clear();
    }
}

/// Probe answering with whatever hostname the host last reported.
#[derive(Debug, Default)]
pub struct ReportedProbe {
    host: Mutex<Option<String>>,
}

impl ReportedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, host: Option<&str>) {
        *lock(&self.host) = host.map(str::to_string);
    }
}

impl ActivityProbe for ReportedProbe {
    fn active_hostname(&self) -> Option<String> {
        lock(&self.host).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::from_local(noon());
        clock.advance_secs(90);
        assert_eq!(clock.now().time(), NaiveTime::from_hms_opt(12, 1, 30).unwrap());
    }

    #[test]
    fn manual_clock_set_time_keeps_date() {
        let clock = ManualClock::from_local(noon());
        clock.set_time(NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(clock.now().date_naive(), noon().date());
        assert_eq!(clock.now().time(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    }

    #[test]
    fn memory_store_can_refuse_writes() {
        let store = MemoryStore::new();
        store.set("a", Value::from(1)).unwrap();
        store.set_fail_writes(true);
        assert!(store.set("a", Value::from(2)).is_err());
        assert_eq!(store.get("a").unwrap(), Some(Value::from(1)));
    }

    #[test]
    fn recording_scheduler_tracks_ticking() {
        let sched = RecordingScheduler::new();
        sched.start_ticking();
        sched.stop_ticking();
        sched.start_ticking();
        assert!(sched.is_ticking());
        assert_eq!(sched.start_count(), 2);
    }
}
