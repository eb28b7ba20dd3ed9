//! Per-run distraction accounting.
//!
//! At most one hostname is tracked at a time. Time is always derived from
//! timestamps, never from tick counts, so throttled or missed ticks do not
//! skew the totals. Switching hosts flushes the old span before the new one
//! begins, so no second is counted twice or dropped.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The span currently being timed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDistraction {
    pub hostname: String,
    pub started_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistractionTracker {
    /// Accumulated seconds per hostname for the current WORK run.
    pub distraction_seconds: BTreeMap<String, u64>,
    pub active_distraction_site: Option<ActiveDistraction>,
}

impl DistractionTracker {
    pub fn active_host(&self) -> Option<&str> {
        self.active_distraction_site
            .as_ref()
            .map(|a| a.hostname.as_str())
    }

    /// Start timing `hostname`. Any span already open is flushed first.
    pub fn begin(&mut self, hostname: &str, now: DateTime<FixedOffset>) {
        self.flush(now);
        debug!(hostname, "distraction tracking started");
        self.active_distraction_site = Some(ActiveDistraction {
            hostname: hostname.to_string(),
            started_at: now,
        });
    }

    /// Close the open span, crediting its whole seconds to its hostname.
    /// Returns the seconds credited (0 when nothing was open).
    pub fn flush(&mut self, now: DateTime<FixedOffset>) -> u64 {
        let Some(active) = self.active_distraction_site.take() else {
            return 0;
        };
        let elapsed = (now - active.started_at).num_seconds().max(0) as u64;
        if elapsed > 0 {
            *self
                .distraction_seconds
                .entry(active.hostname.clone())
                .or_insert(0) += elapsed;
        }
        debug!(hostname = %active.hostname, elapsed, "distraction tracking flushed");
        elapsed
    }

    /// Reconcile with the host currently in focus.
    ///
    /// `distracting` is `Some(host)` when the focused tab is on the
    /// denylist, `None` otherwise.
    pub fn observe(&mut self, distracting: Option<&str>, now: DateTime<FixedOffset>) {
        match distracting {
            Some(host) if self.active_host() == Some(host) => {}
            Some(host) => self.begin(host, now),
            None => {
                self.flush(now);
            }
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.distraction_seconds.values().sum()
    }

    pub fn clear(&mut self) {
        self.distraction_seconds.clear();
        self.active_distraction_site = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-16T10:00:00+00:00").unwrap()
    }

    #[test]
    fn flush_credits_elapsed_seconds() {
        let mut tracker = DistractionTracker::default();
        tracker.begin("youtube.com", t0());
        assert_eq!(tracker.flush(t0() + Duration::seconds(42)), 42);
        assert_eq!(tracker.distraction_seconds["youtube.com"], 42);
        assert!(tracker.active_distraction_site.is_none());
    }

    #[test]
    fn zero_length_span_is_not_recorded() {
        let mut tracker = DistractionTracker::default();
        tracker.begin("youtube.com", t0());
        tracker.flush(t0());
        assert!(tracker.distraction_seconds.is_empty());
    }

    #[test]
    fn switching_hosts_splits_time_without_overlap() {
        let mut tracker = DistractionTracker::default();
        tracker.observe(Some("a.com"), t0());
        tracker.observe(Some("a.com"), t0() + Duration::seconds(5));
        tracker.observe(Some("b.com"), t0() + Duration::seconds(10));
        tracker.observe(None, t0() + Duration::seconds(25));
        assert_eq!(tracker.distraction_seconds["a.com"], 10);
        assert_eq!(tracker.distraction_seconds["b.com"], 15);
        assert_eq!(tracker.total_seconds(), 25);
    }

    #[test]
    fn clock_going_backwards_credits_nothing() {
        let mut tracker = DistractionTracker::default();
        tracker.begin("a.com", t0());
        assert_eq!(tracker.flush(t0() - Duration::seconds(3)), 0);
        assert!(tracker.distraction_seconds.is_empty());
    }
}
