use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::distraction::DistractionTracker;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionKind {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionKind {
    pub fn is_break(self) -> bool {
        !matches!(self, SessionKind::Work)
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Work => "Focus",
            SessionKind::ShortBreak => "Short Break",
            SessionKind::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The controller's single mutable record.
///
/// At any instant exactly one of "counting down", `paused` or
/// `timeout_active` describes what the controller is doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub remaining_seconds: u64,
    pub paused: bool,
    pub session_kind: SessionKind,
    pub completed_cycles_in_run: u32,
    pub timeout_active: bool,
    pub timeout_started_at: Option<DateTime<FixedOffset>>,
    pub outside_active_window: bool,
    /// First moment the current segment's countdown ran; `None` until started.
    pub session_actual_start: Option<DateTime<FixedOffset>>,
    /// Seconds the segment has run so far, excluding paused spans.
    pub active_seconds: u64,
    /// Start of the span currently being counted into `active_seconds`.
    pub active_since: Option<DateTime<FixedOffset>>,
    #[serde(flatten)]
    pub distraction: DistractionTracker,
    pub timeout_count: u32,
    pub timeout_total_seconds: u64,
    pub show_summary: bool,
    pub summary_text: Option<String>,
}

impl SessionState {
    /// WORK, paused, at full duration, with every counter at zero.
    pub fn fresh(settings: &Settings) -> Self {
        Self {
            remaining_seconds: settings.work_duration,
            paused: true,
            session_kind: SessionKind::Work,
            completed_cycles_in_run: 0,
            timeout_active: false,
            timeout_started_at: None,
            outside_active_window: false,
            session_actual_start: None,
            active_seconds: 0,
            active_since: None,
            distraction: DistractionTracker::default(),
            timeout_count: 0,
            timeout_total_seconds: 0,
            show_summary: false,
            summary_text: None,
        }
    }

    /// Countdown is decrementing.
    pub fn is_running(&self) -> bool {
        !self.paused && !self.timeout_active
    }

    /// Distraction time may accrue right now.
    pub fn distraction_eligible(&self) -> bool {
        self.session_kind == SessionKind::Work && self.is_running() && !self.outside_active_window
    }

    /// Run time of the segment up to `now`, open span included.
    pub fn active_seconds_at(&self, now: DateTime<FixedOffset>) -> u64 {
        let open = self
            .active_since
            .map(|since| (now - since).num_seconds().max(0) as u64)
            .unwrap_or(0);
        self.active_seconds + open
    }

    pub(crate) fn open_span(&mut self, now: DateTime<FixedOffset>) {
        if self.active_since.is_none() {
            self.active_since = Some(now);
        }
    }

    pub(crate) fn close_span(&mut self, now: DateTime<FixedOffset>) {
        self.active_seconds = self.active_seconds_at(now);
        self.active_since = None;
    }

    /// Forget when the segment started and how long it ran.
    pub(crate) fn clear_segment_timing(&mut self) {
        self.session_actual_start = None;
        self.active_seconds = 0;
        self.active_since = None;
    }

    pub(crate) fn reset_run_accumulators(&mut self) {
        self.distraction.clear();
        self.timeout_count = 0;
        self.timeout_total_seconds = 0;
    }
}

/// What clients receive: the full state plus the settings it runs under.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    #[serde(flatten)]
    pub state: SessionState,
    /// Seconds spent in the current timeout so far (0 when none).
    pub timeout_elapsed_seconds: u64,
    pub settings: Settings,
    pub at: DateTime<FixedOffset>,
}
