//! Session controller.
//!
//! Owns the single [`SessionState`] record and advances it in response to
//! scheduler callbacks and client commands. It does not run any threads: the
//! host calls [`SessionController::tick`] once per second while the
//! scheduler is ticking, [`SessionController::on_daily_boundary`] at the
//! active-window edges, and [`SessionController::handle`] for every client
//! message. Handlers run to completion one at a time.
//!
//! ## Segment cycle
//!
//! ```text
//! WORK -> SHORT_BREAK -> WORK -> ... -> WORK -> LONG_BREAK -> WORK
//!                  (every `cyclesUntilLongBreak`-th WORK)
//! ```
//!
//! Each segment ends paused unless `auto_start_next` is set.
//!
//! ## Re-derivation
//!
//! Durations that matter (timeouts, distraction spans, actual segment length)
//! are computed from timestamps, and the active-window flag is recomputed
//! from the clock on every event, so a missed tick or a failed write never
//! leaves the record permanently wrong.

use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::state::{SessionKind, SessionState, StateSnapshot};
use crate::events::{Command, Notification};
use crate::platform::Platform;
use crate::settings::Settings;
use crate::storage::keys;
use crate::storage::session_log::{self, CountdownSnapshot, SessionLogEntry};

const BROADCAST_CAPACITY: usize = 64;

/// Behaviours that vary between deployments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerPolicy {
    /// Whether a running break can be paused by the user.
    pub breaks_pausable: bool,
    /// Start the next segment immediately after a transition.
    pub auto_start_next: bool,
    /// Days of session log to keep; `None` keeps everything.
    pub log_retention_days: Option<u32>,
}

impl Default for ControllerPolicy {
    fn default() -> Self {
        Self {
            breaks_pausable: true,
            auto_start_next: false,
            log_retention_days: Some(90),
        }
    }
}

pub struct SessionController {
    settings: Settings,
    state: SessionState,
    policy: ControllerPolicy,
    platform: Platform,
    updates: broadcast::Sender<StateSnapshot>,
    /// Snapshots sent so far; lets `handle` tell whether an op broadcast.
    emitted: u64,
}

impl SessionController {
    /// Build the controller from persisted settings, counters and the last
    /// countdown snapshot. Store read failures fall back to defaults.
    pub fn new(platform: Platform, policy: ControllerPolicy) -> Self {
        let settings = Settings::load(platform.store.as_ref())
            .map(|s| s.sanitized_against(&Settings::default()))
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to load settings, using defaults");
                Settings::default()
            });
        let (updates, _) = broadcast::channel(BROADCAST_CAPACITY);
        let mut controller = Self {
            state: SessionState::fresh(&settings),
            settings,
            policy,
            platform,
            updates,
            emitted: 0,
        };
        controller.restore_persisted();
        controller.refresh_window();
        controller.schedule_daily_boundaries();
        controller
    }

    fn restore_persisted(&mut self) {
        let store = self.platform.store.as_ref();
        match store.get(keys::COMPLETED_CYCLES) {
            Ok(Some(v)) => {
                let cycles = v
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .unwrap_or_else(|| {
                        warn!(value = %v, "ignoring unusable completed cycle counter");
                        0
                    });
                // A shortened cycle length can leave the counter past the end.
                self.state.completed_cycles_in_run = cycles % self.settings.cycles_until_long_break;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to read completed cycle counter"),
        }
        match CountdownSnapshot::load(store) {
            Ok(Some(snap)) => {
                let planned = self.settings.duration_for(snap.kind);
                self.state.session_kind = snap.kind;
                self.state.remaining_seconds = snap.remaining_seconds.min(planned);
                info!(kind = ?snap.kind, remaining = self.state.remaining_seconds, "restored countdown");
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to read countdown snapshot"),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn policy(&self) -> &ControllerPolicy {
        &self.policy
    }

    /// Attach a client. Dropped or lagging receivers never affect the
    /// controller or other receivers.
    pub fn subscribe(&self) -> broadcast::Receiver<StateSnapshot> {
        self.updates.subscribe()
    }

    /// Full state with the live timeout duration filled in.
    pub fn snapshot(&self) -> StateSnapshot {
        let now = self.platform.clock.now();
        let timeout_elapsed_seconds = match (self.state.timeout_active, self.state.timeout_started_at) {
            (true, Some(started)) => elapsed_secs(started, now),
            _ => 0,
        };
        StateSnapshot {
            state: self.state.clone(),
            timeout_elapsed_seconds,
            settings: self.settings.clone(),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Dispatch a client command. Every command is answered with the
    /// resulting snapshot. Mutating commands also broadcast it, including
    /// ones the current state refuses.
    pub fn handle(&mut self, command: Command) -> StateSnapshot {
        debug!(?command, "handling command");
        let emitted_before = self.emitted;
        match command {
            Command::GetState => {
                self.refresh_window();
                return self.snapshot();
            }
            Command::MainAction => {
                self.main_action();
            }
            Command::ResetCycle => self.reset_cycle(),
            Command::UpdateWorkDuration { seconds } => {
                self.update_work_duration(seconds);
            }
            Command::SettingsChanged => self.reload_settings(),
            Command::Start => {
                self.start();
            }
            Command::Pause => {
                self.pause();
            }
            Command::StartTimeout => {
                self.start_timeout();
            }
            Command::FinishTimeout => {
                self.finish_timeout();
            }
            Command::ActivityChanged => self.evaluate_activity(),
        }
        if self.emitted == emitted_before {
            debug!("command refused, broadcasting unchanged state");
            self.emit();
        }
        self.snapshot()
    }

    /// The popup's single button.
    pub fn main_action(&mut self) -> bool {
        if self.state.timeout_active {
            self.finish_timeout()
        } else if self.state.paused {
            self.start()
        } else if self.state.session_kind == SessionKind::Work {
            self.start_timeout()
        } else {
            self.pause()
        }
    }

    /// Resume or begin the countdown. Refused outside the active window.
    pub fn start(&mut self) -> bool {
        if !self.state.paused || self.state.timeout_active {
            return false;
        }
        let now = self.platform.clock.now();
        if self.refresh_window() {
            self.notify(self.outside_schedule_notice());
            self.state.paused = true;
            self.emit();
            return false;
        }

        let fresh = self.state.session_actual_start.is_none();
        if self.state.session_kind == SessionKind::Work
            && fresh
            && self.state.remaining_seconds == self.settings.work_duration
        {
            self.state.reset_run_accumulators();
        }
        if fresh {
            self.state.session_actual_start = Some(now);
        }
        self.state.open_span(now);
        self.state.paused = false;
        self.state.show_summary = false;
        self.state.summary_text = None;
        self.platform.scheduler.start_ticking();
        info!(kind = ?self.state.session_kind, remaining = self.state.remaining_seconds, "countdown started");

        self.evaluate_activity_at(now);
        self.emit();
        true
    }

    /// Stop the countdown where it is.
    pub fn pause(&mut self) -> bool {
        if self.state.paused || self.state.timeout_active {
            return false;
        }
        if self.state.session_kind.is_break() && !self.policy.breaks_pausable {
            debug!("breaks are not pausable");
            return false;
        }
        let now = self.platform.clock.now();
        self.platform.scheduler.stop_ticking();
        self.state.distraction.flush(now);
        self.state.close_span(now);
        self.state.paused = true;
        self.save_countdown(now);
        info!(remaining = self.state.remaining_seconds, "countdown paused");
        self.emit();
        true
    }

    /// One scheduler tick. Stale ticks delivered after a pause or timeout
    /// are ignored.
    pub fn tick(&mut self) {
        if !self.state.is_running() {
            debug!("ignoring stale tick");
            return;
        }
        let now = self.platform.clock.now();
        if self.refresh_window() {
            self.close_for_the_day(now);
            return;
        }

        if self.state.remaining_seconds > 0 {
            self.state.remaining_seconds -= 1;
        }
        if self.state.remaining_seconds == 0 {
            self.advance();
            return;
        }
        self.save_countdown(now);
        self.emit();
    }

    /// End the current segment and set up the next one.
    pub fn advance(&mut self) {
        let now = self.platform.clock.now();
        let ended = self.state.session_kind;
        self.platform.scheduler.stop_ticking();
        self.state.close_span(now);

        match ended {
            SessionKind::Work => {
                self.state.distraction.flush(now);
                let entry = self.log_entry(now, true);
                self.append_log(entry);

                let summary = run_summary(
                    self.state.timeout_count,
                    self.state.timeout_total_seconds,
                    self.state.distraction.total_seconds(),
                );
                self.state.completed_cycles_in_run += 1;
                let next = if self.state.completed_cycles_in_run >= self.settings.cycles_until_long_break {
                    self.state.completed_cycles_in_run = 0;
                    SessionKind::LongBreak
                } else {
                    SessionKind::ShortBreak
                };
                self.persist_cycles();

                self.state.session_kind = next;
                self.state.remaining_seconds = self.settings.duration_for(next);
                self.state.reset_run_accumulators();
                self.state.show_summary = true;
                self.state.summary_text = Some(summary.clone());
                info!(?next, cycles = self.state.completed_cycles_in_run, "work session ended");
                self.notify(Notification::WorkSessionEnded { next, summary });
            }
            SessionKind::ShortBreak | SessionKind::LongBreak => {
                let entry = self.log_entry(now, true);
                self.append_log(entry);

                self.state.session_kind = SessionKind::Work;
                self.state.remaining_seconds = self.settings.work_duration;
                self.state.show_summary = false;
                self.state.summary_text = None;
                info!(?ended, "break ended");
                if self.refresh_window() {
                    let window = self.settings.window();
                    self.notify(Notification::BreakEndedOutsideSchedule {
                        start: window.start.to_string(),
                        end: window.end.to_string(),
                    });
                } else {
                    self.notify(Notification::BreakEnded);
                }
            }
        }

        self.state.clear_segment_timing();
        self.state.paused = true;
        self.save_countdown(now);

        if self.policy.auto_start_next && !self.state.outside_active_window {
            // start() broadcasts.
            self.start();
        } else {
            self.emit();
        }
    }

    /// Freeze a running WORK countdown for an ad-hoc timeout.
    pub fn start_timeout(&mut self) -> bool {
        if !self.state.is_running() || self.state.session_kind != SessionKind::Work {
            return false;
        }
        let now = self.platform.clock.now();
        self.platform.scheduler.stop_ticking();
        self.state.distraction.flush(now);
        self.state.timeout_active = true;
        self.state.timeout_started_at = Some(now);
        self.save_countdown(now);
        info!(remaining = self.state.remaining_seconds, "timeout started");
        self.emit();
        true
    }

    /// End the timeout, count it, and resume unless the window has closed.
    pub fn finish_timeout(&mut self) -> bool {
        if !self.state.timeout_active {
            return false;
        }
        let now = self.platform.clock.now();
        let elapsed = self
            .state
            .timeout_started_at
            .map(|started| elapsed_secs(started, now))
            .unwrap_or(0);
        if elapsed > 0 {
            self.state.timeout_count += 1;
            self.state.timeout_total_seconds += elapsed;
        }
        self.state.timeout_active = false;
        self.state.timeout_started_at = None;
        info!(elapsed, count = self.state.timeout_count, "timeout finished");

        if self.refresh_window() {
            self.state.close_span(now);
            self.state.paused = true;
            self.save_countdown(now);
            self.notify(self.outside_schedule_notice());
        } else {
            self.platform.scheduler.start_ticking();
            self.evaluate_activity_at(now);
        }
        self.emit();
        true
    }

    /// Back to a fresh WORK segment with every counter zeroed.
    pub fn reset_cycle(&mut self) {
        self.hard_reset();
        info!("cycle reset");
        self.emit();
    }

    fn hard_reset(&mut self) {
        self.platform.scheduler.stop_ticking();
        self.state = SessionState::fresh(&self.settings);
        self.refresh_window();
        self.persist_cycles();
        if let Err(e) = CountdownSnapshot::clear(self.platform.store.as_ref()) {
            warn!(error = %e, "failed to clear countdown snapshot");
        }
    }

    /// Daily boundary timer fired.
    pub fn on_daily_boundary(&mut self) {
        let was_outside = self.state.outside_active_window;
        let outside = self.refresh_window();
        if was_outside && !outside && self.state.paused && !self.state.timeout_active {
            let window = self.settings.window();
            info!(%window, "active window opened");
            self.notify(Notification::ScheduleOpened {
                start: window.start.to_string(),
                end: window.end.to_string(),
            });
        }
        if outside && self.state.is_running() {
            self.close_for_the_day(self.platform.clock.now());
            return;
        }
        self.emit();
    }

    /// Re-check which tab is focused and adjust distraction tracking.
    pub fn evaluate_activity(&mut self) {
        let now = self.platform.clock.now();
        self.refresh_window();
        self.evaluate_activity_at(now);
        self.emit();
    }

    fn evaluate_activity_at(&mut self, now: DateTime<FixedOffset>) {
        if !self.state.distraction_eligible() {
            self.state.distraction.flush(now);
            return;
        }
        let host = self.platform.probe.active_hostname();
        let distracting = host.as_deref().filter(|h| self.settings.is_distracting(h));
        self.state.distraction.observe(distracting, now);
    }

    /// Change the WORK length. An idle, untouched WORK segment picks up the
    /// new length immediately.
    pub fn update_work_duration(&mut self, seconds: u64) -> bool {
        if seconds == 0 {
            warn!("rejecting zero work duration");
            return false;
        }
        let idle_at_full = self.state.session_kind == SessionKind::Work
            && self.state.paused
            && !self.state.timeout_active
            && self.state.session_actual_start.is_none()
            && self.state.remaining_seconds == self.settings.work_duration;

        self.settings.work_duration = seconds;
        if let Err(e) = self
            .platform
            .store
            .set(keys::WORK_DURATION, Value::from(seconds))
        {
            warn!(error = %e, "failed to persist work duration");
        }
        if idle_at_full {
            self.state.remaining_seconds = seconds;
        }
        self.emit();
        true
    }

    /// Re-read settings after the editor saved them, then hard reset.
    pub fn reload_settings(&mut self) {
        match Settings::load(self.platform.store.as_ref()) {
            Ok(loaded) => self.settings = loaded.sanitized_against(&self.settings),
            Err(e) => warn!(error = %e, "failed to reload settings, keeping previous values"),
        }
        self.hard_reset();
        self.schedule_daily_boundaries();
        info!(window = %self.settings.window(), work = self.settings.work_duration, "settings reloaded");
        self.notify(Notification::SettingsUpdated);
        self.emit();
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Recompute `outside_active_window` from the clock. Returns the new value.
    fn refresh_window(&mut self) -> bool {
        let now = self.platform.clock.now();
        let outside = !self.settings.window().contains(now.time());
        self.state.outside_active_window = outside;
        outside
    }

    /// The window closed under a running segment.
    fn close_for_the_day(&mut self, now: DateTime<FixedOffset>) {
        let kind = self.state.session_kind;
        self.platform.scheduler.stop_ticking();
        self.state.distraction.flush(now);
        self.state.close_span(now);
        self.state.paused = true;

        if kind == SessionKind::Work && self.state.session_actual_start.is_some() {
            let entry = self.log_entry(now, false);
            self.append_log(entry);
            // The interrupted run is logged; tomorrow begins a fresh one.
            self.state.remaining_seconds = self.settings.work_duration;
            self.state.clear_segment_timing();
            self.state.reset_run_accumulators();
        }
        self.save_countdown(now);
        info!(?kind, "active window closed mid-session");
        self.notify(Notification::ScheduleEndedMidSession { kind });
        self.emit();
    }

    fn outside_schedule_notice(&self) -> Notification {
        let window = self.settings.window();
        Notification::OutsideSchedule {
            start: window.start.to_string(),
            end: window.end.to_string(),
        }
    }

    fn schedule_daily_boundaries(&self) {
        let scheduler = &self.platform.scheduler;
        scheduler.cancel_daily();
        for at in self.settings.window().boundaries() {
            scheduler.schedule_daily(at);
        }
    }

    fn log_entry(&self, now: DateTime<FixedOffset>, completed: bool) -> SessionLogEntry {
        let kind = self.state.session_kind;
        let started_at = self.state.session_actual_start.unwrap_or(now);
        let is_work = kind == SessionKind::Work;
        SessionLogEntry {
            id: Uuid::new_v4().to_string(),
            kind,
            date: now.date_naive(),
            started_at,
            ended_at: now,
            planned_duration: self.settings.duration_for(kind),
            actual_duration: self.state.active_seconds_at(now),
            timeout_count: is_work.then_some(self.state.timeout_count),
            timeout_total_seconds: is_work.then_some(self.state.timeout_total_seconds),
            distractions: (is_work && !self.state.distraction.distraction_seconds.is_empty())
                .then(|| self.state.distraction.distraction_seconds.clone()),
            completed,
        }
    }

    fn append_log(&self, entry: SessionLogEntry) {
        if let Err(e) = session_log::append(
            self.platform.store.as_ref(),
            entry,
            self.policy.log_retention_days,
        ) {
            warn!(error = %e, "failed to append session log entry");
        }
    }

    fn persist_cycles(&self) {
        if let Err(e) = self.platform.store.set(
            keys::COMPLETED_CYCLES,
            Value::from(self.state.completed_cycles_in_run),
        ) {
            warn!(error = %e, "failed to persist completed cycle counter");
        }
    }

    fn save_countdown(&self, now: DateTime<FixedOffset>) {
        let snap = CountdownSnapshot {
            kind: self.state.session_kind,
            remaining_seconds: self.state.remaining_seconds,
            saved_at: now,
        };
        if let Err(e) = snap.save(self.platform.store.as_ref()) {
            warn!(error = %e, "failed to persist countdown snapshot");
        }
    }

    fn notify(&self, notification: Notification) {
        self.platform.notifier.notify(&notification);
    }

    fn emit(&mut self) {
        self.emitted += 1;
        // No receivers is fine.
        let _ = self.updates.send(self.snapshot());
    }
}

fn elapsed_secs(from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> u64 {
    (to - from).num_seconds().max(0) as u64
}

fn format_span(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else {
        format!("{}m", (secs + 30) / 60)
    }
}

/// End-of-run summary line.
pub(crate) fn run_summary(timeout_count: u32, timeout_secs: u64, distraction_secs: u64) -> String {
    if timeout_count == 0 && distraction_secs == 0 {
        return "Uninterrupted focus session!".to_string();
    }
    let mut parts = Vec::new();
    if timeout_count > 0 {
        let plural = if timeout_count == 1 { "" } else { "s" };
        parts.push(format!(
            "{timeout_count} timeout{plural} totaling {}",
            format_span(timeout_secs)
        ));
    }
    if distraction_secs > 0 {
        parts.push(format!("{} distraction", format_span(distraction_secs)));
    }
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{NaiveDate, NaiveTime};

    use crate::platform::{
        KeyValueStore, ManualClock, MemoryStore, RecordingNotifier, RecordingScheduler, ReportedProbe,
    };

    struct Harness {
        clock: Arc<ManualClock>,
        scheduler: Arc<RecordingScheduler>,
        store: Arc<MemoryStore>,
        notifier: Arc<RecordingNotifier>,
        probe: Arc<ReportedProbe>,
    }

    impl Harness {
        fn at(h: u32, m: u32) -> Self {
            let local = NaiveDate::from_ymd_opt(2026, 10, 16)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap();
            Self {
                clock: Arc::new(ManualClock::from_local(local)),
                scheduler: Arc::new(RecordingScheduler::new()),
                store: Arc::new(MemoryStore::new()),
                notifier: Arc::new(RecordingNotifier::new()),
                probe: Arc::new(ReportedProbe::new()),
            }
        }

        fn controller(&self) -> SessionController {
            SessionController::new(
                Platform {
                    clock: self.clock.clone(),
                    scheduler: self.scheduler.clone(),
                    store: self.store.clone(),
                    notifier: self.notifier.clone(),
                    probe: self.probe.clone(),
                },
                ControllerPolicy::default(),
            )
        }
    }

    #[test]
    fn new_controller_is_idle_work() {
        let h = Harness::at(10, 0);
        let c = h.controller();
        assert_eq!(c.state().session_kind, SessionKind::Work);
        assert!(c.state().paused);
        assert!(!c.state().outside_active_window);
        assert_eq!(
            h.scheduler.daily_times(),
            vec![
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(17, 0, 0).unwrap()
            ]
        );
    }

    #[test]
    fn start_outside_window_is_refused() {
        let h = Harness::at(7, 0);
        let mut c = h.controller();
        assert!(!c.start());
        assert!(c.state().paused);
        assert!(!h.scheduler.is_ticking());
        assert!(matches!(
            h.notifier.notifications().as_slice(),
            [Notification::OutsideSchedule { .. }]
        ));
    }

    #[test]
    fn main_action_dispatches_by_state() {
        let h = Harness::at(10, 0);
        let mut c = h.controller();
        c.main_action();
        assert!(c.state().is_running());
        c.main_action();
        assert!(c.state().timeout_active);
        h.clock.advance_secs(3);
        c.main_action();
        assert!(c.state().is_running());
        assert_eq!(c.state().timeout_count, 1);
    }

    #[test]
    fn stale_tick_is_ignored() {
        let h = Harness::at(10, 0);
        let mut c = h.controller();
        c.start();
        c.pause();
        let before = c.state().remaining_seconds;
        c.tick();
        assert_eq!(c.state().remaining_seconds, before);
    }

    #[test]
    fn break_pause_respects_policy() {
        let h = Harness::at(10, 0);
        let mut c = h.controller();
        c.update_work_duration(1);
        c.start();
        c.tick();
        assert_eq!(c.state().session_kind, SessionKind::ShortBreak);
        c.start();
        c.policy.breaks_pausable = false;
        assert!(!c.pause());
        assert!(!c.main_action());
        c.policy.breaks_pausable = true;
        assert!(c.main_action());
        assert!(c.state().paused);
    }

    #[test]
    fn get_state_does_not_broadcast() {
        let h = Harness::at(10, 0);
        let mut c = h.controller();
        let mut rx = c.subscribe();
        let reply = c.handle(Command::GetState);
        assert_eq!(reply.state.session_kind, SessionKind::Work);
        assert!(rx.try_recv().is_err());
        c.handle(Command::MainAction);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn refused_commands_still_broadcast_once() {
        let h = Harness::at(10, 0);
        let mut c = h.controller();
        c.update_work_duration(1);
        c.start();
        c.tick();
        c.start();
        c.policy.breaks_pausable = false;
        let mut rx = c.subscribe();

        let reply = c.handle(Command::MainAction);
        assert!(!reply.state.paused);
        let snap = rx.try_recv().unwrap();
        assert_eq!(snap.state.session_kind, SessionKind::ShortBreak);
        assert!(rx.try_recv().is_err());

        c.handle(Command::StartTimeout);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());

        c.policy.breaks_pausable = true;
        c.handle(Command::Pause);
        assert!(rx.try_recv().unwrap().state.paused);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn oversized_cycle_counter_is_not_truncated() {
        let h = Harness::at(10, 0);
        h.store
            .set(keys::COMPLETED_CYCLES, Value::from(u64::from(u32::MAX) + 2))
            .unwrap();
        let c = h.controller();
        assert_eq!(c.state().completed_cycles_in_run, 0);

        h.store.set(keys::COMPLETED_CYCLES, Value::from(3)).unwrap();
        let c = h.controller();
        assert_eq!(c.state().completed_cycles_in_run, 3);
    }

    #[test]
    fn summary_text_variants() {
        assert_eq!(run_summary(0, 0, 0), "Uninterrupted focus session!");
        assert_eq!(run_summary(1, 90, 0), "1 timeout totaling 2m");
        assert_eq!(run_summary(2, 600, 45), "2 timeouts totaling 10m; 45s distraction");
        assert_eq!(run_summary(0, 0, 300), "5m distraction");
    }

    #[test]
    fn restores_countdown_snapshot_paused() {
        let h = Harness::at(10, 0);
        {
            let mut c = h.controller();
            c.start();
            for _ in 0..10 {
                h.clock.advance_secs(1);
                c.tick();
            }
        }
        let c = h.controller();
        assert!(c.state().paused);
        assert_eq!(c.state().remaining_seconds, c.settings().work_duration - 10);
    }
}
