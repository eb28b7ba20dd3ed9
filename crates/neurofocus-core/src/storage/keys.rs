//! Names of the persisted values.
//!
//! The names match the ones the settings editor writes, so both sides can
//! share a single store without a translation layer.

pub const ACTIVE_START: &str = "startTime";
pub const ACTIVE_END: &str = "endTime";
pub const WORK_DURATION: &str = "userSetWorkDuration";
pub const SHORT_BREAK_DURATION: &str = "shortBreakDuration";
pub const LONG_BREAK_DURATION: &str = "longBreakDuration";
pub const CYCLES_UNTIL_LONG_BREAK: &str = "pomodorosUntilLongBreak";
pub const DISTRACTING_SITES: &str = "distractingSites";

/// Completed WORK segments toward the next long break.
pub const COMPLETED_CYCLES: &str = "completedPomodoros";
/// Array of session log entries.
pub const SESSION_LOG: &str = "neuroFocusSessionLogs";
/// In-flight countdown, for restart recovery.
pub const COUNTDOWN_SNAPSHOT: &str = "timerSnapshot";
