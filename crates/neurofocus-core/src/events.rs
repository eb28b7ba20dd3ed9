use serde::{Deserialize, Serialize};

use crate::timer::SessionKind;

/// Messages UI clients send to the controller.
///
/// Unknown `type` values fail to deserialize; hosts drop them without a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Reply with the current snapshot; no broadcast.
    GetState,
    /// Context-dependent primary button: finish timeout, start, take a
    /// timeout or pause.
    MainAction,
    ResetCycle,
    UpdateWorkDuration { seconds: u64 },
    SettingsChanged,
    Start,
    Pause,
    StartTimeout,
    FinishTimeout,
    /// Focused tab or window changed; re-check distraction tracking.
    ActivityChanged,
}

/// Everything the controller tells the user about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    /// A WORK segment ran out.
    WorkSessionEnded { next: SessionKind, summary: String },
    /// A break ran out and WORK is ready.
    BreakEnded,
    /// A break ran out after the active window closed; WORK waits for tomorrow.
    BreakEndedOutsideSchedule { start: String, end: String },
    /// The daily window opened while the timer was idle.
    ScheduleOpened { start: String, end: String },
    /// Start refused: the timer only runs inside the window.
    OutsideSchedule { start: String, end: String },
    /// The window closed while a segment was running.
    ScheduleEndedMidSession { kind: SessionKind },
    SettingsUpdated,
}

impl Notification {
    pub fn title(&self) -> &'static str {
        "NeuroFocus Timer"
    }

    pub fn message(&self) -> String {
        match self {
            Notification::WorkSessionEnded { next, summary } => {
                format!("Work session ended! Time for a {}. {summary}", next.label().to_lowercase())
            }
            Notification::BreakEnded => "Break's over! Time to focus.".to_string(),
            Notification::BreakEndedOutsideSchedule { start, end } => format!(
                "Break's over. Focus hours are {start}-{end}; see you then."
            ),
            Notification::ScheduleOpened { start, end } => {
                format!("Focus hours have started ({start}-{end}). Ready when you are.")
            }
            Notification::OutsideSchedule { start, end } => {
                format!("The timer only runs between {start} and {end}.")
            }
            Notification::ScheduleEndedMidSession { kind } => format!(
                "Focus hours are over. Your {} was paused.",
                kind.label().to_lowercase()
            ),
            Notification::SettingsUpdated => {
                "Settings updated. Durations and schedule have been applied.".to_string()
            }
        }
    }
}
