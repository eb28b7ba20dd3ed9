//! # NeuroFocus Core Library
//!
//! Core logic for the NeuroFocus Pomodoro timer: a session controller that
//! counts WORK and break segments inside a daily active window, tracks ad-hoc
//! timeouts and time spent on distracting sites, and keeps a session log.
//!
//! The controller never touches the outside world directly. Time, the
//! periodic tick, persistence, notifications and the focused-tab hostname
//! all come in through the traits in [`platform`], so the same code runs
//! under the CLI daemon and in tests with a manual clock.
//!
//! ## Key Components
//!
//! - [`SessionController`]: the state machine and command dispatcher
//! - [`Settings`]: user durations, active window and denylist
//! - [`Database`]: SQLite-backed key-value store
//! - [`Config`]: host policy configuration (TOML)
//! - [`stats`]: daily focus report over the session log

pub mod error;
pub mod events;
pub mod platform;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::{Command, Notification};
pub use platform::{
    ActivityProbe, Clock, KeyValueStore, Notifier, Platform, Scheduler, SystemClock,
};
pub use settings::Settings;
pub use stats::{daily_report, summarize, DailyReport, ReportTotals};
pub use storage::{Config, CountdownSnapshot, Database, SessionLogEntry};
pub use timer::{
    ActiveWindow, ControllerPolicy, SessionController, SessionKind, SessionState, StateSnapshot,
    TimeOfDay,
};
