//! Pomodoro session state machine.
//!
//! [`SessionController`] is the only writer of [`SessionState`]. Everything
//! else in this module is plain data it operates on.

mod controller;
mod distraction;
mod schedule;
mod state;

pub use controller::{ControllerPolicy, SessionController};
pub use distraction::{ActiveDistraction, DistractionTracker};
pub use schedule::{ActiveWindow, TimeOfDay};
pub use state::{SessionKind, SessionState, StateSnapshot};
