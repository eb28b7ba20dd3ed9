//! Host collaborators consumed by the session controller.
//!
//! The controller never talks to the operating system, the browser or a
//! database directly. Everything it needs from the outside world comes
//! through the traits below, injected as a [`Platform`] bundle. The host
//! process wires real implementations; tests wire the in-memory ones from
//! [`memory`].

mod activity;
pub mod memory;
mod system;

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveTime};
use serde_json::Value;

use crate::error::StoreError;
use crate::events::Notification;

pub use activity::{hostname_from_url, normalize_hostname};
pub use memory::{ManualClock, MemoryStore, RecordingNotifier, RecordingScheduler, ReportedProbe};
pub use system::SystemClock;

/// Local wall clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Periodic tick and daily boundary timers.
///
/// Cancellation is best-effort: a tick that was already queued may still be
/// delivered after `stop_ticking`, and the controller treats it as a no-op.
pub trait Scheduler: Send + Sync {
    /// Begin firing `tick()` roughly once per second.
    fn start_ticking(&self);

    /// Stop the periodic tick.
    fn stop_ticking(&self);

    /// Fire the daily boundary callback every day at `at` (local time).
    /// May be called several times to register several boundaries.
    fn schedule_daily(&self, at: NaiveTime);

    /// Drop every registered daily boundary.
    fn cancel_daily(&self);
}

/// Named JSON values that survive restarts. Writes are independent and
/// idempotent; there are no transactions.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Fire-and-forget user-facing messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Reports the hostname of the focused browser tab, if any.
pub trait ActivityProbe: Send + Sync {
    fn active_hostname(&self) -> Option<String>;
}

/// Everything the controller borrows from its host.
#[derive(Clone)]
pub struct Platform {
    pub clock: Arc<dyn Clock>,
    pub scheduler: Arc<dyn Scheduler>,
    pub store: Arc<dyn KeyValueStore>,
    pub notifier: Arc<dyn Notifier>,
    pub probe: Arc<dyn ActivityProbe>,
}
