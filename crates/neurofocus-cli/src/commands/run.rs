//! Foreground host for the session controller.
//!
//! Reads one JSON object per line from stdin and writes every state snapshot
//! as one JSON line to stdout. Lines are either client commands
//! (`{"type":"MAIN_ACTION"}`) or host events reporting the focused tab
//! (`{"type":"TAB_ACTIVATED","url":"https://..."}`). Logs go to stderr.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveTime};
use neurofocus_core::platform::{hostname_from_url, ReportedProbe};
use neurofocus_core::{
    Clock, Command, Config, Database, Notification, Notifier, Platform, Scheduler,
    SessionController, StateSnapshot, SystemClock,
};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// The controller counts down one second per `tick()`.
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Scheduler backed by the run loop's interval timer.
///
/// The controller only flips flags here; the loop reads them on every
/// interval and decides whether to call `tick()` or `on_daily_boundary()`.
#[derive(Debug, Default)]
pub struct TokioScheduler {
    ticking: AtomicBool,
    daily: Mutex<Vec<NaiveTime>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking.load(Ordering::SeqCst)
    }

    /// Whether any daily boundary lies in `(from, to]`.
    pub fn boundary_between(&self, from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> bool {
        let daily = self.daily.lock().unwrap_or_else(|p| p.into_inner());
        daily.iter().any(|at| crossed(*at, from, to))
    }
}

impl Scheduler for TokioScheduler {
    fn start_ticking(&self) {
        self.ticking.store(true, Ordering::SeqCst);
    }

    fn stop_ticking(&self) {
        self.ticking.store(false, Ordering::SeqCst);
    }

    fn schedule_daily(&self, at: NaiveTime) {
        self.daily.lock().unwrap_or_else(|p| p.into_inner()).push(at);
    }

    fn cancel_daily(&self) {
        self.daily.lock().unwrap_or_else(|p| p.into_inner()).clear();
    }
}

fn crossed(at: NaiveTime, from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> bool {
    let (from, to) = (from.naive_local(), to.naive_local());
    let mut day = from.date();
    while day <= to.date() {
        let candidate = day.and_time(at);
        if candidate > from && candidate <= to {
            return true;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    false
}

/// Logs every notification; also prints it to stderr when enabled.
pub struct LogNotifier {
    enabled: bool,
}

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        info!(?notification, "notification");
        if self.enabled {
            eprintln!("[{}] {}", notification.title(), notification.message());
        }
    }
}

/// Messages from the browser side that are not client commands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum HostEvent {
    TabActivated { url: Option<String> },
    /// No browser window has focus.
    WindowBlurred,
}

#[derive(Debug, PartialEq)]
enum Line {
    Command(Command),
    Host(HostEvent),
    Unknown,
}

fn parse_line(line: &str) -> Line {
    if let Ok(cmd) = serde_json::from_str::<Command>(line) {
        return Line::Command(cmd);
    }
    if let Ok(event) = serde_json::from_str::<HostEvent>(line) {
        return Line::Host(event);
    }
    Line::Unknown
}

async fn write_snapshot(
    out: &mut tokio::io::Stdout,
    snapshot: &StateSnapshot,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut line = serde_json::to_vec(snapshot)?;
    line.push(b'\n');
    out.write_all(&line).await?;
    out.flush().await?;
    Ok(())
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve())
}

async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Arc::new(Database::open()?);
    let clock = Arc::new(SystemClock);
    let scheduler = Arc::new(TokioScheduler::new());
    let probe = Arc::new(ReportedProbe::new());
    let platform = Platform {
        clock: clock.clone(),
        scheduler: scheduler.clone(),
        store: db,
        notifier: Arc::new(LogNotifier {
            enabled: config.notifications.enabled,
        }),
        probe: probe.clone(),
    };

    let mut controller = SessionController::new(platform, config.controller_policy());
    let mut updates = controller.subscribe();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut ticker = tokio::time::interval(TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_check = clock.now();

    info!(window = %controller.settings().window(), "session controller running");
    write_snapshot(&mut stdout, &controller.snapshot()).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed, shutting down");
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match parse_line(line) {
                    Line::Command(Command::GetState) => {
                        let reply = controller.handle(Command::GetState);
                        write_snapshot(&mut stdout, &reply).await?;
                    }
                    // Mutating commands always broadcast, refused ones included.
                    Line::Command(cmd) => {
                        controller.handle(cmd);
                    }
                    Line::Host(HostEvent::TabActivated { url }) => {
                        let host = url.as_deref().and_then(hostname_from_url);
                        debug!(?host, "tab activated");
                        probe.report(host.as_deref());
                        controller.handle(Command::ActivityChanged);
                    }
                    Line::Host(HostEvent::WindowBlurred) => {
                        probe.report(None);
                        controller.handle(Command::ActivityChanged);
                    }
                    Line::Unknown => debug!(line, "ignoring unknown message"),
                }
            }
            _ = ticker.tick() => {
                let now = clock.now();
                if scheduler.boundary_between(last_check, now) {
                    controller.on_daily_boundary();
                }
                last_check = now;
                if scheduler.is_ticking() {
                    controller.tick();
                }
            }
            update = updates.recv() => match update {
                Ok(snapshot) => write_snapshot(&mut stdout, &snapshot).await?,
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "dropped state updates"),
                Err(RecvError::Closed) => break,
            },
        }
    }
    Ok(())
}
