use clap::Subcommand;
use neurofocus_core::storage::session_log;
use neurofocus_core::Database;

use super::format_duration;

#[derive(Subcommand)]
pub enum LogAction {
    /// List session log entries, newest last
    List {
        /// Only the most recent N entries
        #[arg(long)]
        limit: Option<usize>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        LogAction::List { limit, json } => {
            let mut entries = session_log::load(&db)?;
            if let Some(n) = limit {
                let skip = entries.len().saturating_sub(n);
                entries.drain(..skip);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            if entries.is_empty() {
                println!("no sessions logged");
                return Ok(());
            }
            for e in &entries {
                let mut line = format!(
                    "{} {} {:<11} {:>6}/{:<6}",
                    e.date,
                    e.started_at.format("%H:%M"),
                    e.kind.label(),
                    format_duration(e.actual_duration),
                    format_duration(e.planned_duration),
                );
                if let Some(n) = e.timeout_count.filter(|n| *n > 0) {
                    line.push_str(&format!(" timeouts={n}"));
                }
                let distracted = e.distraction_total();
                if distracted > 0 {
                    line.push_str(&format!(" distracted={}", format_duration(distracted)));
                }
                if !e.completed {
                    line.push_str(" (incomplete)");
                }
                println!("{line}");
            }
        }
    }
    Ok(())
}
