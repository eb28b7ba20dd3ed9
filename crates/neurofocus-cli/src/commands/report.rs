use chrono::Local;
use clap::Args;
use neurofocus_core::storage::session_log;
use neurofocus_core::{daily_report, summarize, Database, DailyReport};
use serde::Serialize;

use super::format_duration;

#[derive(Args)]
pub struct ReportArgs {
    /// Number of days to cover, ending today
    #[arg(long, default_value = "7")]
    days: u32,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ReportOutput {
    days: Vec<DailyReport>,
    totals: neurofocus_core::ReportTotals,
}

pub fn run(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let entries = session_log::load(&db)?;
    let today = Local::now().date_naive();
    let rows = daily_report(&entries, today, args.days);
    let totals = summarize(&rows);

    if args.json {
        let output = ReportOutput { days: rows, totals };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{:<12} {:>8} {:>8} {:>10} {:>7}  Top site", "Date", "Focus", "Timeout", "Distracted", "Cycles");
    for row in &rows {
        let top = row
            .top_distractions
            .first()
            .map(|(host, _)| host.as_str())
            .unwrap_or("-");
        println!(
            "{:<12} {:>8} {:>8} {:>10} {:>7}  {}",
            row.date.format("%Y-%m-%d"),
            format_duration(row.focus_seconds),
            format_duration(row.timeout_seconds),
            format_duration(row.distraction_seconds),
            row.completed_cycles,
            top
        );
    }
    println!();
    println!(
        "Total focus {} over {} active day(s), {} cycle(s), avg {}/day",
        format_duration(totals.focus_seconds),
        totals.active_days,
        totals.completed_cycles,
        format_duration(totals.avg_focus_per_active_day)
    );
    if let Some(site) = &totals.top_distraction {
        println!("Most distracting: {site}");
    }
    Ok(())
}
