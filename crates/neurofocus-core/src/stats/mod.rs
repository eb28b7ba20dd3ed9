//! Read-side statistics over the session log.

mod report;

pub use report::{daily_report, summarize, DailyReport, ReportTotals};
