//! Daily focus report.
//!
//! Pure functions over [`SessionLogEntry`] slices; nothing here touches the
//! store. Net focus time for a WORK entry is its wall-clock length minus the
//! time spent in timeouts and on distracting sites.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::storage::SessionLogEntry;
use crate::timer::SessionKind;

/// Aggregates for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub date: NaiveDate,
    /// Net focus seconds across WORK entries.
    pub focus_seconds: u64,
    pub timeout_seconds: u64,
    pub distraction_seconds: u64,
    /// WORK segments that ran to zero.
    pub completed_cycles: u32,
    /// Per-hostname distraction seconds, largest first.
    pub top_distractions: Vec<(String, u64)>,
}

impl DailyReport {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            focus_seconds: 0,
            timeout_seconds: 0,
            distraction_seconds: 0,
            completed_cycles: 0,
            top_distractions: Vec::new(),
        }
    }
}

/// Totals across a range of [`DailyReport`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub days: usize,
    pub active_days: usize,
    pub focus_seconds: u64,
    pub timeout_seconds: u64,
    pub distraction_seconds: u64,
    pub completed_cycles: u32,
    /// Mean focus seconds over days that had any focus time.
    pub avg_focus_per_active_day: u64,
    pub top_distraction: Option<String>,
}

/// One row per day for the `days` days ending on `today`, oldest first.
///
/// Days with no entries get a zero row. Entries outside the range are
/// ignored, as are break entries (they carry no focus data).
pub fn daily_report(entries: &[SessionLogEntry], today: NaiveDate, days: u32) -> Vec<DailyReport> {
    if days == 0 {
        return Vec::new();
    }
    let first = today - Duration::days(i64::from(days) - 1);
    let mut by_day: BTreeMap<NaiveDate, (DailyReport, BTreeMap<String, u64>)> = (0..days)
        .map(|offset| {
            let date = first + Duration::days(i64::from(offset));
            (date, (DailyReport::empty(date), BTreeMap::new()))
        })
        .collect();

    for entry in entries.iter().filter(|e| e.kind == SessionKind::Work) {
        let Some((row, hosts)) = by_day.get_mut(&entry.date) else {
            continue;
        };
        let timeouts = entry.timeout_total_seconds.unwrap_or(0);
        let distraction = entry.distraction_total();
        row.focus_seconds += entry
            .actual_duration
            .saturating_sub(timeouts)
            .saturating_sub(distraction);
        row.timeout_seconds += timeouts;
        row.distraction_seconds += distraction;
        if entry.completed {
            row.completed_cycles += 1;
        }
        if let Some(d) = &entry.distractions {
            for (host, secs) in d {
                *hosts.entry(host.clone()).or_insert(0) += secs;
            }
        }
    }

    by_day
        .into_values()
        .map(|(mut row, hosts)| {
            row.top_distractions = ranked(hosts);
            row
        })
        .collect()
}

fn ranked(hosts: BTreeMap<String, u64>) -> Vec<(String, u64)> {
    let mut ranked: Vec<_> = hosts.into_iter().filter(|(_, secs)| *secs > 0).collect();
    // Stable sort keeps ties in hostname order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

pub fn summarize(rows: &[DailyReport]) -> ReportTotals {
    let mut totals = ReportTotals {
        days: rows.len(),
        ..ReportTotals::default()
    };
    let mut hosts: BTreeMap<String, u64> = BTreeMap::new();
    for row in rows {
        if row.focus_seconds > 0 {
            totals.active_days += 1;
        }
        totals.focus_seconds += row.focus_seconds;
        totals.timeout_seconds += row.timeout_seconds;
        totals.distraction_seconds += row.distraction_seconds;
        totals.completed_cycles += row.completed_cycles;
        for (host, secs) in &row.top_distractions {
            *hosts.entry(host.clone()).or_insert(0) += secs;
        }
    }
    if totals.active_days > 0 {
        totals.avg_focus_per_active_day = totals.focus_seconds / totals.active_days as u64;
    }
    totals.top_distraction = ranked(hosts).into_iter().next().map(|(host, _)| host);
    totals
}
