//! Current-vs-prior windowed KPIs with trend sparklines, plus the daily
//! activity timeline the sparklines are drawn from.
//!
//! Both windows hang off a single reference instant captured once per
//! invocation: current is `(now − w, now]`, previous is `(now − 2w,
//! now − w]`. The windows slide with the instant and are never aligned to
//! calendar months; realigning them changes growth figures near month
//! boundaries.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::stats::{growth_percent, safe_div};
use crate::timezone::{date_key, local_date};
use crate::types::{AttendanceRecord, AttendanceStatus, SalesRecord};

/// Sparkline length: the last 7 daily values of the current window.
pub const SPARKLINE_LEN: usize = 7;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiResult {
    pub current: f64,
    pub previous: f64,
    pub growth_percent: f64,
    pub sparkline: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSet {
    pub revenue: KpiResult,
    pub transactions: KpiResult,
    pub avg_ticket: KpiResult,
    pub check_ins: KpiResult,
    pub active_employees: KpiResult,
}

/// One calendar day of the current window. Days without events are
/// zero-filled so the timeline always has exactly `window_days` entries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub date: String,
    pub check_ins: u64,
    pub check_outs: u64,
    pub revenue: f64,
    pub transactions: u64,
    pub active_employees: u64,
    pub avg_ticket: f64,
}

#[derive(Debug)]
pub struct WindowedMetrics {
    pub kpis: KpiSet,
    pub timeline: Vec<DailyActivity>,
}

#[derive(Debug, Default)]
struct WindowTotals {
    revenue: f64,
    transactions: u64,
    check_ins: u64,
    employees: HashSet<String>,
}

#[derive(Debug, Default)]
struct DayBucket {
    check_ins: u64,
    check_outs: u64,
    revenue: f64,
    transactions: u64,
    employees: HashSet<String>,
}

fn in_window(ts: DateTime<Utc>, start_exclusive: DateTime<Utc>, end_inclusive: DateTime<Utc>) -> bool {
    ts > start_exclusive && ts <= end_inclusive
}

fn kpi(current: f64, previous: f64, sparkline: Vec<f64>) -> KpiResult {
    KpiResult { current, previous, growth_percent: growth_percent(current, previous), sparkline }
}

fn sparkline_of<F>(days: &[&DayBucket], value: F) -> Vec<f64>
where
    F: Fn(&DayBucket) -> f64,
{
    let skip = days.len().saturating_sub(SPARKLINE_LEN);
    days.iter().skip(skip).map(|&bucket| value(bucket)).collect()
}

/// Compute the five KPI pairs and the zero-filled daily timeline.
pub fn compute_windowed_metrics(
    attendance: &[AttendanceRecord],
    sales: &[SalesRecord],
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> WindowedMetrics {
    let window = Duration::days(config.window_days);
    let current_start = now - window;
    let previous_start = current_start - window;

    // Seed one bucket per calendar day of the current window, in the
    // configured zone, so sparse data still yields a dense timeline.
    let today = local_date(now, config.timezone);
    let mut buckets: BTreeMap<String, DayBucket> = BTreeMap::new();
    for offset in 0..config.window_days {
        let date = today - Duration::days(offset);
        buckets.insert(date_key(date), DayBucket::default());
    }

    let mut current = WindowTotals::default();
    let mut previous = WindowTotals::default();

    for record in attendance {
        let ts = record.timestamp_utc;
        if record.status != AttendanceStatus::CheckIn {
            // Check-outs never count toward "active" but do show on the timeline.
            if in_window(ts, current_start, now) {
                if let Some(bucket) = buckets.get_mut(&record.day_key) {
                    bucket.check_outs += 1;
                }
            }
            continue;
        }
        if in_window(ts, current_start, now) {
            current.check_ins += 1;
            current.employees.insert(record.employee_name.clone());
            if let Some(bucket) = buckets.get_mut(&record.day_key) {
                bucket.check_ins += 1;
                bucket.employees.insert(record.employee_name.clone());
            }
        } else if in_window(ts, previous_start, current_start) {
            previous.check_ins += 1;
            previous.employees.insert(record.employee_name.clone());
        }
    }

    for record in sales {
        let ts = record.timestamp_utc;
        if in_window(ts, current_start, now) {
            current.revenue += record.total;
            current.transactions += 1;
            if let Some(bucket) = buckets.get_mut(&record.day_key) {
                bucket.revenue += record.total;
                bucket.transactions += 1;
            }
        } else if in_window(ts, previous_start, current_start) {
            previous.revenue += record.total;
            previous.transactions += 1;
        }
    }

    let days: Vec<&DayBucket> = buckets.values().collect();
    let kpis = KpiSet {
        revenue: kpi(
            current.revenue,
            previous.revenue,
            sparkline_of(&days, |b| b.revenue),
        ),
        transactions: kpi(
            current.transactions as f64,
            previous.transactions as f64,
            sparkline_of(&days, |b| b.transactions as f64),
        ),
        avg_ticket: kpi(
            safe_div(current.revenue, current.transactions as f64),
            safe_div(previous.revenue, previous.transactions as f64),
            sparkline_of(&days, |b| safe_div(b.revenue, b.transactions as f64)),
        ),
        check_ins: kpi(
            current.check_ins as f64,
            previous.check_ins as f64,
            sparkline_of(&days, |b| b.check_ins as f64),
        ),
        active_employees: kpi(
            current.employees.len() as f64,
            previous.employees.len() as f64,
            sparkline_of(&days, |b| b.employees.len() as f64),
        ),
    };

    let timeline = buckets
        .into_iter()
        .map(|(date, bucket)| DailyActivity {
            date,
            check_ins: bucket.check_ins,
            check_outs: bucket.check_outs,
            revenue: bucket.revenue,
            transactions: bucket.transactions,
            active_employees: bucket.employees.len() as u64,
            avg_ticket: safe_div(bucket.revenue, bucket.transactions as f64),
        })
        .collect();

    WindowedMetrics { kpis, timeline }
}
