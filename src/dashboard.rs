//! Dashboard composer: one pass from raw events to the full aggregate.
//!
//! Orchestration only: every number is produced by the dedicated modules.
//! All accumulators are allocated inside the call, so concurrent
//! invocations share nothing.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::alerts::{self, Alert};
use crate::config::EngineConfig;
use crate::heatmap::{attendance_heatmap, sales_heatmap, Heatmap};
use crate::kpi::{compute_windowed_metrics, DailyActivity, KpiSet};
use crate::normalize::normalize_events;
use crate::rollup::{rollup, Dimension, RankedEntry};
use crate::stats::{pearson, CorrelationStrength};
use crate::types::{MasterData, RawEvent};

pub struct DashboardInput<'a> {
    pub events: &'a [RawEvent],
    pub master: &'a MasterData,
    pub config: &'a EngineConfig,
    /// Reference instant for both comparison windows, captured once by
    /// the caller so the windows stay stable within one invocation.
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapSet {
    pub attendance: Heatmap,
    pub sales: Heatmap,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationSummary {
    pub value: f64,
    pub strength: CorrelationStrength,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMeta {
    pub total_events: usize,
    pub attendance_records: usize,
    pub sales_records: usize,
    pub dropped_events: usize,
    pub generated_at: String,
    pub timezone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAggregate {
    pub kpis: KpiSet,
    pub timeline: Vec<DailyActivity>,
    pub heatmaps: HeatmapSet,
    pub stores: Vec<RankedEntry>,
    pub employees: Vec<RankedEntry>,
    pub products: Vec<RankedEntry>,
    pub correlation: CorrelationSummary,
    pub alerts: Vec<Alert>,
    pub meta: DashboardMeta,
}

/// Compute the full dashboard aggregate for one reporting period.
pub fn build_dashboard(input: DashboardInput) -> DashboardAggregate {
    let config = input.config;
    let normalized = normalize_events(input.events, input.master, config.timezone);

    let metrics = compute_windowed_metrics(&normalized.attendance, &normalized.sales, config, input.now);

    // Rollups and heatmaps cover the current window only.
    let current_start = input.now - Duration::days(config.window_days);
    let window_attendance: Vec<_> = normalized
        .attendance
        .iter()
        .filter(|r| r.timestamp_utc > current_start && r.timestamp_utc <= input.now)
        .cloned()
        .collect();
    let window_sales: Vec<_> = normalized
        .sales
        .iter()
        .filter(|r| r.timestamp_utc > current_start && r.timestamp_utc <= input.now)
        .cloned()
        .collect();

    let stores = rollup(Dimension::Store, &window_attendance, &window_sales, config.rollup_cap);
    let employees = rollup(Dimension::Employee, &window_attendance, &window_sales, config.rollup_cap);
    let products = rollup(Dimension::Product, &window_attendance, &window_sales, config.rollup_cap);

    let heatmaps = HeatmapSet {
        attendance: attendance_heatmap(&window_attendance),
        sales: sales_heatmap(&window_sales),
    };

    let check_in_series: Vec<f64> = metrics.timeline.iter().map(|d| d.check_ins as f64).collect();
    let revenue_series: Vec<f64> = metrics.timeline.iter().map(|d| d.revenue).collect();
    let value = pearson(&check_in_series, &revenue_series);
    let correlation = CorrelationSummary { value, strength: CorrelationStrength::classify(value) };

    let alerts = alerts::evaluate(&metrics.kpis, correlation.value, &config.thresholds);

    DashboardAggregate {
        meta: DashboardMeta {
            total_events: input.events.len(),
            attendance_records: normalized.attendance.len(),
            sales_records: normalized.sales.len(),
            dropped_events: normalized.dropped.total(),
            generated_at: input.now.to_rfc3339(),
            timezone: config.timezone.name().to_string(),
        },
        kpis: metrics.kpis,
        timeline: metrics.timeline,
        heatmaps,
        stores,
        employees,
        products,
        correlation,
        alerts,
    }
}
