//! Threshold alerts over already-computed KPIs.
//!
//! Pure function of the KPI set and correlation value: no suppression,
//! deduplication, or acknowledgment state. Every call re-evaluates the
//! same fixed bounds and emits nothing outside them.

use serde::Serialize;

use crate::config::AlertThresholds;
use crate::kpi::KpiSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Info,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(rename = "type")]
    pub severity: AlertSeverity,
    pub message: String,
}

/// Evaluate the fixed alert table against computed KPIs and correlation.
pub fn evaluate(kpis: &KpiSet, correlation: f64, thresholds: &AlertThresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();

    let revenue_growth = kpis.revenue.growth_percent;
    if revenue_growth < thresholds.revenue_critical {
        alerts.push(Alert {
            severity: AlertSeverity::Critical,
            message: format!("revenue decreased by {:.1}%", revenue_growth.abs()),
        });
    } else if revenue_growth < thresholds.revenue_warning {
        alerts.push(Alert {
            severity: AlertSeverity::Warning,
            message: format!("revenue decreased by {:.1}%", revenue_growth.abs()),
        });
    }

    let checkin_growth = kpis.check_ins.growth_percent;
    if checkin_growth < thresholds.checkin_warning {
        alerts.push(Alert {
            severity: AlertSeverity::Warning,
            message: format!("check-ins decreased by {:.1}%", checkin_growth.abs()),
        });
    }

    if correlation.abs() < thresholds.low_correlation {
        alerts.push(Alert {
            severity: AlertSeverity::Info,
            message: "low correlation between check-ins and revenue".to_string(),
        });
    }

    alerts
}
