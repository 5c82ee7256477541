//! Engine configuration, resolved once at construction.
//!
//! An invalid time zone, window length, or rollup cap is a fatal
//! construction error rather than a silent default: a bad zone would skew
//! every day bucket, and a non-positive window would corrupt every growth
//! figure after it.

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::EngineError;
use crate::units::UnitKeywords;

/// Default IANA zone when the host does not configure one.
pub const DEFAULT_TIMEZONE: &str = "Asia/Bangkok";

/// Default KPI comparison window length in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Default top-N cap per rollup dimension.
pub const DEFAULT_ROLLUP_CAP: usize = 10;

/// Alert boundaries, in growth-percent and correlation units.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertThresholds {
    /// Revenue growth below this is critical.
    pub revenue_critical: f64,
    /// Revenue growth below this (but not critical) is a warning.
    pub revenue_warning: f64,
    /// Check-in growth below this is a warning.
    pub checkin_warning: f64,
    /// Absolute correlation below this is informational.
    pub low_correlation: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            revenue_critical: -20.0,
            revenue_warning: -10.0,
            checkin_warning: -15.0,
            low_correlation: 0.3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub timezone: Tz,
    pub window_days: i64,
    pub rollup_cap: usize,
    pub thresholds: AlertThresholds,
    /// Keyword table for unit-label classification in the sales report.
    pub unit_keywords: UnitKeywords,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Bangkok,
            window_days: DEFAULT_WINDOW_DAYS,
            rollup_cap: DEFAULT_ROLLUP_CAP,
            thresholds: AlertThresholds::default(),
            unit_keywords: UnitKeywords::default(),
        }
    }
}

impl EngineConfig {
    /// Build a config from host-supplied values, validating each.
    pub fn from_parts(
        timezone: &str,
        window_days: i64,
        rollup_cap: usize,
    ) -> Result<Self, EngineError> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| EngineError::InvalidTimezone(timezone.to_string()))?;
        if window_days <= 0 {
            return Err(EngineError::InvalidWindowLength(window_days));
        }
        if rollup_cap == 0 {
            return Err(EngineError::InvalidRollupCap);
        }
        Ok(Self {
            timezone: tz,
            window_days,
            rollup_cap,
            thresholds: AlertThresholds::default(),
            unit_keywords: UnitKeywords::default(),
        })
    }
}
