//! Ratio and correlation helpers (pure math, no I/O).
//!
//! Every division in the engine goes through `safe_div` or
//! `growth_percent` so the zero-denominator branch lives in exactly one
//! place. The correlation boundaries here (0.7 / 0.4) and the
//! zero-variance fallback are behavioral contracts shared with the
//! dashboard consumers.

use serde::Serialize;

/// `numerator / denominator`, 0.0 when the denominator is zero or not finite.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    numerator / denominator
}

/// Percentage growth of `current` over `previous`.
///
/// A non-positive previous value yields 0.0, never NaN or infinity.
pub fn growth_percent(current: f64, previous: f64) -> f64 {
    if previous <= 0.0 || !previous.is_finite() {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// Pearson correlation coefficient over two same-length series.
///
/// Returns 0.0 on length mismatch, fewer than two points, or zero
/// variance in either series.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }
    let n = xs.len() as f64;
    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = xs.iter().zip(ys.iter()).map(|(x, y)| x * y).sum();
    let sum_x2: f64 = xs.iter().map(|x| x * x).sum();
    let sum_y2: f64 = ys.iter().map(|y| y * y).sum();

    let var_x = n * sum_x2 - sum_x * sum_x;
    let var_y = n * sum_y2 - sum_y * sum_y;
    if var_x <= 0.0 || var_y <= 0.0 {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / (var_x.sqrt() * var_y.sqrt())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
}

impl CorrelationStrength {
    /// `|r| > 0.7` strong, `|r| > 0.4` moderate, else weak.
    pub fn classify(r: f64) -> Self {
        let magnitude = r.abs();
        if magnitude > 0.7 {
            Self::Strong
        } else if magnitude > 0.4 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
        }
    }
}
