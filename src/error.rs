//! Engine configuration errors.
//!
//! Only construction-time configuration problems are errors. Malformed
//! input records are absorbed at the normalization boundary (dropped and
//! counted), and degenerate arithmetic falls back to defined zero values,
//! so nothing at computation time returns a `Result`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown or unsupported time zone: {0}")]
    InvalidTimezone(String),

    #[error("window length must be positive, got {0}")]
    InvalidWindowLength(i64),

    #[error("rollup cap must be at least 1")]
    InvalidRollupCap,
}
