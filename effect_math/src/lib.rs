//! # Effect Math
//!
//! Mathematical building blocks for intervention scenarios.
//! This crate turns elapsed time and timing parameters into additive effect
//! values: a delay, a logistic acceleration ramp and a linear plateau.

use thiserror::Error;

pub mod curve;
pub mod timing;

pub use curve::{EffectCurve, Phase};
pub use timing::{months_between_days, AVG_DAYS_PER_MONTH};

/// Errors that can occur in effect calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate acceleration window: {0} months (must be positive)")]
    DegenerateWindow(f64),
}

/// Result type for effect math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Arithmetic mean of a series. An empty series has a mean of zero.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Percentage change of `value` relative to `reference`.
///
/// A zero reference yields `0.0` rather than an infinite or NaN result.
pub fn percent_change(value: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    (value - reference) / reference * 100.0
}
