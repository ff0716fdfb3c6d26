//! Effect curves over forecast timelines

use crate::data::Timeline;
use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use effect_math::{months_between_days, EffectCurve};

/// Whole days from `start` to `timestamp`, floored
///
/// A timestamp twelve hours before `start` is day -1, not day 0.
pub fn elapsed_days(start: DateTime<Utc>, timestamp: DateTime<Utc>) -> i64 {
    let diff = timestamp - start;
    let days = diff.num_days();
    if diff < Duration::days(days) {
        days - 1
    } else {
        days
    }
}

/// Elapsed months since `start` for every timestamp of the timeline
pub fn elapsed_months(timeline: &Timeline, start: DateTime<Utc>) -> Vec<f64> {
    timeline
        .as_slice()
        .iter()
        .map(|&ts| months_between_days(elapsed_days(start, ts)))
        .collect()
}

/// Additive effect for each timestamp of `timeline`
///
/// Fails with `DegenerateAccelerationWindow` when `accel_months <= 0`.
pub fn compute_effect_curve(
    timeline: &Timeline,
    start_date: DateTime<Utc>,
    delay_months: f64,
    accel_months: f64,
    plateau_rate: f64,
    max_effect: f64,
) -> Result<Vec<f64>> {
    let curve = EffectCurve::new(delay_months, accel_months, plateau_rate, max_effect)?;
    Ok(curve.evaluate(&elapsed_months(timeline, start_date)))
}
