//! Applying a scenario's effect curve to a baseline forecast

use crate::data::Forecast;
use crate::effect::compute_effect_curve;
use crate::error::Result;
use crate::scenario::{ScenarioKind, ScenarioSpec, PERCENTAGE_PLATEAU_RATE};
use chrono::{DateTime, Utc};

/// Share of a positive effect added to the lower bound
pub const LOWER_BOUND_FACTOR: f64 = 0.8;

/// Share of a positive effect added to the upper bound
pub const UPPER_BOUND_FACTOR: f64 = 1.2;

/// Maximum effect of a scenario against the given baseline
pub fn max_effect(baseline: &Forecast, kind: &ScenarioKind) -> f64 {
    match kind {
        ScenarioKind::Numeric {
            levers,
            coefficients,
            ..
        } => levers.max_effect(coefficients),
        ScenarioKind::Percentage { uplift, .. } => baseline.mean_point() * uplift,
    }
}

/// Effect series of a scenario over the baseline's timeline
pub fn scenario_effect(
    baseline: &Forecast,
    scenario: &ScenarioSpec,
    start_date: DateTime<Utc>,
) -> Result<Vec<f64>> {
    let effect = max_effect(baseline, scenario.kind());
    match *scenario.kind() {
        ScenarioKind::Numeric {
            delay_months,
            accel_months,
            plateau_rate,
            ..
        } => compute_effect_curve(
            baseline.timeline(),
            start_date,
            delay_months,
            accel_months,
            plateau_rate,
            effect,
        ),
        ScenarioKind::Percentage {
            delay_months,
            ramp_months,
            ..
        } => compute_effect_curve(
            baseline.timeline(),
            start_date,
            delay_months,
            ramp_months,
            PERCENTAGE_PLATEAU_RATE,
            effect,
        ),
    }
}

/// Bound shifts `(lower, upper)` for an effect value
///
/// Positive effects widen the band by 0.8x below and 1.2x above. For negative
/// effects the factors swap so the lower bound keeps moving further down than
/// the point and bounds stay ordered.
pub fn bound_shifts(effect: f64) -> (f64, f64) {
    if effect >= 0.0 {
        (effect * LOWER_BOUND_FACTOR, effect * UPPER_BOUND_FACTOR)
    } else {
        (effect * UPPER_BOUND_FACTOR, effect * LOWER_BOUND_FACTOR)
    }
}

/// Derive a scenario forecast from the baseline
///
/// The result shares the baseline's timeline. `start_date` is the forecast
/// period start from which the scenario's delay is measured.
pub fn apply_scenario(
    baseline: &Forecast,
    scenario: &ScenarioSpec,
    start_date: DateTime<Utc>,
) -> Result<Forecast> {
    let effect = scenario_effect(baseline, scenario, start_date)?;

    let mut point = Vec::with_capacity(effect.len());
    let mut lower = Vec::with_capacity(effect.len());
    let mut upper = Vec::with_capacity(effect.len());
    for (i, &e) in effect.iter().enumerate() {
        let (lower_shift, upper_shift) = bound_shifts(e);
        point.push(baseline.point()[i] + e);
        lower.push(baseline.lower()[i] + lower_shift);
        upper.push(baseline.upper()[i] + upper_shift);
    }

    log::debug!(
        "Applied {} scenario '{}' over {} timestamps",
        scenario.mode(),
        scenario.name(),
        effect.len()
    );

    Ok(baseline.derive(point, lower, upper))
}
