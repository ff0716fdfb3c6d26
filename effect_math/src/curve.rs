//! Effect curve with a delay, a logistic acceleration ramp and a linear plateau
//!
//! The curve is evaluated on elapsed months since the intervention start:
//! - Delay: no effect at all
//! - Acceleration: S-curve centered on the middle of the window
//! - Plateau: the full effect plus linear growth at `plateau_rate` per month

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Numerator of the logistic steepness, `k = STEEPNESS_SCALE / accel_months`
pub const STEEPNESS_SCALE: f64 = 8.0;

/// Phase of the effect curve a point in time falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Before the intervention has any effect
    Delay,
    /// Logistic ramp towards the maximum effect
    Acceleration,
    /// Maximum effect reached, growing linearly
    Plateau,
}

/// Effect curve parameters, validated on construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectCurve {
    delay_months: f64,
    accel_months: f64,
    plateau_rate: f64,
    max_effect: f64,
}

impl EffectCurve {
    /// Create a new effect curve
    ///
    /// `accel_months` must be strictly positive, `delay_months` and
    /// `plateau_rate` must be non-negative. `max_effect` may be negative to
    /// model a decline.
    pub fn new(
        delay_months: f64,
        accel_months: f64,
        plateau_rate: f64,
        max_effect: f64,
    ) -> Result<Self> {
        if !accel_months.is_finite() || accel_months <= 0.0 {
            return Err(MathError::DegenerateWindow(accel_months));
        }
        if !delay_months.is_finite() || delay_months < 0.0 {
            return Err(MathError::InvalidInput(format!(
                "Delay must be a non-negative number of months, got {}",
                delay_months
            )));
        }
        if !plateau_rate.is_finite() || plateau_rate < 0.0 {
            return Err(MathError::InvalidInput(format!(
                "Plateau rate must be a non-negative fraction, got {}",
                plateau_rate
            )));
        }
        if !max_effect.is_finite() {
            return Err(MathError::InvalidInput(
                "Maximum effect must be finite".to_string(),
            ));
        }

        Ok(Self {
            delay_months,
            accel_months,
            plateau_rate,
            max_effect,
        })
    }

    pub fn delay_months(&self) -> f64 {
        self.delay_months
    }

    pub fn accel_months(&self) -> f64 {
        self.accel_months
    }

    pub fn plateau_rate(&self) -> f64 {
        self.plateau_rate
    }

    pub fn max_effect(&self) -> f64 {
        self.max_effect
    }

    /// Logistic steepness of the acceleration phase
    pub fn steepness(&self) -> f64 {
        STEEPNESS_SCALE / self.accel_months
    }

    /// Elapsed months at which the plateau phase begins
    pub fn plateau_start(&self) -> f64 {
        self.delay_months + self.accel_months
    }

    /// Classify elapsed months into a curve phase
    pub fn phase_at(&self, months: f64) -> Phase {
        if months < self.delay_months {
            Phase::Delay
        } else if months < self.plateau_start() {
            Phase::Acceleration
        } else {
            Phase::Plateau
        }
    }

    /// Logistic ramp value in `(0, 1)` for `t` months into the acceleration phase
    pub fn sigmoid(&self, t: f64) -> f64 {
        let midpoint = self.accel_months / 2.0;
        1.0 / (1.0 + (-self.steepness() * (t - midpoint)).exp())
    }

    /// Effect value at the given number of elapsed months
    pub fn value_at(&self, months: f64) -> f64 {
        match self.phase_at(months) {
            Phase::Delay => 0.0,
            Phase::Acceleration => self.max_effect * self.sigmoid(months - self.delay_months),
            Phase::Plateau => {
                let months_in_plateau = months - self.plateau_start();
                self.max_effect + self.max_effect * self.plateau_rate * months_in_plateau
            }
        }
    }

    /// Evaluate the curve for every entry of `elapsed_months`, preserving order
    pub fn evaluate(&self, elapsed_months: &[f64]) -> Vec<f64> {
        elapsed_months.iter().map(|&m| self.value_at(m)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_degenerate_window() {
        assert_eq!(
            EffectCurve::new(1.0, 0.0, 0.01, 100.0),
            Err(MathError::DegenerateWindow(0.0))
        );
        assert!(matches!(
            EffectCurve::new(1.0, -2.0, 0.01, 100.0),
            Err(MathError::DegenerateWindow(_))
        ));
        assert!(EffectCurve::new(1.0, f64::NAN, 0.01, 100.0).is_err());
    }

    #[test]
    fn test_rejects_negative_delay_and_rate() {
        assert!(matches!(
            EffectCurve::new(-1.0, 3.0, 0.01, 100.0),
            Err(MathError::InvalidInput(_))
        ));
        assert!(matches!(
            EffectCurve::new(1.0, 3.0, -0.01, 100.0),
            Err(MathError::InvalidInput(_))
        ));
        assert!(EffectCurve::new(1.0, 3.0, 0.01, f64::INFINITY).is_err());
    }

    #[test]
    fn test_phases() {
        let curve = EffectCurve::new(2.0, 4.0, 0.01, 100.0).unwrap();
        assert_eq!(curve.phase_at(-1.0), Phase::Delay);
        assert_eq!(curve.phase_at(1.99), Phase::Delay);
        assert_eq!(curve.phase_at(2.0), Phase::Acceleration);
        assert_eq!(curve.phase_at(5.99), Phase::Acceleration);
        assert_eq!(curve.phase_at(6.0), Phase::Plateau);
    }

    #[test]
    fn test_delay_is_zero() {
        let curve = EffectCurve::new(2.0, 4.0, 0.01, 100.0).unwrap();
        assert_eq!(curve.value_at(0.0), 0.0);
        assert_eq!(curve.value_at(-3.0), 0.0);
        assert_eq!(curve.value_at(1.5), 0.0);
    }

    #[test]
    fn test_acceleration_midpoint_is_half() {
        let curve = EffectCurve::new(1.0, 4.0, 0.0, 200.0).unwrap();
        assert!((curve.value_at(3.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_start_of_ramp_without_delay() {
        let curve = EffectCurve::new(0.0, 2.0, 0.0, 100.0).unwrap();
        let expected = 100.0 / (1.0 + 4.0_f64.exp());
        assert!((curve.value_at(0.0) - expected).abs() < 1e-12);
        assert!(curve.value_at(0.0) > 0.0);
    }

    #[test]
    fn test_plateau_growth() {
        let curve = EffectCurve::new(1.0, 2.0, 0.05, 100.0).unwrap();
        assert!((curve.value_at(3.0) - 100.0).abs() < 1e-12);
        // two months in plateau: 100 + 100 * 0.05 * 2
        assert!((curve.value_at(5.0) - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_effect_mirrors_positive() {
        let up = EffectCurve::new(0.5, 3.0, 0.02, 40.0).unwrap();
        let down = EffectCurve::new(0.5, 3.0, 0.02, -40.0).unwrap();
        for m in [0.0, 1.0, 2.5, 3.5, 8.0] {
            assert!((up.value_at(m) + down.value_at(m)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_evaluate_preserves_alignment() {
        let curve = EffectCurve::new(1.0, 2.0, 0.0, 10.0).unwrap();
        let months = [0.0, 1.5, 4.0];
        let values = curve.evaluate(&months);
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[1], curve.value_at(1.5));
        assert_eq!(values[2], 10.0);
        assert!(curve.evaluate(&[]).is_empty());
    }
}
