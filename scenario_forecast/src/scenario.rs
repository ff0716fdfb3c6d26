//! Scenario definitions
//!
//! A scenario is either a numeric intervention (spend, content and backlink
//! levers with per-unit coefficients) or a percentage target relative to the
//! baseline mean. Rates and uplifts are stored as fractions; percentages only
//! appear at the configuration boundary and in descriptions.

use crate::error::{Result, ScenarioError};
use serde::Serialize;

/// Plateau growth used by percentage scenarios, as a fraction per month
pub const PERCENTAGE_PLATEAU_RATE: f64 = 0.005;

/// Spend is expressed per this many currency units in the spend coefficient
pub const SPEND_UNIT: f64 = 1000.0;

/// Monthly intervention magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Levers {
    /// Monthly spend in currency units
    pub spend: f64,
    /// Content pieces per month
    pub content: f64,
    /// Backlinks per month
    pub backlinks: f64,
}

/// Traffic effect per unit of each lever
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Coefficients {
    /// Traffic per 1000 currency units of monthly spend
    pub spend: f64,
    /// Traffic per content piece
    pub content: f64,
    /// Traffic per backlink
    pub backlinks: f64,
}

impl Levers {
    /// Maximum effect reached by these levers under `coefficients`
    pub fn max_effect(&self, coefficients: &Coefficients) -> f64 {
        let spend_effect = (self.spend / SPEND_UNIT) * coefficients.spend;
        let content_effect = self.content * coefficients.content;
        let backlinks_effect = self.backlinks * coefficients.backlinks;
        spend_effect + content_effect + backlinks_effect
    }
}

/// Variant-specific scenario parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ScenarioKind {
    /// Lever-driven intervention
    Numeric {
        levers: Levers,
        coefficients: Coefficients,
        delay_months: f64,
        accel_months: f64,
        /// Fraction of the maximum effect added per month in the plateau
        plateau_rate: f64,
    },
    /// Target uplift relative to the baseline mean
    Percentage {
        /// Target uplift as a fraction (0.25 for +25%)
        uplift: f64,
        delay_months: f64,
        ramp_months: f64,
    },
}

/// Named scenario, validated on construction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSpec {
    name: String,
    #[serde(flatten)]
    kind: ScenarioKind,
}

impl ScenarioSpec {
    /// Create a numeric intervention scenario
    pub fn numeric(
        name: impl Into<String>,
        levers: Levers,
        coefficients: Coefficients,
        delay_months: f64,
        accel_months: f64,
        plateau_rate: f64,
    ) -> Result<Self> {
        for (label, value) in [
            ("spend", levers.spend),
            ("content", levers.content),
            ("backlinks", levers.backlinks),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScenarioError::InvalidParameter(format!(
                    "Lever '{}' must be a non-negative monthly quantity, got {}",
                    label, value
                )));
            }
        }
        for (label, value) in [
            ("spend", coefficients.spend),
            ("content", coefficients.content),
            ("backlinks", coefficients.backlinks),
        ] {
            if !value.is_finite() {
                return Err(ScenarioError::InvalidParameter(format!(
                    "Coefficient '{}' must be finite",
                    label
                )));
            }
        }
        validate_timing(delay_months, accel_months)?;
        if !plateau_rate.is_finite() || plateau_rate < 0.0 {
            return Err(ScenarioError::InvalidParameter(format!(
                "Plateau rate must be a non-negative fraction per month, got {}",
                plateau_rate
            )));
        }

        Ok(Self {
            name: name.into(),
            kind: ScenarioKind::Numeric {
                levers,
                coefficients,
                delay_months,
                accel_months,
                plateau_rate,
            },
        })
    }

    /// Create a percentage target scenario; `uplift` is a fraction
    pub fn percentage(
        name: impl Into<String>,
        uplift: f64,
        delay_months: f64,
        ramp_months: f64,
    ) -> Result<Self> {
        if !uplift.is_finite() {
            return Err(ScenarioError::InvalidParameter(
                "Uplift must be finite".to_string(),
            ));
        }
        validate_timing(delay_months, ramp_months)?;

        Ok(Self {
            name: name.into(),
            kind: ScenarioKind::Percentage {
                uplift,
                delay_months,
                ramp_months,
            },
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ScenarioKind {
        &self.kind
    }

    /// Mode name as used in configuration files
    pub fn mode(&self) -> &'static str {
        match self.kind {
            ScenarioKind::Numeric { .. } => "numeric",
            ScenarioKind::Percentage { .. } => "percentage",
        }
    }

    /// Human-readable description of the configured parameters
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match &self.kind {
            ScenarioKind::Numeric {
                levers,
                coefficients,
                delay_months,
                accel_months,
                plateau_rate,
            } => {
                lines.push("Mode: Numeric".to_string());
                lines.push("Interventions:".to_string());
                lines.push(format!("- Budget: ${}/month", group_thousands(levers.spend)));
                lines.push(format!("- Content: {:.0} pieces/month", levers.content));
                lines.push(format!("- Backlinks: {:.0}/month", levers.backlinks));
                lines.push("Impact Coefficients:".to_string());
                lines.push(format!(
                    "- Traffic per $1000 budget: {:.0}",
                    coefficients.spend
                ));
                lines.push(format!("- Traffic per article: {:.0}", coefficients.content));
                lines.push(format!(
                    "- Traffic per backlink: {:.0}",
                    coefficients.backlinks
                ));
                lines.push("Timing:".to_string());
                lines.push(format!("- Delay: {:.1} months", delay_months));
                lines.push(format!("- Acceleration period: {:.1} months", accel_months));
                lines.push(format!(
                    "- Plateau growth rate: {:.1}%/month",
                    plateau_rate * 100.0
                ));
            }
            ScenarioKind::Percentage {
                uplift,
                delay_months,
                ramp_months,
            } => {
                lines.push("Mode: Percentage".to_string());
                lines.push("Target:".to_string());
                lines.push(format!("- Traffic increase: {:.0}%", uplift * 100.0));
                lines.push("Timing:".to_string());
                lines.push(format!("- Delay: {:.1} months", delay_months));
                lines.push(format!("- Ramp-up duration: {:.1} months", ramp_months));
            }
        }
        lines
    }
}

fn validate_timing(delay_months: f64, accel_months: f64) -> Result<()> {
    if !accel_months.is_finite() || accel_months <= 0.0 {
        return Err(ScenarioError::DegenerateAccelerationWindow(accel_months));
    }
    if !delay_months.is_finite() || delay_months < 0.0 {
        return Err(ScenarioError::InvalidParameter(format!(
            "Delay must be a non-negative number of months, got {}",
            delay_months
        )));
    }
    Ok(())
}

/// Round to a whole number and group digits by thousands: 12500.4 -> "12,500"
fn group_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, c) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0.0 && rounded != "0" {
        grouped.insert(0, '-');
    }
    grouped
}
