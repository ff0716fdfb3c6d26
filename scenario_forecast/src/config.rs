//! Run configuration loaded from TOML
//!
//! ```toml
//! [forecast]
//! start_date = "2024-01-01"
//! end_date = "2024-12-31"
//!
//! [defaults]
//! budget_coefficient = 50.0
//!
//! [[scenarios]]
//! name = "Content push"
//! mode = "numeric"
//! content = 8.0
//! ```
//!
//! Percent-valued fields (`plateau_rate_pct`, `pct_increase`) are converted to
//! fractions when a scenario entry is resolved into a [`ScenarioSpec`].

use crate::error::{Result, ScenarioError};
use crate::scenario::{Coefficients, Levers, ScenarioSpec};
use crate::utils::date_parser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub forecast: ForecastWindowConfig,
    #[serde(default)]
    pub defaults: ScenarioDefaults,
    #[serde(default)]
    pub scenarios: Vec<ScenarioConfig>,
}

/// Reporting window; the start is also the scenario start date
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastWindowConfig {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDefaults {
    #[serde(default = "default_budget")]
    pub budget: f64,
    #[serde(default = "default_content")]
    pub content: f64,
    #[serde(default = "default_backlinks")]
    pub backlinks: f64,
    #[serde(default = "default_budget_coefficient")]
    pub budget_coefficient: f64,
    #[serde(default = "default_content_coefficient")]
    pub content_coefficient: f64,
    #[serde(default = "default_backlink_coefficient")]
    pub backlink_coefficient: f64,
    #[serde(default = "default_delay")]
    pub delay_months: f64,
    #[serde(default = "default_acceleration")]
    pub accel_months: f64,
    #[serde(default = "default_plateau_rate_pct")]
    pub plateau_rate_pct: f64,
    #[serde(default = "default_pct_increase")]
    pub pct_increase: f64,
    #[serde(default = "default_max_scenarios")]
    pub max_scenarios: usize,
}

/// One scenario entry as written in the configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub mode: String,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub content: Option<f64>,
    #[serde(default)]
    pub backlinks: Option<f64>,
    #[serde(default)]
    pub budget_coefficient: Option<f64>,
    #[serde(default)]
    pub content_coefficient: Option<f64>,
    #[serde(default)]
    pub backlink_coefficient: Option<f64>,
    #[serde(default)]
    pub delay_months: Option<f64>,
    #[serde(default)]
    pub accel_months: Option<f64>,
    #[serde(default)]
    pub plateau_rate_pct: Option<f64>,
    #[serde(default)]
    pub pct_increase: Option<f64>,
    #[serde(default)]
    pub duration_months: Option<f64>,
}

impl Default for ScenarioDefaults {
    fn default() -> Self {
        Self {
            budget: default_budget(),
            content: default_content(),
            backlinks: default_backlinks(),
            budget_coefficient: default_budget_coefficient(),
            content_coefficient: default_content_coefficient(),
            backlink_coefficient: default_backlink_coefficient(),
            delay_months: default_delay(),
            accel_months: default_acceleration(),
            plateau_rate_pct: default_plateau_rate_pct(),
            pct_increase: default_pct_increase(),
            max_scenarios: default_max_scenarios(),
        }
    }
}

impl ScenarioConfig {
    /// Resolve this entry into a validated scenario, filling gaps from `defaults`
    ///
    /// Fails with `UnknownScenarioMode` for any mode other than "numeric" or
    /// "percentage".
    pub fn resolve(&self, defaults: &ScenarioDefaults) -> Result<ScenarioSpec> {
        let delay_months = self.delay_months.unwrap_or(defaults.delay_months);
        match self.mode.as_str() {
            "numeric" => ScenarioSpec::numeric(
                self.name.clone(),
                Levers {
                    spend: self.budget.unwrap_or(defaults.budget),
                    content: self.content.unwrap_or(defaults.content),
                    backlinks: self.backlinks.unwrap_or(defaults.backlinks),
                },
                Coefficients {
                    spend: self
                        .budget_coefficient
                        .unwrap_or(defaults.budget_coefficient),
                    content: self
                        .content_coefficient
                        .unwrap_or(defaults.content_coefficient),
                    backlinks: self
                        .backlink_coefficient
                        .unwrap_or(defaults.backlink_coefficient),
                },
                delay_months,
                self.accel_months.unwrap_or(defaults.accel_months),
                self.plateau_rate_pct.unwrap_or(defaults.plateau_rate_pct) / 100.0,
            ),
            "percentage" => ScenarioSpec::percentage(
                self.name.clone(),
                self.pct_increase.unwrap_or(defaults.pct_increase) / 100.0,
                delay_months,
                self.duration_months.unwrap_or(defaults.accel_months),
            ),
            other => Err(ScenarioError::UnknownScenarioMode(other.to_string())),
        }
    }
}

impl Config {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_toml_str(&data)
    }

    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(data: &str) -> Result<Self> {
        let parsed: Self = toml::from_str(data)?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Check limits that don't depend on individual scenario modes
    pub fn validate(&self) -> Result<()> {
        if self.scenarios.len() > self.defaults.max_scenarios {
            return Err(ScenarioError::ConfigError(format!(
                "{} scenarios configured, at most {} allowed",
                self.scenarios.len(),
                self.defaults.max_scenarios
            )));
        }
        if let Some(blank) = self.scenarios.iter().position(|s| s.name.trim().is_empty()) {
            return Err(ScenarioError::ConfigError(format!(
                "Scenario #{} has an empty name",
                blank + 1
            )));
        }
        if let (Some(start), Some(end)) = (self.window_start()?, self.window_end()?) {
            if start > end {
                return Err(ScenarioError::ConfigError(format!(
                    "Forecast start {} is after end {}",
                    start, end
                )));
            }
        }
        Ok(())
    }

    /// Configured window start, if any
    pub fn window_start(&self) -> Result<Option<DateTime<Utc>>> {
        self.forecast
            .start_date
            .as_deref()
            .map(date_parser::parse_date)
            .transpose()
    }

    /// Configured window end, if any
    pub fn window_end(&self) -> Result<Option<DateTime<Utc>>> {
        self.forecast
            .end_date
            .as_deref()
            .map(date_parser::parse_date)
            .transpose()
    }
}

fn default_budget() -> f64 {
    5000.0
}

fn default_content() -> f64 {
    4.0
}

fn default_backlinks() -> f64 {
    10.0
}

fn default_budget_coefficient() -> f64 {
    100.0
}

fn default_content_coefficient() -> f64 {
    50.0
}

fn default_backlink_coefficient() -> f64 {
    20.0
}

fn default_delay() -> f64 {
    1.0
}

fn default_acceleration() -> f64 {
    3.0
}

fn default_plateau_rate_pct() -> f64 {
    1.0
}

fn default_pct_increase() -> f64 {
    20.0
}

fn default_max_scenarios() -> usize {
    5
}
