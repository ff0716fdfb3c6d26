//! Running a collection of scenarios against one baseline

use crate::apply::apply_scenario;
use crate::config::{ScenarioConfig, ScenarioDefaults};
use crate::data::Forecast;
use crate::error::{Result, ScenarioError};
use crate::scenario::ScenarioSpec;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Scenario forecasts keyed by name, in insertion order
///
/// Inserting an existing name replaces its forecast in place, so the entry
/// keeps the position of its first occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioForecasts {
    entries: IndexMap<String, Forecast>,
}

impl ScenarioForecasts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a forecast, returning the one it replaced
    pub fn insert(&mut self, name: impl Into<String>, forecast: Forecast) -> Option<Forecast> {
        self.entries.insert(name.into(), forecast)
    }

    pub fn get(&self, name: &str) -> Option<&Forecast> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Forecast)> {
        self.entries
            .iter()
            .map(|(name, forecast)| (name.as_str(), forecast))
    }
}

/// Scenario that could not be computed
#[derive(Debug)]
pub struct ScenarioFailure {
    pub name: String,
    pub error: ScenarioError,
}

/// Result of a batch run that keeps going past failing scenarios
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub forecasts: ScenarioForecasts,
    pub failures: Vec<ScenarioFailure>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, name: &str, result: Result<Forecast>) {
        match result {
            Ok(forecast) => {
                if self.forecasts.insert(name, forecast).is_some() {
                    log::warn!("Scenario '{}' defined more than once, keeping the last", name);
                }
            }
            Err(error) => {
                log::warn!("Skipping scenario '{}': {}", name, error);
                self.failures.push(ScenarioFailure {
                    name: name.to_string(),
                    error,
                });
            }
        }
    }
}

/// Apply every scenario, stopping at the first failure
///
/// The error names the scenario that failed. Duplicate names overwrite
/// earlier results.
pub fn apply_all(
    baseline: &Forecast,
    scenarios: &[ScenarioSpec],
    start_date: DateTime<Utc>,
) -> Result<ScenarioForecasts> {
    let mut forecasts = ScenarioForecasts::new();
    for scenario in scenarios {
        let forecast = apply_scenario(baseline, scenario, start_date)
            .map_err(|e| e.for_scenario(scenario.name()))?;
        if forecasts.insert(scenario.name(), forecast).is_some() {
            log::warn!(
                "Scenario '{}' defined more than once, keeping the last",
                scenario.name()
            );
        }
    }

    log::info!("Computed {} scenario forecasts", forecasts.len());
    Ok(forecasts)
}

/// Apply every scenario, collecting failures by name instead of stopping
pub fn apply_each(
    baseline: &Forecast,
    scenarios: &[ScenarioSpec],
    start_date: DateTime<Utc>,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for scenario in scenarios {
        outcome.record(
            scenario.name(),
            apply_scenario(baseline, scenario, start_date),
        );
    }

    log::info!(
        "Computed {} scenario forecasts, {} failed",
        outcome.forecasts.len(),
        outcome.failures.len()
    );
    outcome
}

/// Resolve and apply configured scenarios, collecting failures by name
///
/// Entries with an unknown mode or invalid parameters are reported as
/// failures; the remaining scenarios are still computed.
pub fn apply_configs(
    baseline: &Forecast,
    configs: &[ScenarioConfig],
    defaults: &ScenarioDefaults,
    start_date: DateTime<Utc>,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for config in configs {
        let result = config
            .resolve(defaults)
            .and_then(|scenario| apply_scenario(baseline, &scenario, start_date));
        outcome.record(&config.name, result);
    }

    log::info!(
        "Computed {} of {} configured scenarios",
        outcome.forecasts.len(),
        configs.len()
    );
    outcome
}
