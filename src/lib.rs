//! # Scenario Owl
//!
//! `scenario_owl_workspace` bundles the scenario forecasting crates:
//!
//! - [`effect_math`]: effect curve math on elapsed months
//! - [`scenario_forecast`]: scenarios, batch runs and summaries over forecasts
//!
//! ## Example
//!
//! ```
//! use scenario_owl_workspace::effect_math::EffectCurve;
//!
//! let curve = EffectCurve::new(1.0, 3.0, 0.01, 500.0).unwrap();
//! assert_eq!(curve.value_at(0.5), 0.0);
//! assert_eq!(curve.value_at(4.0), 500.0);
//! ```

pub use effect_math;
pub use scenario_forecast;

pub use scenario_forecast::{
    apply_all, apply_scenario, build_summary, Forecast, ScenarioError, ScenarioSpec, Timeline,
};
