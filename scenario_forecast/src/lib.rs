//! # Scenario Forecast
//!
//! What-if scenario simulation on top of a baseline time series forecast.
//!
//! ## Features
//!
//! - Effect curves with a delay, a logistic acceleration ramp and a linear plateau
//! - Numeric scenarios (spend, content and backlink levers) and percentage targets
//! - Batch runs over named scenarios with per-scenario failure reporting
//! - Summary tables comparing scenario totals with the baseline
//! - Comparison of the forecast window with matching historical periods
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use scenario_forecast::{apply_all, build_summary, Forecast, ScenarioSpec, Timeline};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let timeline = Timeline::regular(start, 90, Duration::days(1))?;
//! let baseline = Forecast::new(timeline, vec![100.0; 90], vec![90.0; 90], vec![110.0; 90])?;
//!
//! let scenarios = vec![ScenarioSpec::percentage("Growth", 0.25, 0.0, 2.0)?];
//! let forecasts = apply_all(&baseline, &scenarios, start)?;
//!
//! let end = start + Duration::days(89);
//! let summary = build_summary(&baseline, &forecasts, start, end);
//! assert_eq!(summary[0].scenario, "Baseline");
//! assert!(summary[1].difference > 0.0);
//! # Ok::<(), scenario_forecast::ScenarioError>(())
//! ```

pub mod apply;
pub mod batch;
pub mod comparison;
pub mod config;
pub mod data;
pub mod effect;
pub mod error;
pub mod scenario;
pub mod summary;
pub mod utils;

// Re-export commonly used types
pub use crate::apply::apply_scenario;
pub use crate::batch::{apply_all, apply_configs, apply_each, BatchOutcome, ScenarioForecasts};
pub use crate::comparison::{compare_with_history, forecast_period_start, ForecastComparison};
pub use crate::config::{Config, ScenarioConfig, ScenarioDefaults};
pub use crate::data::{DataLoader, Forecast, ForecastRow, History, Timeline};
pub use crate::effect::compute_effect_curve;
pub use crate::error::{Result, ScenarioError};
pub use crate::scenario::{Coefficients, Levers, ScenarioKind, ScenarioSpec};
pub use crate::summary::{build_summary, SummaryRow};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
