//! Error types for the scenario_forecast crate

use effect_math::MathError;
use thiserror::Error;

/// Custom error types for the scenario_forecast crate
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Scenario mode is neither "numeric" nor "percentage"
    #[error("Unknown scenario mode: {0}")]
    UnknownScenarioMode(String),

    /// Acceleration or ramp-up duration is zero or negative
    #[error("Degenerate acceleration window: {0} months (must be positive)")]
    DegenerateAccelerationWindow(f64),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Failure attributed to a named scenario
    #[error("Scenario '{name}' failed: {source}")]
    Scenario {
        name: String,
        #[source]
        source: Box<ScenarioError>,
    },

    /// Error from effect curve math
    #[error("Math error: {0}")]
    Math(MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV reading or writing
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error in the configuration file
    #[error("Config error: {0}")]
    ConfigError(String),
}

impl ScenarioError {
    /// Attach a scenario name to this error
    pub fn for_scenario(self, name: impl Into<String>) -> Self {
        ScenarioError::Scenario {
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// Name of the scenario this error is attributed to, if any
    pub fn scenario_name(&self) -> Option<&str> {
        match self {
            ScenarioError::Scenario { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The underlying error, looking through scenario attribution
    pub fn root(&self) -> &ScenarioError {
        match self {
            ScenarioError::Scenario { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ScenarioError>;

impl From<MathError> for ScenarioError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::DegenerateWindow(months) => {
                ScenarioError::DegenerateAccelerationWindow(months)
            }
            other => ScenarioError::Math(other),
        }
    }
}

impl From<csv::Error> for ScenarioError {
    fn from(err: csv::Error) -> Self {
        ScenarioError::CsvError(err.to_string())
    }
}

impl From<toml::de::Error> for ScenarioError {
    fn from(err: toml::de::Error) -> Self {
        ScenarioError::ConfigError(err.to_string())
    }
}
