//! Utility functions for the scenario_forecast crate

/// Date parsing and formatting for forecast timestamps
pub mod date_parser {
    use crate::error::{Result, ScenarioError};
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

    /// Parse a timestamp in one of the supported layouts as UTC
    ///
    /// Accepted: RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`,
    /// `YYYY-MM-DD HH:MM`, `YYYY-MM-DD` and `MM/DD/YYYY`.
    pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
        let input = input.trim();

        if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
            return Ok(parsed.with_timezone(&Utc));
        }

        for format in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
                return Ok(naive.and_utc());
            }
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(input, format) {
                return Ok(NaiveDateTime::new(date, NaiveTime::default()).and_utc());
            }
        }

        Err(ScenarioError::DataError(format!(
            "Unrecognized date format: '{}'",
            input
        )))
    }

    /// Format a timestamp, dropping the time of day when it is midnight
    pub fn format_date(timestamp: &DateTime<Utc>) -> String {
        if timestamp.num_seconds_from_midnight() == 0 && timestamp.nanosecond() == 0 {
            timestamp.format("%Y-%m-%d").to_string()
        } else {
            timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
        }
    }
}

/// File name stem used when exporting a scenario forecast
pub fn scenario_file_stem(name: &str) -> String {
    format!("scenario_forecast_{}", name.replace(' ', "_"))
}
