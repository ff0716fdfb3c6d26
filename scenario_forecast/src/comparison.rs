//! Forecast totals compared with matching historical periods

use crate::data::{Forecast, History};
use chrono::{DateTime, Duration, Utc};
use effect_math::percent_change;
use serde::Serialize;

/// Historical range compared against the forecast window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Sum of observations in the range
    pub total: f64,
    /// Forecast total minus historical total
    pub difference: f64,
    /// Percent change, zero when the historical total is zero
    pub pct_change: f64,
}

/// Forecast window total and its comparison with history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastComparison {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    /// Window length in days, counting both ends
    pub window_days: i64,
    pub forecast_total: f64,
    /// Same number of days immediately before the window
    pub previous_period: Option<PeriodComparison>,
    /// Same window one year (365 days) earlier
    pub previous_year: Option<PeriodComparison>,
}

/// First forecast timestamp after the last observation in `history`
///
/// Baselines often carry their fitted history rows; this is where the
/// forecast period proper begins. `None` when history is empty or the
/// forecast ends before history does.
pub fn forecast_period_start(history: &History, forecast: &Forecast) -> Option<DateTime<Utc>> {
    let last_observed = history.points().last()?.ds;
    forecast
        .timeline()
        .as_slice()
        .iter()
        .copied()
        .find(|ts| *ts > last_observed)
}

/// Compare the forecast total over `[window_start, window_end]` with history
///
/// A comparison is `None` when no observation falls in its range. The
/// previous-year comparison is skipped when its range coincides with the
/// previous period.
pub fn compare_with_history(
    history: &History,
    forecast: &Forecast,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> ForecastComparison {
    let forecast_total = forecast.window_total(window_start, window_end);
    let duration_days = (window_end - window_start).num_days();

    let previous_start = window_start - Duration::days(duration_days);
    let previous_end = window_start - Duration::days(1);
    let previous_period = period(history, forecast_total, previous_start, previous_end);

    let year_start = window_start - Duration::days(365);
    let year_end = window_end - Duration::days(365);
    let previous_year = if year_start == previous_start {
        None
    } else {
        period(history, forecast_total, year_start, year_end)
    };

    ForecastComparison {
        window_start,
        window_end,
        window_days: duration_days + 1,
        forecast_total,
        previous_period,
        previous_year,
    }
}

fn period(
    history: &History,
    forecast_total: f64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Option<PeriodComparison> {
    let total = history.total_between(start, end)?;
    Some(PeriodComparison {
        start,
        end,
        total,
        difference: forecast_total - total,
        pct_change: percent_change(forecast_total, total),
    })
}
