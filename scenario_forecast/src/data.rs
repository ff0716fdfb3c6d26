//! Forecast and history data handling
//!
//! A [`Forecast`] is columnar: one shared [`Timeline`] and three aligned
//! series (point estimate, lower bound, upper bound). Scenario forecasts hold
//! the very same `Arc<Timeline>` as the baseline they were derived from.

use crate::error::{Result, ScenarioError};
use crate::utils::date_parser;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

/// Strictly increasing sequence of timestamps
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    timestamps: Vec<DateTime<Utc>>,
}

impl Timeline {
    /// Create a timeline, rejecting duplicate or out-of-order timestamps
    pub fn new(timestamps: Vec<DateTime<Utc>>) -> Result<Self> {
        if let Some(pos) = timestamps.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ScenarioError::DataError(format!(
                "Timeline must be strictly increasing: {} is followed by {}",
                timestamps[pos],
                timestamps[pos + 1]
            )));
        }

        Ok(Self { timestamps })
    }

    /// Regular timeline of `periods` steps of `step` starting at `start`
    pub fn regular(start: DateTime<Utc>, periods: usize, step: Duration) -> Result<Self> {
        if step <= Duration::zero() {
            return Err(ScenarioError::InvalidParameter(
                "Timeline step must be positive".to_string(),
            ));
        }

        let mut timestamps = Vec::with_capacity(periods);
        let mut current = start;
        for _ in 0..periods {
            timestamps.push(current);
            current += step;
        }

        Ok(Self { timestamps })
    }

    pub fn as_slice(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn first(&self) -> Option<DateTime<Utc>> {
        self.timestamps.first().copied()
    }

    pub fn last(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Indices of timestamps inside `[start, end]`, both ends inclusive
    pub fn window_indices(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Iterator<Item = usize> + '_ {
        self.timestamps
            .iter()
            .enumerate()
            .filter(move |(_, ts)| **ts >= start && **ts <= end)
            .map(|(i, _)| i)
    }
}

/// One row of a forecast, laid out like Prophet output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub ds: DateTime<Utc>,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

/// Point forecast with lower and upper bounds over a timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    timeline: Arc<Timeline>,
    point: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Forecast {
    /// Create a forecast from aligned series
    ///
    /// Every value must be finite and satisfy `lower <= point <= upper`.
    pub fn new(
        timeline: Timeline,
        point: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    ) -> Result<Self> {
        let n = timeline.len();
        if point.len() != n || lower.len() != n || upper.len() != n {
            return Err(ScenarioError::DataError(format!(
                "Series lengths (point {}, lower {}, upper {}) don't match timeline length ({})",
                point.len(),
                lower.len(),
                upper.len(),
                n
            )));
        }

        for i in 0..n {
            let (p, l, u) = (point[i], lower[i], upper[i]);
            if !(p.is_finite() && l.is_finite() && u.is_finite()) {
                return Err(ScenarioError::DataError(format!(
                    "Non-finite forecast value at {}",
                    timeline.as_slice()[i]
                )));
            }
            if l > p || p > u {
                return Err(ScenarioError::DataError(format!(
                    "Bounds out of order at {}: lower {} point {} upper {}",
                    timeline.as_slice()[i],
                    l,
                    p,
                    u
                )));
            }
        }

        Ok(Self {
            timeline: Arc::new(timeline),
            point,
            lower,
            upper,
        })
    }

    /// Create a forecast from rows in any order
    ///
    /// Rows are sorted by timestamp; two rows with the same timestamp are
    /// rejected.
    pub fn from_rows(rows: &[ForecastRow]) -> Result<Self> {
        let mut rows = rows.to_vec();
        rows.sort_by_key(|r| r.ds);
        if let Some(pair) = rows.windows(2).find(|w| w[0].ds == w[1].ds) {
            return Err(ScenarioError::DataError(format!(
                "Duplicate forecast timestamp: {}",
                pair[0].ds
            )));
        }

        let timeline = Timeline::new(rows.iter().map(|r| r.ds).collect())?;
        Self::new(
            timeline,
            rows.iter().map(|r| r.yhat).collect(),
            rows.iter().map(|r| r.yhat_lower).collect(),
            rows.iter().map(|r| r.yhat_upper).collect(),
        )
    }

    /// Derive a forecast sharing this forecast's timeline
    pub(crate) fn derive(&self, point: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Self {
        debug_assert_eq!(point.len(), self.len());
        Self {
            timeline: Arc::clone(&self.timeline),
            point,
            lower,
            upper,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Whether both forecasts hold the same timeline instance
    pub fn shares_timeline_with(&self, other: &Forecast) -> bool {
        Arc::ptr_eq(&self.timeline, &other.timeline)
    }

    pub fn point(&self) -> &[f64] {
        &self.point
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    pub fn len(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Mean of the point estimates, zero for an empty forecast
    pub fn mean_point(&self) -> f64 {
        effect_math::mean(&self.point)
    }

    /// Sum of point estimates with timestamps inside `[start, end]`
    pub fn window_total(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
        self.timeline
            .window_indices(start, end)
            .map(|i| self.point[i])
            .sum()
    }

    /// Rows of the forecast in timeline order
    pub fn rows(&self) -> Vec<ForecastRow> {
        self.timeline
            .as_slice()
            .iter()
            .enumerate()
            .map(|(i, &ds)| ForecastRow {
                ds,
                yhat: self.point[i],
                yhat_lower: self.lower[i],
                yhat_upper: self.upper[i],
            })
            .collect()
    }
}

/// Observed value of the target series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub ds: DateTime<Utc>,
    pub y: f64,
}

/// Historical observations preceding the forecast period
#[derive(Debug, Clone, PartialEq, Default)]
pub struct History {
    points: Vec<HistoryPoint>,
}

impl History {
    /// Create a history; points are sorted by timestamp
    pub fn new(mut points: Vec<HistoryPoint>) -> Self {
        points.sort_by_key(|p| p.ds);
        Self { points }
    }

    pub fn points(&self) -> &[HistoryPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of observations inside `[start, end]`, or `None` when no
    /// observation falls in the range
    pub fn total_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<f64> {
        let mut in_range = self
            .points
            .iter()
            .filter(|p| p.ds >= start && p.ds <= end)
            .peekable();
        in_range.peek()?;
        Some(in_range.map(|p| p.y).sum())
    }
}

#[derive(Debug, Deserialize)]
struct ForecastRecord {
    ds: String,
    yhat: f64,
    yhat_lower: f64,
    yhat_upper: f64,
}

#[derive(Debug, Deserialize)]
struct HistoryRecord {
    ds: String,
    y: f64,
}

#[derive(Debug, Serialize)]
struct ForecastOutputRecord {
    ds: String,
    yhat: f64,
    yhat_lower: f64,
    yhat_upper: f64,
}

/// Loader for forecast and history CSV files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a forecast from a CSV file with `ds,yhat,yhat_lower,yhat_upper` columns
    pub fn forecast_from_csv<P: AsRef<Path>>(path: P) -> Result<Forecast> {
        let file = File::open(path)?;
        Self::forecast_from_reader(file)
    }

    /// Load a forecast from any CSV reader
    pub fn forecast_from_reader<R: Read>(reader: R) -> Result<Forecast> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut rows = Vec::new();
        for record in csv_reader.deserialize() {
            let record: ForecastRecord = record?;
            rows.push(ForecastRow {
                ds: date_parser::parse_date(&record.ds)?,
                yhat: record.yhat,
                yhat_lower: record.yhat_lower,
                yhat_upper: record.yhat_upper,
            });
        }

        log::debug!("Loaded {} forecast rows", rows.len());
        Forecast::from_rows(&rows)
    }

    /// Load observations from a CSV file with `ds,y` columns
    pub fn history_from_csv<P: AsRef<Path>>(path: P) -> Result<History> {
        let file = File::open(path)?;
        Self::history_from_reader(file)
    }

    /// Load observations from any CSV reader
    pub fn history_from_reader<R: Read>(reader: R) -> Result<History> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut points = Vec::new();
        for record in csv_reader.deserialize() {
            let record: HistoryRecord = record?;
            points.push(HistoryPoint {
                ds: date_parser::parse_date(&record.ds)?,
                y: record.y,
            });
        }

        log::debug!("Loaded {} history rows", points.len());
        Ok(History::new(points))
    }
}

/// Write a forecast as `ds,yhat,yhat_lower,yhat_upper` CSV
pub fn write_forecast_csv<W: Write>(forecast: &Forecast, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in forecast.rows() {
        csv_writer.serialize(ForecastOutputRecord {
            ds: date_parser::format_date(&row.ds),
            yhat: row.yhat,
            yhat_lower: row.yhat_lower,
            yhat_upper: row.yhat_upper,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
