//! Baseline vs scenario totals over a reporting window

use crate::batch::ScenarioForecasts;
use crate::data::Forecast;
use crate::error::Result;
use chrono::{DateTime, Utc};
use effect_math::percent_change;
use serde::Serialize;
use std::io::Write;

/// Name of the baseline row
pub const BASELINE_ROW: &str = "Baseline";

/// One row of the scenario summary table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub scenario: String,
    /// Sum of point estimates inside the window
    pub total: f64,
    /// `total - baseline_total`
    pub difference: f64,
    /// Percent change vs the baseline total, zero when the baseline total is zero
    pub pct_change: f64,
    /// Percent change as displayed, e.g. `+12.5%`
    pub pct_change_label: String,
}

impl SummaryRow {
    /// Total rounded to a whole number
    pub fn rounded_total(&self) -> i64 {
        self.total.round() as i64
    }

    /// Difference rounded to a whole number
    pub fn rounded_difference(&self) -> i64 {
        self.difference.round() as i64
    }
}

/// Format a percent change with an explicit sign and one decimal
pub fn format_pct_change(pct: f64) -> String {
    format!("{:+.1}%", pct)
}

/// Build the summary table: baseline row first, then scenarios in order
///
/// Window bounds are inclusive. A window that selects no timestamps gives
/// zero totals.
pub fn build_summary(
    baseline: &Forecast,
    scenarios: &ScenarioForecasts,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<SummaryRow> {
    let baseline_total = baseline.window_total(window_start, window_end);

    let mut rows = Vec::with_capacity(scenarios.len() + 1);
    rows.push(SummaryRow {
        scenario: BASELINE_ROW.to_string(),
        total: baseline_total,
        difference: 0.0,
        pct_change: 0.0,
        pct_change_label: "0.0%".to_string(),
    });

    for (name, forecast) in scenarios.iter() {
        let total = forecast.window_total(window_start, window_end);
        let pct = percent_change(total, baseline_total);
        rows.push(SummaryRow {
            scenario: name.to_string(),
            total,
            difference: total - baseline_total,
            pct_change: pct,
            pct_change_label: format_pct_change(pct),
        });
    }

    rows
}

#[derive(Debug, Serialize)]
struct SummaryRecord<'a> {
    #[serde(rename = "Scenario")]
    scenario: &'a str,
    #[serde(rename = "Total")]
    total: i64,
    #[serde(rename = "Difference vs Baseline")]
    difference: i64,
    #[serde(rename = "% Change")]
    pct_change: &'a str,
}

/// Write the summary table as CSV with rounded totals
pub fn write_summary_csv<W: Write>(rows: &[SummaryRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(SummaryRecord {
            scenario: &row.scenario,
            total: row.rounded_total(),
            difference: row.rounded_difference(),
            pct_change: &row.pct_change_label,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Render the summary as a fixed-width text table
pub fn render_summary_table(rows: &[SummaryRow]) -> String {
    let name_width = rows
        .iter()
        .map(|r| r.scenario.chars().count())
        .chain(std::iter::once("Scenario".len()))
        .max()
        .unwrap_or(8);

    let mut out = format!(
        "{:<name_width$}  {:>14}  {:>22}  {:>9}\n",
        "Scenario", "Total", "Difference vs Baseline", "% Change"
    );
    for row in rows {
        out.push_str(&format!(
            "{:<name_width$}  {:>14}  {:>22}  {:>9}\n",
            row.scenario,
            row.rounded_total(),
            row.rounded_difference(),
            row.pct_change_label
        ));
    }
    out
}
