use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use scenario_forecast::batch::{apply_configs, BatchOutcome};
use scenario_forecast::comparison::{
    compare_with_history, forecast_period_start, ForecastComparison,
};
use scenario_forecast::config::Config;
use scenario_forecast::data::{write_forecast_csv, DataLoader, Forecast, History};
use scenario_forecast::scenario::ScenarioSpec;
use scenario_forecast::summary::{
    build_summary, render_summary_table, write_summary_csv, SummaryRow,
};
use scenario_forecast::utils::{date_parser, scenario_file_stem};
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "scenario_report",
    about = "Overlay what-if scenarios on a baseline forecast and compare totals"
)]
struct Cli {
    /// Scenario configuration (TOML)
    #[arg(short, long)]
    config: PathBuf,
    /// Baseline forecast CSV with ds,yhat,yhat_lower,yhat_upper columns
    #[arg(short, long)]
    baseline: PathBuf,
    /// Historical observations CSV with ds,y columns
    #[arg(long)]
    history: Option<PathBuf>,
    /// Directory to export the summary and scenario forecasts to
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    /// Print the configured parameters of each scenario
    #[arg(long)]
    details: bool,
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct FailureReport {
    scenario: String,
    error: String,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    window_start: String,
    window_end: String,
    summary: &'a [SummaryRow],
    failures: Vec<FailureReport>,
    comparison: Option<&'a ForecastComparison>,
    scenarios: &'a [ScenarioSpec],
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = Config::load(&cli.config)
        .with_context(|| format!("failed loading config: {}", cli.config.display()))?;
    let baseline = DataLoader::forecast_from_csv(&cli.baseline)
        .with_context(|| format!("failed loading baseline: {}", cli.baseline.display()))?;
    let history = match &cli.history {
        Some(path) => Some(
            DataLoader::history_from_csv(path)
                .with_context(|| format!("failed loading history: {}", path.display()))?,
        ),
        None => None,
    };
    let (window_start, window_end) = reporting_window(&config, &baseline, history.as_ref())?;

    let outcome = apply_configs(&baseline, &config.scenarios, &config.defaults, window_start);
    let summary = build_summary(&baseline, &outcome.forecasts, window_start, window_end);

    let comparison = history
        .as_ref()
        .map(|history| compare_with_history(history, &baseline, window_start, window_end));

    let specs: Vec<ScenarioSpec> = config
        .scenarios
        .iter()
        .filter_map(|s| s.resolve(&config.defaults).ok())
        .collect();

    match cli.format {
        OutputFormat::Table => {
            print_failures(&outcome);
            print!("{}", render_summary_table(&summary));
            if let Some(comparison) = &comparison {
                print_comparison(comparison);
            }
            if cli.details {
                print_details(&specs);
            }
        }
        OutputFormat::Json => {
            let report = Report {
                window_start: date_parser::format_date(&window_start),
                window_end: date_parser::format_date(&window_end),
                summary: &summary,
                failures: outcome
                    .failures
                    .iter()
                    .map(|f| FailureReport {
                        scenario: f.name.clone(),
                        error: f.error.to_string(),
                    })
                    .collect(),
                comparison: comparison.as_ref(),
                scenarios: &specs,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if let Some(dir) = &cli.output {
        export(dir, &summary, &outcome)?;
    }

    Ok(())
}

/// Reporting window; its start is also the scenario start date
///
/// Without a configured `start_date` the start is the first baseline row
/// after the last history observation, so fitted history rows in the
/// baseline never receive a scenario effect.
fn reporting_window(
    config: &Config,
    baseline: &Forecast,
    history: Option<&History>,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = match (config.window_start()?, history) {
        (Some(start), _) => start,
        (None, Some(history)) => forecast_period_start(history, baseline).ok_or_else(|| {
            anyhow!("no baseline rows follow the last history observation; set [forecast].start_date")
        })?,
        (None, None) => bail!(
            "[forecast].start_date is not configured; set it or pass --history to derive it"
        ),
    };
    let end = match config.window_end()? {
        Some(end) => end,
        None => baseline
            .timeline()
            .last()
            .ok_or_else(|| anyhow!("baseline forecast is empty and no end_date is configured"))?,
    };
    if start > end {
        bail!(
            "forecast start {} is after the end of the reporting window {}",
            date_parser::format_date(&start),
            date_parser::format_date(&end)
        );
    }
    log::debug!(
        "Reporting window {} to {}",
        date_parser::format_date(&start),
        date_parser::format_date(&end)
    );
    Ok((start, end))
}

fn print_failures(outcome: &BatchOutcome) {
    for failure in &outcome.failures {
        eprintln!("Scenario '{}' skipped: {}", failure.name, failure.error);
    }
}

fn print_comparison(comparison: &ForecastComparison) {
    println!();
    println!(
        "Forecast period: {} to {} ({} days), total {}",
        date_parser::format_date(&comparison.window_start),
        date_parser::format_date(&comparison.window_end),
        comparison.window_days,
        comparison.forecast_total.round() as i64
    );
    for (label, period) in [
        ("Previous period", &comparison.previous_period),
        ("Previous year", &comparison.previous_year),
    ] {
        match period {
            Some(p) => println!(
                "{}: {} to {}, total {}, difference {} ({:.1}%)",
                label,
                date_parser::format_date(&p.start),
                date_parser::format_date(&p.end),
                p.total.round() as i64,
                p.difference.round() as i64,
                p.pct_change
            ),
            None => println!("{}: no data available", label),
        }
    }
}

fn print_details(specs: &[ScenarioSpec]) {
    for spec in specs {
        println!();
        println!("{}", spec.name());
        for line in spec.describe() {
            println!("  {}", line);
        }
    }
}

fn export(dir: &Path, summary: &[SummaryRow], outcome: &BatchOutcome) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed creating output directory: {}", dir.display()))?;

    let summary_path = dir.join("scenario_summary.csv");
    write_summary_csv(summary, BufWriter::new(File::create(&summary_path)?))
        .with_context(|| format!("failed writing {}", summary_path.display()))?;

    for (name, forecast) in outcome.forecasts.iter() {
        let path = dir.join(format!("{}.csv", scenario_file_stem(name)));
        write_forecast_csv(forecast, BufWriter::new(File::create(&path)?))
            .with_context(|| format!("failed writing {}", path.display()))?;
    }

    log::info!(
        "Exported summary and {} scenario forecasts to {}",
        outcome.forecasts.len(),
        dir.display()
    );
    Ok(())
}
