use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use scenario_forecast::apply::apply_scenario;
use scenario_forecast::batch::{apply_all, apply_configs, apply_each, ScenarioForecasts};
use scenario_forecast::config::{ScenarioConfig, ScenarioDefaults};
use scenario_forecast::scenario::{Coefficients, Levers, ScenarioSpec};
use scenario_forecast::{Forecast, ScenarioError, Timeline};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn baseline() -> Forecast {
    let timeline = Timeline::regular(start(), 180, Duration::days(1)).unwrap();
    Forecast::new(
        timeline,
        vec![200.0; 180],
        vec![180.0; 180],
        vec![220.0; 180],
    )
    .unwrap()
}

fn overflowing(name: &str) -> ScenarioSpec {
    ScenarioSpec::numeric(
        name,
        Levers {
            spend: f64::MAX,
            content: 0.0,
            backlinks: 0.0,
        },
        Coefficients {
            spend: 1e10,
            content: 0.0,
            backlinks: 0.0,
        },
        0.0,
        1.0,
        0.0,
    )
    .unwrap()
}

fn config(name: &str, mode: &str) -> ScenarioConfig {
    ScenarioConfig {
        name: name.to_string(),
        mode: mode.to_string(),
        ..ScenarioConfig::default()
    }
}

#[test]
fn test_apply_all_keeps_input_order() {
    let scenarios = vec![
        ScenarioSpec::percentage("Small", 0.05, 0.0, 1.0).unwrap(),
        ScenarioSpec::percentage("Large", 0.50, 0.0, 1.0).unwrap(),
        ScenarioSpec::percentage("Medium", 0.20, 1.0, 2.0).unwrap(),
    ];

    let forecasts = apply_all(&baseline(), &scenarios, start()).unwrap();

    assert_eq!(
        forecasts.names().collect::<Vec<_>>(),
        vec!["Small", "Large", "Medium"]
    );
    for scenario in &scenarios {
        let expected = apply_scenario(&baseline(), scenario, start()).unwrap();
        assert_eq!(forecasts.get(scenario.name()), Some(&expected));
    }
}

#[test]
fn test_duplicate_names_last_wins() {
    let first = ScenarioSpec::percentage("Same", 0.10, 0.0, 1.0).unwrap();
    let other = ScenarioSpec::percentage("Other", 0.30, 0.0, 1.0).unwrap();
    let second = ScenarioSpec::percentage("Same", 0.90, 0.0, 1.0).unwrap();

    let forecasts = apply_all(&baseline(), &[first, other, second.clone()], start()).unwrap();

    assert_eq!(forecasts.len(), 2);
    assert_eq!(forecasts.names().collect::<Vec<_>>(), vec!["Same", "Other"]);
    let expected = apply_scenario(&baseline(), &second, start()).unwrap();
    assert_eq!(forecasts.get("Same"), Some(&expected));
}

#[test]
fn test_apply_all_names_failing_scenario() {
    let scenarios = vec![
        ScenarioSpec::percentage("Fine", 0.10, 0.0, 1.0).unwrap(),
        overflowing("Broken"),
    ];

    let err = apply_all(&baseline(), &scenarios, start()).unwrap_err();

    assert_eq!(err.scenario_name(), Some("Broken"));
    assert!(matches!(err.root(), ScenarioError::Math(_)));
    assert!(err.to_string().contains("Broken"));
}

#[test]
fn test_apply_each_continues_past_failures() {
    let scenarios = vec![
        overflowing("Broken"),
        ScenarioSpec::percentage("Fine", 0.10, 0.0, 1.0).unwrap(),
    ];

    let outcome = apply_each(&baseline(), &scenarios, start());

    assert!(!outcome.is_complete());
    assert_eq!(outcome.forecasts.names().collect::<Vec<_>>(), vec!["Fine"]);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].name, "Broken");
}

#[test]
fn test_unknown_mode_is_reported_by_name() {
    let configs = vec![
        config("Straight line", "linear"),
        config("Target", "percentage"),
        config("Levers", "numeric"),
    ];

    let outcome = apply_configs(&baseline(), &configs, &ScenarioDefaults::default(), start());

    assert_eq!(
        outcome.forecasts.names().collect::<Vec<_>>(),
        vec!["Target", "Levers"]
    );
    assert_eq!(outcome.failures.len(), 1);
    let failure = &outcome.failures[0];
    assert_eq!(failure.name, "Straight line");
    match &failure.error {
        ScenarioError::UnknownScenarioMode(mode) => assert_eq!(mode, "linear"),
        other => panic!("Expected UnknownScenarioMode, got {:?}", other),
    }
}

#[test]
fn test_invalid_config_parameters_are_failures() {
    let mut zero_ramp = config("No ramp", "percentage");
    zero_ramp.duration_months = Some(0.0);

    let outcome = apply_configs(
        &baseline(),
        &[zero_ramp],
        &ScenarioDefaults::default(),
        start(),
    );

    assert!(outcome.forecasts.is_empty());
    assert!(matches!(
        outcome.failures[0].error,
        ScenarioError::DegenerateAccelerationWindow(_)
    ));
}

#[test]
fn test_empty_batch() {
    let forecasts = apply_all(&baseline(), &[], start()).unwrap();
    assert!(forecasts.is_empty());

    let outcome = apply_each(&baseline(), &[], start());
    assert!(outcome.is_complete());
    assert!(outcome.forecasts.is_empty());
}

#[test]
fn test_insert_returns_replaced_forecast() {
    let base = baseline();
    let mut forecasts = ScenarioForecasts::new();
    assert!(forecasts.insert("A", base.clone()).is_none());
    assert_eq!(forecasts.insert("A", base.clone()), Some(base));
    assert_eq!(forecasts.len(), 1);
}

#[test]
fn test_replacing_keeps_first_position() {
    let base = baseline();
    let lifted = apply_scenario(
        &base,
        &ScenarioSpec::percentage("Lift", 0.1, 0.0, 1.0).unwrap(),
        start(),
    )
    .unwrap();

    let mut forecasts = ScenarioForecasts::new();
    forecasts.insert("A", base.clone());
    forecasts.insert("B", base.clone());
    forecasts.insert("C", base.clone());
    assert_eq!(forecasts.insert("A", lifted.clone()), Some(base.clone()));

    assert_eq!(forecasts.names().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    assert_eq!(forecasts.get("A"), Some(&lifted));
    assert_eq!(forecasts.get("B"), Some(&base));
    assert_eq!(forecasts.get("missing"), None);
    let order: Vec<&str> = forecasts.iter().map(|(name, _)| name).collect();
    assert_eq!(order, vec!["A", "B", "C"]);
}
