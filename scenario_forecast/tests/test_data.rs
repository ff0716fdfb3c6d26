use chrono::{Duration, TimeZone, Utc};
use scenario_forecast::data::{write_forecast_csv, DataLoader, History, HistoryPoint};
use scenario_forecast::{Forecast, ForecastRow, ScenarioError, Timeline};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_forecast_from_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "ds,yhat,yhat_lower,yhat_upper").unwrap();
    writeln!(file, "2023-01-01,100.0,90.0,110.0").unwrap();
    writeln!(file, "2023-01-02,102.5,91.0,113.0").unwrap();
    writeln!(file, "2023-01-03 00:00:00,104.0,95.0,115.0").unwrap();

    let forecast = DataLoader::forecast_from_csv(file.path()).unwrap();

    assert_eq!(forecast.len(), 3);
    assert_eq!(forecast.point(), &[100.0, 102.5, 104.0]);
    assert_eq!(forecast.lower(), &[90.0, 91.0, 95.0]);
    assert_eq!(forecast.upper(), &[110.0, 113.0, 115.0]);
    assert_eq!(
        forecast.timeline().first(),
        Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
    );
}

#[test]
fn test_forecast_csv_errors() {
    assert!(matches!(
        DataLoader::forecast_from_csv("nonexistent_file.csv"),
        Err(ScenarioError::IoError(_))
    ));

    let missing_columns = "ds,yhat\n2023-01-01,100.0\n";
    assert!(matches!(
        DataLoader::forecast_from_reader(missing_columns.as_bytes()),
        Err(ScenarioError::CsvError(_))
    ));

    let bad_date = "ds,yhat,yhat_lower,yhat_upper\nyesterday,1.0,0.0,2.0\n";
    assert!(matches!(
        DataLoader::forecast_from_reader(bad_date.as_bytes()),
        Err(ScenarioError::DataError(_))
    ));

    let duplicated = "ds,yhat,yhat_lower,yhat_upper\n2023-01-01,1.0,0.0,2.0\n2023-01-01 00:00:00,3.0,2.0,4.0\n";
    assert!(matches!(
        DataLoader::forecast_from_reader(duplicated.as_bytes()),
        Err(ScenarioError::DataError(_))
    ));
}

#[test]
fn test_unordered_rows_are_sorted() {
    let unordered = "ds,yhat,yhat_lower,yhat_upper\n\
                     2023-01-03,3.0,2.0,4.0\n\
                     2023-01-01,1.0,0.0,2.0\n\
                     2023-01-02,2.0,1.0,3.0\n";

    let forecast = DataLoader::forecast_from_reader(unordered.as_bytes()).unwrap();

    assert_eq!(forecast.point(), &[1.0, 2.0, 3.0]);
    assert_eq!(forecast.lower(), &[0.0, 1.0, 2.0]);
    assert_eq!(
        forecast.timeline().first(),
        Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(
        forecast.timeline().last(),
        Some(Utc.with_ymd_and_hms(2023, 1, 3, 0, 0, 0).unwrap())
    );
}

#[test]
fn test_forecast_validation() {
    let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let timeline = || Timeline::regular(start, 2, Duration::days(1)).unwrap();

    let mismatched = Forecast::new(timeline(), vec![1.0], vec![0.0, 0.0], vec![2.0, 2.0]);
    assert!(matches!(mismatched, Err(ScenarioError::DataError(_))));

    let inverted = Forecast::new(timeline(), vec![1.0, 1.0], vec![0.0, 1.5], vec![2.0, 2.0]);
    assert!(matches!(inverted, Err(ScenarioError::DataError(_))));

    let not_finite = Forecast::new(timeline(), vec![1.0, f64::NAN], vec![0.0, 0.0], vec![2.0, 2.0]);
    assert!(matches!(not_finite, Err(ScenarioError::DataError(_))));
}

#[test]
fn test_timeline_must_increase() {
    let t = Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap();
    assert!(Timeline::new(vec![t, t]).is_err());
    assert!(Timeline::new(vec![t, t - Duration::days(1)]).is_err());
    assert!(Timeline::new(vec![t - Duration::days(3), t]).is_ok());
    assert!(Timeline::regular(t, 3, Duration::zero()).is_err());
}

#[test]
fn test_irregular_timeline_window() {
    let t = Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap();
    let timeline = Timeline::new(vec![
        t,
        t + Duration::days(1),
        t + Duration::days(7),
        t + Duration::days(30),
    ])
    .unwrap();

    let inside: Vec<usize> = timeline
        .window_indices(t + Duration::days(1), t + Duration::days(7))
        .collect();
    assert_eq!(inside, vec![1, 2]);
}

#[test]
fn test_write_forecast_csv() {
    let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let rows = vec![
        ForecastRow {
            ds: start,
            yhat: 10.0,
            yhat_lower: 9.0,
            yhat_upper: 11.5,
        },
        ForecastRow {
            ds: start + Duration::hours(36),
            yhat: 12.0,
            yhat_lower: 10.0,
            yhat_upper: 13.0,
        },
    ];
    let forecast = Forecast::from_rows(&rows).unwrap();

    let mut buffer = Vec::new();
    write_forecast_csv(&forecast, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    assert_eq!(
        text,
        "ds,yhat,yhat_lower,yhat_upper\n\
         2023-01-01,10.0,9.0,11.5\n\
         2023-01-02 12:00:00,12.0,10.0,13.0\n"
    );
    assert_eq!(forecast.rows(), rows);
}

#[test]
fn test_history_from_csv() {
    let csv = "ds,y\n2023-01-03,30\n2023-01-01,10\n2023-01-02,20\n";
    let history = DataLoader::history_from_reader(csv.as_bytes()).unwrap();

    assert_eq!(history.len(), 3);
    assert_eq!(history.points()[0].y, 10.0);

    let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
    assert_eq!(
        history.total_between(start, start + Duration::days(5)),
        Some(50.0)
    );
    assert_eq!(
        history.total_between(start + Duration::days(10), start + Duration::days(20)),
        None
    );
}

#[test]
fn test_history_zero_total_is_some() {
    let t = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let history = History::new(vec![HistoryPoint { ds: t, y: 0.0 }]);
    assert_eq!(history.total_between(t, t), Some(0.0));
}
