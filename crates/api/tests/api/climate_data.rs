use crate::helpers::{
    get, measurement, mock_stations, seed_database, seed_tables, spawn_seeded_app,
};
use axum::http::StatusCode;
use climate_api::{
    build_app_state, open_database, ClimateAccess, ClimateData, DatasetWindow, Measurement,
    RangeSummary, StartSummary, Station, TemperatureObservation, MAX_SESSIONS,
};
use serde_json::{from_slice, json, Value};
use std::{sync::Arc, time::Duration};
use time::macros::date;

fn last_year_rows() -> Vec<Measurement> {
    vec![
        measurement(1, "USC00519397", "2016-08-22", Some(0.1), Some(79.0)),
        measurement(2, "USC00519397", "2016-08-23", Some(0.0), Some(81.0)),
        measurement(3, "USC00513117", "2016-08-23", None, Some(76.0)),
        measurement(4, "USC00519281", "2016-08-23", Some(1.79), Some(77.0)),
        measurement(5, "USC00519281", "2016-08-22", Some(0.2), Some(75.0)),
        measurement(6, "USC00519281", "2016-08-24", Some(2.15), Some(77.0)),
        measurement(7, "USC00519397", "2017-08-23", Some(0.0), Some(81.0)),
        measurement(8, "USC00519281", "2017-08-18", None, Some(79.0)),
    ]
}

async fn seeded_access(rows: &[Measurement]) -> (ClimateAccess, crate::helpers::SeededDatabase) {
    let seeded = seed_database(rows, &mock_stations()).await;
    let database = open_database(&seeded.path).await.unwrap();
    (ClimateAccess::new(database), seeded)
}

#[tokio::test]
async fn precipitation_groups_readings_by_date() {
    let (access, _seeded) = seeded_access(&last_year_rows()).await;

    let readings = access
        .precipitation(DatasetWindow::default().cutoff())
        .await
        .unwrap();

    let dates: Vec<&str> = readings.keys().map(String::as_str).collect();
    assert_eq!(
        dates,
        vec!["2016-08-23", "2016-08-24", "2017-08-18", "2017-08-23"]
    );
    // encounter order within a date, nulls kept
    assert_eq!(readings["2016-08-23"], vec![Some(0.0), None, Some(1.79)]);
    assert_eq!(readings["2017-08-18"], vec![None]);
}

#[tokio::test]
async fn precipitation_endpoint_excludes_rows_before_cutoff() {
    let (test_app, _seeded) = spawn_seeded_app(&last_year_rows()).await;

    let (status, body) = get(&test_app, "/api/v1.0/precipitation").await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "2016-08-23": [0.0, null, 1.79],
            "2016-08-24": [2.15],
            "2017-08-18": [null],
            "2017-08-23": [0.0],
        })
    );
}

#[tokio::test]
async fn stations_are_distinct() {
    let (access, _seeded) = seeded_access(&last_year_rows()).await;

    let mut stations = access.stations().await.unwrap();
    stations.sort();
    assert_eq!(
        stations,
        vec![
            String::from("USC00513117"),
            String::from("USC00519281"),
            String::from("USC00519397"),
        ]
    );
}

#[tokio::test]
async fn tobs_filters_station_and_window() {
    let (access, _seeded) = seeded_access(&last_year_rows()).await;
    let window = DatasetWindow::default();

    let observations = access
        .temperature_observations(&window.station, window.cutoff())
        .await
        .unwrap();

    assert_eq!(
        observations,
        vec![
            TemperatureObservation(String::from("2016-08-23"), Some(77.0)),
            TemperatureObservation(String::from("2016-08-24"), Some(77.0)),
            TemperatureObservation(String::from("2017-08-18"), Some(79.0)),
        ]
    );
}

#[tokio::test]
async fn single_row_round_trip() {
    let rows = vec![measurement(1, "S1", "2017-01-02", Some(0.5), Some(70.0))];
    let (test_app, _seeded) = spawn_seeded_app(&rows).await;

    let (status, body) = get(&test_app, "/api/v1.0/2017-01-01").await;
    assert_eq!(status, StatusCode::OK);

    let summary: StartSummary = from_slice(&body).unwrap();
    assert_eq!(summary.start_date, "2017-01-01");
    assert_eq!(summary.max_temp, vec![(Some(70.0),)]);
    assert_eq!(summary.min_temp, vec![(Some(70.0),)]);
    assert_eq!(summary.average_temp, vec![(Some(70.0),)]);
}

#[tokio::test]
async fn range_is_inclusive_on_both_ends() {
    let (access, _seeded) = seeded_access(&last_year_rows()).await;

    let summary = access
        .temperatures_between(date!(2016 - 08 - 22), date!(2016 - 08 - 23))
        .await
        .unwrap();

    assert_eq!(summary.min, vec![(Some(75.0),)]);
    assert_eq!(summary.max, vec![(Some(81.0),)]);
    assert_eq!(summary.avg, vec![(Some(77.6),)]);
}

#[tokio::test]
async fn max_is_never_below_min() {
    let (test_app, _seeded) = spawn_seeded_app(&last_year_rows()).await;

    for uri in [
        "/api/v1.0/2016-08-22/2016-08-22",
        "/api/v1.0/2016-08-22/2017-08-23",
        "/api/v1.0/20160824/20170818",
    ] {
        let (status, body) = get(&test_app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");

        let summary: RangeSummary = from_slice(&body).unwrap();
        let max = summary.max_temp[0].0.unwrap();
        let min = summary.min_temp[0].0.unwrap();
        let avg = summary.average_temp[0].0.unwrap();
        assert!(max >= min, "{uri}");
        assert!(avg >= min && avg <= max, "{uri}");
    }
}

#[tokio::test]
async fn inverted_range_returns_null_aggregates() {
    let (test_app, _seeded) = spawn_seeded_app(&last_year_rows()).await;

    let (status, body) = get(&test_app, "/api/v1.0/2017-08-23/2016-08-23").await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "Start Date": "2017-08-23",
            "End Date": "2016-08-23",
            "Max Temp": [[null]],
            "Min Temp": [[null]],
            "Average Temp": [[null]],
        })
    );
}

#[tokio::test]
async fn malformed_date_is_a_server_error() {
    let (test_app, _seeded) = spawn_seeded_app(&last_year_rows()).await;

    let (status, _) = get(&test_app, "/api/v1.0/abcd-ef-gh").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn missing_database_file_is_rejected() {
    let result = open_database("/nonexistent/Resources/hawaii.sqlite").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn health_check_requires_both_tables() {
    let seeded = seed_tables(
        &["CREATE TABLE measurement (id INTEGER NOT NULL, station TEXT, date TEXT, prcp FLOAT, tobs FLOAT, PRIMARY KEY (id))"],
        &last_year_rows(),
        &[],
    )
    .await;
    let database = open_database(&seeded.path).await.unwrap();

    let result = build_app_state(
        String::from("http://127.0.0.1:5000"),
        DatasetWindow::default(),
        Arc::clone(&database),
    )
    .await;

    let err = result.err().expect("missing station table should fail");
    assert!(err.to_string().contains("station"), "{err}");
}

#[tokio::test]
async fn station_metadata_may_be_null() {
    let bare_station = Station {
        id: 1,
        station: String::from("USC00519281"),
        name: None,
        latitude: None,
        longitude: None,
        elevation: None,
    };
    let seeded = seed_database(&last_year_rows(), &[bare_station]).await;
    let database = open_database(&seeded.path).await.unwrap();

    let result = build_app_state(
        String::from("http://127.0.0.1:5000"),
        DatasetWindow::default(),
        database,
    )
    .await;

    assert!(result.is_ok(), "{:?}", result.err());
}

#[tokio::test]
async fn sessions_past_the_limit_wait_for_a_release() {
    let seeded = seed_database(&last_year_rows(), &mock_stations()).await;
    let database = open_database(&seeded.path).await.unwrap();

    let mut held = Vec::new();
    for _ in 0..MAX_SESSIONS {
        held.push(database.session().await.unwrap());
    }

    let waiting = tokio::spawn({
        let database = Arc::clone(&database);
        async move { database.session().await.map(|_| ()) }
    });
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!waiting.is_finished());

    held.pop();
    let acquired = tokio::time::timeout(Duration::from_secs(5), waiting)
        .await
        .expect("session was not handed over after a release")
        .unwrap();
    assert!(acquired.is_ok());
}
