use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use surf_forecast_lib::cache::{ForecastCache, Freshness};
use surf_forecast_lib::forecast_data::ForecastError;
use surf_forecast_lib::source::{ForecastSource, HttpSource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record(time: &str) -> Value {
    let swell = json!({
        "WaveHeight": 3.1,
        "Period": 11.0,
        "Direction": 170.0,
        "CompassDirection": "S"
    });
    json!({
        "Date": "Thursday October 15",
        "Time": time,
        "MinimumBreakingHeight": 2.0,
        "MaximumBreakingHeight": 3.0,
        "WindSpeed": 12.0,
        "WindDirection": 45.0,
        "WindCompassDirection": "NE",
        "PrimarySwellComponent": swell,
        "SecondarySwellComponent": swell,
        "TertiarySwellComponent": swell
    })
}

fn payload() -> Value {
    let labels = ["01 AM", "04 AM", "07 AM", "10 AM", "01 PM", "04 PM", "07 PM", "10 PM"];
    let records: Vec<Value> = (0..60)
        .map(|i| record(labels[(i + 6) % labels.len()]))
        .collect();

    json!({
        "LocationName": "Point Judith",
        "WaveModel": { "Description": "NOAA WAVEWATCH III", "ModelRun": "Thursday October 15, 2026 06z" },
        "WindModel": { "Description": "NOAA GFS", "ModelRun": "Thursday October 15, 2026 06z" },
        "ForecastData": records
    })
}

async fn source_for(server: &MockServer) -> HttpSource {
    HttpSource::new(format!("{}/forecast_as_json", server.uri()), Duration::from_secs(5))
        .expect("client should build")
}

#[tokio::test]
async fn test_fetch_returns_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast_as_json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload()))
        .expect(1)
        .mount(&server)
        .await;

    let document = source_for(&server).await.fetch().await.unwrap();
    assert_eq!(document["LocationName"], "Point Judith");
}

#[tokio::test]
async fn test_server_error_is_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = source_for(&server).await.fetch().await.unwrap_err();
    assert!(matches!(err, ForecastError::Status(503)));
    assert!(err.is_fetch_failure());
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = source_for(&server).await.fetch().await.unwrap_err();
    assert!(matches!(err, ForecastError::Malformed(_)));
}

#[tokio::test]
async fn test_cache_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast_as_json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload()))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(ForecastCache::new(source_for(&server).await));
    let run = chrono::DateTime::parse_from_rfc3339("2026-10-15T11:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);

    assert_eq!(cache.ensure_fresh_at(run).await.unwrap(), Freshness::Fetched);
    assert_eq!(
        cache.ensure_fresh_at(run + chrono::Duration::hours(5)).await.unwrap(),
        Freshness::Cached
    );

    // Eight records per day from the first record on.
    assert_eq!(cache.day_count(), 8);
    assert_eq!(cache.day_start_offset(1), Some(8));
    assert_eq!(cache.slice_for_day(7).unwrap().len(), 2);

    let summary = cache.summary_for_day(1).unwrap();
    assert_eq!(summary.morning.wind_compass_direction, "NE");
    assert!((summary.morning.minimum_wave_height - 2.0).abs() < 1e-9);
}
