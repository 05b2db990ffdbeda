//! Shared fixtures for the crate-level test suite.


use crate::cache::ForecastListener;
use crate::forecast_data::{ForecastError, FORECAST_DATA_BEGIN_INDEX, FORECAST_DATA_END_INDEX};
use crate::source::ForecastSource;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Model run used by every fixture document: 2015-03-02 12:00 UTC.
pub(crate) const MODEL_RUN: &str = "Monday March 02, 2015 12z";

/// Time labels every three hours starting at `start_hour` (0-23).
pub(crate) fn three_hourly_times(start_hour: u32, count: usize) -> Vec<String> {
    (0..count)
        .map(|step| {
            let hour = (start_hour + 3 * step as u32) % 24;
            let (display, suffix) = match hour {
                0 => (12, "AM"),
                1..=11 => (hour, "AM"),
                12 => (12, "PM"),
                _ => (hour - 12, "PM"),
            };
            format!("{display:02} {suffix}")
        })
        .collect()
}

/// Raw forecast record whose heights and wind are derived from `seed`.
pub(crate) fn raw_record(time: &str, seed: f64) -> Value {
    let swell = |scale: f64| {
        json!({
            "WaveHeight": seed * scale,
            "Period": 8.0 + scale,
            "Direction": 150.0,
            "CompassDirection": "SSE"
        })
    };

    json!({
        "Date": "Monday March 02",
        "Time": time,
        "MinimumBreakingHeight": seed,
        "MaximumBreakingHeight": seed + 1.0,
        "WindSpeed": 5.0 + seed,
        "WindDirection": 225.0,
        "WindCompassDirection": "SW",
        "PrimarySwellComponent": swell(1.0),
        "SecondarySwellComponent": swell(0.5),
        "TertiarySwellComponent": swell(0.25)
    })
}

/// Forecast document whose consumed window carries the given time labels.
///
/// `times` must hold one label per window record.
pub(crate) fn forecast_document_with_times(times: &[String], model_run: &str) -> Value {
    assert_eq!(times.len(), FORECAST_DATA_END_INDEX - FORECAST_DATA_BEGIN_INDEX);

    let mut records = vec![raw_record("hindcast", 0.0); FORECAST_DATA_BEGIN_INDEX];
    records.extend(
        times
            .iter()
            .enumerate()
            .map(|(i, time)| raw_record(time, (i % 7) as f64)),
    );

    json!({
        "LocationName": "Narragansett Town Beach",
        "WaveModel": { "Description": "NOAA WAVEWATCH III", "ModelRun": model_run },
        "WindModel": { "Description": "NOAA GFS", "ModelRun": model_run },
        "ForecastData": records
    })
}

/// Forecast document starting at 10 AM, three-hourly, backed by [`MODEL_RUN`].
pub(crate) fn forecast_document() -> Value {
    forecast_document_with_times(&three_hourly_times(10, 58), MODEL_RUN)
}

/// Data source that replays a fixed list of responses and counts fetches.
pub(crate) struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Value, ForecastError>>>,
    fetches: AtomicUsize,
}

impl ScriptedSource {
    pub(crate) fn new(responses: Vec<Result<Value, ForecastError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForecastSource for ScriptedSource {
    async fn fetch(&self) -> Result<Value, ForecastError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        // Give concurrent callers a chance to run while the "request" is in flight.
        tokio::task::yield_now().await;

        let next = self.responses.lock().pop_front();
        next.unwrap_or(Err(ForecastError::Status(503)))
    }
}

/// Listener that counts notifications.
#[derive(Default)]
pub(crate) struct CountingListener {
    pub(crate) updated: AtomicUsize,
    pub(crate) failed: AtomicUsize,
}

impl CountingListener {
    pub(crate) fn counts(&self) -> (usize, usize) {
        (
            self.updated.load(Ordering::SeqCst),
            self.failed.load(Ordering::SeqCst),
        )
    }
}

impl ForecastListener for CountingListener {
    fn on_data_updated(&self) {
        self.updated.fetch_add(1, Ordering::SeqCst);
    }

    fn on_data_update_failed(&self, _error: &ForecastError) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}
