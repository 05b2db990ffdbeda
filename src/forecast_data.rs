//! # Forecast Payload Parsing
//!
//! This module converts the untyped JSON document returned by the forecast service into
//! a [`ForecastSeries`]. Parsing is all-or-nothing: any missing or wrong-shaped field
//! fails the whole payload and no partial series is produced.
//!
//! ## Payload Layout
//!
//! ```text
//! {
//!   "LocationName": "Narragansett Town Beach",
//!   "WaveModel": { "Description": "...", "ModelRun": "Monday March 02, 2015 12z" },
//!   "WindModel": { "Description": "...", "ModelRun": "Monday March 02, 2015 12z" },
//!   "ForecastData": [ { "Date": "...", "Time": "01 AM", ... }, ... ]
//! }
//! ```
//!
//! ## Record Window
//! Only `ForecastData[2..60]` is consumed (58 hourly records). The first two entries
//! belong to the hindcast and anything past index 59 is beyond the forecast horizon, so
//! those entries are ignored even when malformed. A shorter array is a malformed payload.
//!
//! ## Model Run Timestamp
//! The wave model run is published as `"<weekday> <month> <day>, <year> <hour><zone>"`,
//! where the zone is usually a trailing lowercase `z` meaning UTC. The parsed instant is
//! shifted forward by [`HINDCAST_OFFSET_HOURS`] before it is stored.

use crate::{ForecastSeries, HourlyForecast, SwellComponent};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// First `ForecastData` index that belongs to the forecast window.
pub const FORECAST_DATA_BEGIN_INDEX: usize = 2;

/// One past the last `ForecastData` index that belongs to the forecast window.
pub const FORECAST_DATA_END_INDEX: usize = 60;

/// Number of hourly records in every successfully parsed series.
pub const FORECAST_WINDOW_LEN: usize = FORECAST_DATA_END_INDEX - FORECAST_DATA_BEGIN_INDEX;

/// Delay between a model run and the moment its data is actually published.
pub const HINDCAST_OFFSET_HOURS: i64 = 5;

/// Errors that can occur while fetching or parsing forecast data.
///
/// Fetch failures and malformed payloads are both reported to cache listeners as a
/// failed update. "No data for this day" is never an error; queries return `None`.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// HTTP request failed (network, TLS or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status code
    #[error("forecast service returned status {0}")]
    Status(u16),

    /// Required field missing, wrong-shaped, or too few records
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// The wave model run timestamp could not be parsed
    #[error("unparseable model run timestamp: {0:?}")]
    ModelRun(String),
}

impl ForecastError {
    /// True for failures of the data source itself rather than of its payload.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, ForecastError::Http(_) | ForecastError::Status(_))
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(e: serde_json::Error) -> Self {
        ForecastError::Malformed(e.to_string())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawPayload {
    location_name: String,
    wave_model: RawModel,
    wind_model: RawModel,
    // Entries stay untyped so that only the consumed window has to be well formed.
    forecast_data: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawModel {
    description: String,
    model_run: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawForecast {
    date: String,
    time: String,
    minimum_breaking_height: f64,
    maximum_breaking_height: f64,
    wind_speed: f64,
    wind_direction: f64,
    wind_compass_direction: String,
    primary_swell_component: RawSwell,
    secondary_swell_component: RawSwell,
    tertiary_swell_component: RawSwell,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawSwell {
    wave_height: f64,
    period: f64,
    direction: f64,
    compass_direction: String,
}

impl From<RawSwell> for SwellComponent {
    fn from(raw: RawSwell) -> Self {
        SwellComponent {
            wave_height: raw.wave_height,
            period: raw.period,
            direction: raw.direction,
            compass_direction: raw.compass_direction,
        }
    }
}

impl From<RawForecast> for HourlyForecast {
    fn from(raw: RawForecast) -> Self {
        HourlyForecast {
            date: raw.date,
            time: raw.time,
            minimum_breaking_height: raw.minimum_breaking_height,
            maximum_breaking_height: raw.maximum_breaking_height,
            wind_speed: raw.wind_speed,
            wind_direction: raw.wind_direction,
            wind_compass_direction: raw.wind_compass_direction,
            primary_swell: raw.primary_swell_component.into(),
            secondary_swell: raw.secondary_swell_component.into(),
            tertiary_swell: raw.tertiary_swell_component.into(),
        }
    }
}

/// Parse a forecast document into a complete [`ForecastSeries`].
///
/// # Errors
/// - [`ForecastError::Malformed`] when the document is null, a required field is
///   missing or has the wrong type, or `ForecastData` has fewer than 60 entries
/// - [`ForecastError::ModelRun`] when the wave model run cannot be parsed
///
/// # Example
/// ```
/// use surf_forecast_lib::forecast_data::{parse_series, ForecastError};
///
/// let err = parse_series(&serde_json::Value::Null).unwrap_err();
/// assert!(matches!(err, ForecastError::Malformed(_)));
/// ```
pub fn parse_series(document: &Value) -> Result<ForecastSeries, ForecastError> {
    if document.is_null() {
        return Err(ForecastError::Malformed("no document".to_string()));
    }

    let payload = RawPayload::deserialize(document)?;

    let model_run_at = parse_model_run(&payload.wave_model.model_run)?
        .checked_add_signed(Duration::hours(HINDCAST_OFFSET_HOURS))
        .ok_or_else(|| ForecastError::ModelRun(payload.wave_model.model_run.clone()))?;

    let window = payload
        .forecast_data
        .get(FORECAST_DATA_BEGIN_INDEX..FORECAST_DATA_END_INDEX)
        .ok_or_else(|| {
            ForecastError::Malformed(format!(
                "ForecastData has {} entries, need at least {}",
                payload.forecast_data.len(),
                FORECAST_DATA_END_INDEX
            ))
        })?;

    let forecasts = window
        .iter()
        .map(|raw| RawForecast::deserialize(raw).map(HourlyForecast::from))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        location = %payload.location_name,
        records = forecasts.len(),
        %model_run_at,
        "parsed forecast payload"
    );

    Ok(ForecastSeries {
        location_name: payload.location_name,
        wave_model_name: payload.wave_model.description,
        wave_model_run: payload.wave_model.model_run,
        wind_model_name: payload.wind_model.description,
        wind_model_run: payload.wind_model.model_run,
        model_run_at,
        forecasts,
    })
}

/// Parse a model run label such as `"Monday March 02, 2015 12z"` into a UTC instant.
///
/// The hour carries no minutes and may have one or two digits, so it is split off where
/// the zone starts and rebuilt as `H:00` before being handed to chrono together with the
/// zone offset.
pub fn parse_model_run(raw: &str) -> Result<DateTime<Utc>, ForecastError> {
    let invalid = || ForecastError::ModelRun(raw.to_string());

    let trimmed = raw.trim();
    let normalized = match trimmed.strip_suffix('z') {
        Some(rest) => format!("{rest}+0000"),
        None => trimmed.to_string(),
    };

    let (date, hour_and_zone) = normalized.rsplit_once(' ').ok_or_else(invalid)?;
    let zone_start = hour_and_zone
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(invalid)?;
    if !(1..=2).contains(&zone_start) {
        return Err(invalid());
    }
    let (hour, zone) = hour_and_zone.split_at(zone_start);

    DateTime::parse_from_str(&format!("{date} {hour}:00 {zone}"), "%A %B %d, %Y %H:%M %z")
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| invalid())
}
