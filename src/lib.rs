//! # Surf Forecast Core Library
//!
//! This library turns the hourly surf forecast published by a remote forecast service
//! into per-day buckets and morning/afternoon summaries, and keeps the result cached
//! until the upstream model produces a newer run.
//!
//! ## Data Flow
//!
//! 1. **Fetch**: a [`source::ForecastSource`] returns the raw JSON document
//! 2. **Parse**: [`forecast_data::parse_series`] reads a fixed window of 58 hourly records
//! 3. **Segment**: [`segmenter::DayIndex`] infers calendar-day starts from the time labels
//! 4. **Summarize**: [`summary::summarize_days`] builds one [`DailySummary`] per day
//! 5. **Serve**: [`cache::ForecastCache`] holds the result until the model run goes stale
//!
//! ## Core Types
//!
//! - [`HourlyForecast`]: a single hourly forecast sample
//! - [`SwellComponent`]: one directional wave train inside a sample
//! - [`ForecastSeries`]: the ordered hourly samples plus model metadata
//! - [`DailySummary`]: the derived morning/afternoon view of one day

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod cache;
pub mod config;
pub mod forecast_data;
pub mod segmenter;
pub mod source;
pub mod summary;

#[cfg(test)]
mod tests;

/// One directional wave train (primary, secondary or tertiary) within the sea state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SwellComponent {
    /// Wave height in feet
    pub wave_height: f64,
    /// Period in seconds
    pub period: f64,
    /// Direction the swell arrives from, in degrees
    pub direction: f64,
    /// Compass label for `direction` (e.g. "SSE")
    pub compass_direction: String,
}

/// A single hourly forecast sample.
///
/// Samples are never modified after parsing; the series that holds them is replaced
/// as a whole when fresher data arrives.
///
/// # Example
/// ```
/// use surf_forecast_lib::HourlyForecast;
///
/// let sample = HourlyForecast {
///     time: "01 AM".to_string(),
///     minimum_breaking_height: 2.0,
///     maximum_breaking_height: 3.0,
///     ..Default::default()
/// };
///
/// assert!(sample.is_day_boundary());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    /// Calendar date as published by the service
    pub date: String,
    /// Time-of-day label such as "01 AM"
    pub time: String,
    /// Minimum breaking wave height in feet
    pub minimum_breaking_height: f64,
    /// Maximum breaking wave height in feet
    pub maximum_breaking_height: f64,
    /// Wind speed in mph
    pub wind_speed: f64,
    /// Wind direction in degrees
    pub wind_direction: f64,
    /// Compass label for `wind_direction`
    pub wind_compass_direction: String,
    pub primary_swell: SwellComponent,
    pub secondary_swell: SwellComponent,
    pub tertiary_swell: SwellComponent,
}

impl HourlyForecast {
    /// True when the time label marks the first hours of a calendar day.
    ///
    /// The service publishes no explicit day field, and depending on the model run the
    /// first hour of a day is labelled either "01 AM" or "02 AM".
    pub fn is_day_boundary(&self) -> bool {
        self.time == "01 AM" || self.time == "02 AM"
    }
}

/// Ordered hourly samples plus the metadata of the model runs that produced them.
///
/// `forecasts` is in chronological order and is never empty for a series produced by
/// [`forecast_data::parse_series`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub location_name: String,
    pub wave_model_name: String,
    /// Wave model run exactly as published (e.g. "Monday March 02, 2015 12z")
    pub wave_model_run: String,
    pub wind_model_name: String,
    pub wind_model_run: String,
    /// Wave model run instant with the hindcast offset already applied
    pub model_run_at: DateTime<Utc>,
    pub forecasts: Vec<HourlyForecast>,
}

impl ForecastSeries {
    pub fn len(&self) -> usize {
        self.forecasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forecasts.is_empty()
    }
}

/// Wave and wind figures for one half of a day.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HalfDaySummary {
    pub minimum_wave_height: f64,
    pub maximum_wave_height: f64,
    pub wind_speed: f64,
    /// Copied from the record the wind figures come from; empty when there was not
    /// enough data for this half of the day
    pub wind_compass_direction: String,
}

impl HalfDaySummary {
    /// True when no data was available for this half of the day.
    ///
    /// A populated half always carries the compass label of one of its records, so the
    /// label alone decides. Zero heights and a calm wind still count as data.
    pub fn is_empty(&self) -> bool {
        self.wind_compass_direction.is_empty()
    }
}

/// Morning and afternoon summary for one forecast day.
///
/// Halves without enough hourly records stay at zero and an empty compass label.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub morning: HalfDaySummary,
    pub afternoon: HalfDaySummary,
}
