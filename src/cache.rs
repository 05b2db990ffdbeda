//! # Forecast Freshness Cache
//!
//! [`ForecastCache`] is the single entry point the rest of an application uses to obtain
//! forecast data. It holds the last successfully parsed series together with its day
//! table and daily summaries, and refetches only when the upstream model run backing
//! that data has gone stale.
//!
//! ## Freshness Policy
//! - **Empty cache**: always fetch
//! - **Held data**: compare the current time against the held model run (hindcast offset
//!   already applied). At [`STALE_AFTER_HOURS`] whole hours or more the held data is
//!   dropped and a fetch follows; otherwise the cached data is served without touching
//!   the network.
//!
//! ## Concurrency
//! Refresh cycles are serialized by an async mutex that stays locked across the fetch, so
//! concurrent callers never race two requests against each other: the second caller
//! waits and then sees the data the first one stored. Held data sits behind a separate
//! read/write lock that is only taken briefly, so the query methods stay synchronous and
//! listeners can call them while being notified.
//!
//! ## Failure Handling
//! A failed cycle never modifies held data. Listeners hear about every completed cycle
//! exactly once, in registration order.

use crate::forecast_data::{parse_series, ForecastError};
use crate::segmenter::{self, DayIndex};
use crate::source::ForecastSource;
use crate::summary::summarize_days;
use crate::{DailySummary, ForecastSeries, HourlyForecast};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Age of the held model run, in whole hours, at which cached data is discarded.
pub const STALE_AFTER_HOURS: i64 = 6;

/// Observer of completed refresh cycles.
pub trait ForecastListener: Send + Sync {
    /// Called after a cycle that left fresh data in the cache.
    fn on_data_updated(&self);

    /// Called after a cycle that failed to fetch or parse new data.
    fn on_data_update_failed(&self, error: &ForecastError);
}

/// How [`ForecastCache::ensure_fresh`] satisfied a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Freshness {
    /// Held data was still fresh; no fetch was made
    Cached,
    /// New data was fetched and stored
    Fetched,
}

/// Everything derived from one successful fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastSnapshot {
    pub series: ForecastSeries,
    pub days: DayIndex,
    pub summaries: Vec<DailySummary>,
}

impl ForecastSnapshot {
    /// Parse, segment and summarize a raw forecast document.
    pub fn from_document(document: &Value) -> Result<Self, ForecastError> {
        let series = parse_series(document)?;
        let days = DayIndex::from_series(&series);
        let summaries = summarize_days(&series, &days);

        Ok(Self {
            series,
            days,
            summaries,
        })
    }

    pub fn day_count(&self) -> usize {
        self.days.day_count()
    }

    pub fn slice_for_day(&self, day: usize) -> Option<&[HourlyForecast]> {
        segmenter::slice_for_day(&self.series.forecasts, &self.days, day)
    }

    pub fn summary_for_day(&self, day: usize) -> Option<&DailySummary> {
        self.summaries.get(day)
    }

    /// True when the model run backing this snapshot is too old to serve at `now`.
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        (now - self.series.model_run_at).num_hours() >= STALE_AFTER_HOURS
    }
}

/// Cached, self-refreshing view of the forecast published by a [`ForecastSource`].
///
/// Construct one per data source and share it behind an `Arc`.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use surf_forecast_lib::cache::ForecastCache;
/// use surf_forecast_lib::source::HttpSource;
///
/// # async fn run() -> Result<(), surf_forecast_lib::forecast_data::ForecastError> {
/// let source = HttpSource::new(
///     "https://example.com/forecast_as_json",
///     std::time::Duration::from_secs(30),
/// )?;
/// let cache = Arc::new(ForecastCache::new(source));
///
/// cache.ensure_fresh().await?;
/// if let Some(summary) = cache.summary_for_day(0) {
///     println!("morning: {:.1} ft", summary.morning.maximum_wave_height);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ForecastCache<S> {
    source: S,
    refresh_lock: Mutex<()>,
    snapshot: RwLock<Option<Arc<ForecastSnapshot>>>,
    listeners: RwLock<Vec<Arc<dyn ForecastListener>>>,
}

impl<S: ForecastSource> ForecastCache<S> {
    /// Create an empty cache. Nothing is fetched until the first [`Self::ensure_fresh`].
    pub fn new(source: S) -> Self {
        Self {
            source,
            refresh_lock: Mutex::new(()),
            snapshot: RwLock::new(None),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// The data source this cache fetches from.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Register a listener for the lifetime of this cache.
    pub fn add_listener(&self, listener: Arc<dyn ForecastListener>) {
        self.listeners.write().push(listener);
    }

    /// Make sure fresh data is held, fetching only when necessary.
    pub async fn ensure_fresh(&self) -> Result<Freshness, ForecastError> {
        self.ensure_fresh_at(Utc::now()).await
    }

    /// [`Self::ensure_fresh`] against an explicit clock reading.
    pub async fn ensure_fresh_at(&self, now: DateTime<Utc>) -> Result<Freshness, ForecastError> {
        let _cycle = self.refresh_lock.lock().await;

        let held = self.snapshot();
        if let Some(snapshot) = held {
            if !snapshot.is_stale_at(now) {
                tracing::debug!(
                    model_run_at = %snapshot.series.model_run_at,
                    "serving cached forecast"
                );
                self.notify(Ok(()));
                return Ok(Freshness::Cached);
            }

            tracing::info!(
                model_run_at = %snapshot.series.model_run_at,
                %now,
                "cached forecast is stale, discarding"
            );
            self.clear();
        }

        self.fetch_cycle().await.map(|()| Freshness::Fetched)
    }

    /// Fetch new data even if the held data is still fresh.
    ///
    /// Held data is kept if the fetch fails.
    pub async fn refresh(&self) -> Result<(), ForecastError> {
        let _cycle = self.refresh_lock.lock().await;
        self.fetch_cycle().await
    }

    /// Drop all held data.
    pub fn clear(&self) {
        *self.snapshot.write() = None;
    }

    /// Current snapshot, if any data is held.
    pub fn snapshot(&self) -> Option<Arc<ForecastSnapshot>> {
        self.snapshot.read().clone()
    }

    /// Hourly records of `day`, or `None` when no data is held for that day.
    pub fn slice_for_day(&self, day: usize) -> Option<Vec<HourlyForecast>> {
        let snapshot = self.snapshot()?;
        let records = snapshot.slice_for_day(day)?.to_vec();
        Some(records)
    }

    /// Offset of the first record of `day` within the held series.
    pub fn day_start_offset(&self, day: usize) -> Option<usize> {
        self.snapshot()?.days.start_offset(day)
    }

    /// Number of days in the held series; zero when nothing is held.
    pub fn day_count(&self) -> usize {
        self.snapshot().map_or(0, |snapshot| snapshot.day_count())
    }

    pub fn summary_for_day(&self, day: usize) -> Option<DailySummary> {
        self.snapshot()?.summary_for_day(day).cloned()
    }

    /// Fetch, parse and store. Must be called with `refresh_lock` held.
    async fn fetch_cycle(&self) -> Result<(), ForecastError> {
        let result = match self.source.fetch().await {
            Ok(document) => ForecastSnapshot::from_document(&document),
            Err(e) => Err(e),
        };

        match result {
            Ok(snapshot) => {
                tracing::info!(
                    location = %snapshot.series.location_name,
                    days = snapshot.day_count(),
                    model_run_at = %snapshot.series.model_run_at,
                    "forecast updated"
                );
                *self.snapshot.write() = Some(Arc::new(snapshot));
                self.notify(Ok(()));
                Ok(())
            }
            Err(e) => {
                tracing::warn!("forecast update failed: {}", e);
                self.notify(Err(&e));
                Err(e)
            }
        }
    }

    fn notify(&self, outcome: Result<(), &ForecastError>) {
        // Snapshot the list so listeners may register further listeners.
        let listeners = self.listeners.read().clone();
        for listener in listeners {
            match outcome {
                Ok(()) => listener.on_data_updated(),
                Err(e) => listener.on_data_update_failed(e),
            }
        }
    }
}
