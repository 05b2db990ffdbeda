//! # Day Segmentation
//!
//! The forecast payload has no day field, so calendar days are inferred from the hourly
//! time labels: a record labelled "01 AM" or "02 AM" opens a new day, and the very first
//! record always opens day 0 even when the series starts mid-morning.
//!
//! The day table has a fixed capacity of [`DAY_CAPACITY`] slots, matching the longest
//! forecast horizon the service publishes. Boundaries past the last slot are dropped and
//! their records stay in the last recorded day.

use crate::{ForecastSeries, HourlyForecast};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Maximum number of days a series can be split into.
pub const DAY_CAPACITY: usize = 8;

/// Start offsets of each forecast day within a series.
///
/// A `None` slot is "unset", which is distinct from a day that starts at offset 0.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayIndex {
    starts: [Option<usize>; DAY_CAPACITY],
    count: usize,
}

impl DayIndex {
    /// Build the day table for a series.
    pub fn from_series(series: &ForecastSeries) -> Self {
        Self::from_forecasts(&series.forecasts)
    }

    /// Walk the hourly records in order and record the offset of every day start.
    pub fn from_forecasts(forecasts: &[HourlyForecast]) -> Self {
        let mut index = DayIndex::default();

        for (offset, forecast) in forecasts.iter().enumerate() {
            if offset != 0 && !forecast.is_day_boundary() {
                continue;
            }

            if index.count == DAY_CAPACITY {
                tracing::debug!(offset, "day table full, dropping boundary");
                continue;
            }

            index.starts[index.count] = Some(offset);
            index.count += 1;
        }

        index
    }

    /// Number of days found in the series.
    pub fn day_count(&self) -> usize {
        self.count
    }

    /// Offset of the first record of `day`, or `None` if that day was never observed.
    pub fn start_offset(&self, day: usize) -> Option<usize> {
        self.starts.get(day).copied().flatten()
    }

    /// Half-open record range for `day` in a series of `len` records.
    ///
    /// The last populated day runs to the end of the series.
    pub fn day_range(&self, day: usize, len: usize) -> Option<Range<usize>> {
        if day >= self.count {
            return None;
        }

        let start = self.start_offset(day)?;
        let end = self.start_offset(day + 1).unwrap_or(len);

        Some(start..end)
    }

    /// Iterate over the record ranges of all populated days.
    pub fn ranges(&self, len: usize) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.count).filter_map(move |day| self.day_range(day, len))
    }
}

/// Borrow the hourly records of `day`, or `None` when the day is not present.
pub fn slice_for_day<'a>(
    forecasts: &'a [HourlyForecast],
    index: &DayIndex,
    day: usize,
) -> Option<&'a [HourlyForecast]> {
    index
        .day_range(day, forecasts.len())
        .and_then(|range| forecasts.get(range))
}
