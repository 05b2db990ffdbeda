//! # Daily Summaries
//!
//! Reduces one day's hourly records to a morning and an afternoon figure. The forecast
//! service publishes a record every three hours, so a complete day holds eight records,
//! but the first day of a series usually starts mid-day and later days can be cut short
//! at the forecast horizon. Which records feed each half depends on how many are present.
//!
//! | Records | First day                              | Later day                         |
//! |---------|----------------------------------------|-----------------------------------|
//! | 8+      | morning 1–3, afternoon 4–6             | morning 1–3, afternoon 4–6        |
//! | 6–7     | morning 0–1, afternoon 2–3             | morning 1–3, afternoon 4–5        |
//! | 4–5     | afternoon 1–3                          | morning 1–3                       |
//! | 2–3     | morning = record 1                     | nothing                           |
//! | 0–1     | nothing                                | nothing                           |
//!
//! Published summaries have always counted record 3 twice in the three-point maximum
//! wave height average, so those averages use offsets 1, 3, 3.

use crate::segmenter::DayIndex;
use crate::{DailySummary, ForecastSeries, HalfDaySummary, HourlyForecast};

/// Records contributing to the three-point minimum wave height average.
const THREE_POINT_MIN: [usize; 3] = [1, 2, 3];

/// Records contributing to the three-point maximum wave height average.
const THREE_POINT_MAX: [usize; 3] = [1, 3, 3];

/// Summarize one day's records.
///
/// `first_day` selects the partial-day rules used for day 0 of a series.
pub fn summarize_day(day: &[HourlyForecast], first_day: bool) -> DailySummary {
    let mut summary = DailySummary::default();

    match (day.len(), first_day) {
        (8.., _) => {
            summary.morning = half_day(day, &THREE_POINT_MIN, &THREE_POINT_MAX, 2);
            summary.afternoon = half_day(day, &[4, 5, 6], &[4, 5, 6], 5);
        }
        (6..=7, true) => {
            summary.morning = half_day(day, &[0, 1], &[0, 1], 1);
            summary.afternoon = half_day(day, &[2, 3], &[2, 3], 3);
        }
        (4..=5, true) => {
            summary.afternoon = half_day(day, &THREE_POINT_MIN, &THREE_POINT_MAX, 2);
        }
        (2..=3, true) => {
            summary.morning = half_day(day, &[1], &[1], 1);
        }
        (len @ 4..=7, false) => {
            summary.morning = half_day(day, &THREE_POINT_MIN, &THREE_POINT_MAX, 2);
            if len >= 6 {
                summary.afternoon = half_day(day, &[4, 5], &[4, 5], 5);
            }
        }
        _ => {}
    }

    summary
}

/// Summarize every populated day of a series, in day order.
pub fn summarize_days(series: &ForecastSeries, index: &DayIndex) -> Vec<DailySummary> {
    index
        .ranges(series.len())
        .enumerate()
        .map(|(day, range)| summarize_day(&series.forecasts[range], day == 0))
        .collect()
}

fn half_day(
    day: &[HourlyForecast],
    min_offsets: &[usize],
    max_offsets: &[usize],
    wind_offset: usize,
) -> HalfDaySummary {
    let wind = &day[wind_offset];

    HalfDaySummary {
        minimum_wave_height: mean(day, min_offsets, |f| f.minimum_breaking_height),
        maximum_wave_height: mean(day, max_offsets, |f| f.maximum_breaking_height),
        wind_speed: wind.wind_speed,
        wind_compass_direction: wind.wind_compass_direction.clone(),
    }
}

/// Unweighted mean of one field over the given offsets; a repeated offset counts twice.
fn mean(day: &[HourlyForecast], offsets: &[usize], field: fn(&HourlyForecast) -> f64) -> f64 {
    let total: f64 = offsets.iter().map(|&i| field(&day[i])).sum();
    total / offsets.len() as f64
}
