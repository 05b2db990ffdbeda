//! # Surf Tracker Application Entry Point
//!
//! Fetches the current surf forecast, splits it into days and prints the morning and
//! afternoon summary for each day. Pass `--hourly` to also list the hourly records,
//! and `--config <path>` to read a configuration file other than surf-config.toml.

use std::env;
use std::sync::Arc;

use surf_forecast_lib::cache::{ForecastCache, ForecastListener};
use surf_forecast_lib::config::Config;
use surf_forecast_lib::forecast_data::ForecastError;
use surf_forecast_lib::source::HttpSource;
use surf_forecast_lib::{DailySummary, HalfDaySummary, HourlyForecast};
use tracing_subscriber::EnvFilter;

/// Logs the outcome of every refresh cycle.
struct LogListener;

impl ForecastListener for LogListener {
    fn on_data_updated(&self) {
        tracing::debug!("forecast data ready");
    }

    fn on_data_update_failed(&self, error: &ForecastError) {
        tracing::error!("forecast data unavailable: {}", error);
    }
}

fn format_half_day(label: &str, half: &HalfDaySummary) -> String {
    if half.is_empty() {
        return format!("  {label:<10} --");
    }

    format!(
        "  {label:<10} {:.1}-{:.1} ft, wind {:.0} mph {}",
        half.minimum_wave_height,
        half.maximum_wave_height,
        half.wind_speed,
        half.wind_compass_direction
    )
}

fn print_day(day: usize, summary: &DailySummary, hourly: Option<&[HourlyForecast]>) {
    let date = hourly
        .and_then(|records| records.first())
        .map(|record| record.date.as_str())
        .unwrap_or("");

    println!("Day {} {}", day, date);
    println!("{}", format_half_day("Morning", &summary.morning));
    println!("{}", format_half_day("Afternoon", &summary.afternoon));
}

fn print_hourly(records: &[HourlyForecast]) {
    for record in records {
        println!(
            "    {:>5}  {:.1}-{:.1} ft  wind {:.0} {:<3}  swell {:.1} ft @ {:.0}s {}",
            record.time,
            record.minimum_breaking_height,
            record.maximum_breaking_height,
            record.wind_speed,
            record.wind_compass_direction,
            record.primary_swell.wave_height,
            record.primary_swell.period,
            record.primary_swell.compass_direction
        );
    }
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();
    let show_hourly_flag = args.iter().any(|arg| arg == "--hourly");
    let config = match args.iter().position(|arg| arg == "--config") {
        Some(i) => {
            let path = args
                .get(i + 1)
                .ok_or_else(|| anyhow::anyhow!("--config needs a path"))?;
            Config::load_from_path(path)
        }
        None => Config::load(),
    };

    let source = HttpSource::from_config(&config.source)?;
    tracing::info!(spot = %config.source.spot_name, url = source.url(), "using forecast source");

    let cache = Arc::new(ForecastCache::new(source));
    cache.add_listener(Arc::new(LogListener));

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(cache.ensure_fresh())?;

    let snapshot = cache
        .snapshot()
        .ok_or_else(|| anyhow::anyhow!("no forecast data held after refresh"))?;

    println!(
        "{} (waves: {}, run {}; wind: {}, run {})\n",
        snapshot.series.location_name,
        snapshot.series.wave_model_name,
        snapshot.series.wave_model_run,
        snapshot.series.wind_model_name,
        snapshot.series.wind_model_run
    );

    let show_hourly = show_hourly_flag || config.display.show_hourly;
    let days = config.display.days.min(snapshot.day_count());
    for day in 0..days {
        let Some(summary) = snapshot.summary_for_day(day) else {
            continue;
        };
        let records = snapshot.slice_for_day(day);
        print_day(day, summary, records);
        if show_hourly {
            print_hourly(records.unwrap_or_default());
        }
    }

    Ok(())
}
