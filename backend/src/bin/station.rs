//! Astrocast station binary
//!
//! Loads the station configuration, initializes the ephemeris once and
//! refreshes the sky report on a fixed interval.
//!
//! # Usage
//!
//! ```bash
//! ASTROCAST_WEATHER=/var/lib/astrocast/weather.json \
//!   cargo run --bin astrocast-station
//! ```
//!
//! # Environment Variables
//!
//! - `ASTROCAST_CONFIG`: Path to `station.toml` (default: search standard locations)
//! - `ASTROCAST_WEATHER`: Path to the latest Open-Meteo snapshot (required)
//! - `ASTROCAST_ONCE`: Set to `1` to run a single refresh and exit
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use astrocast::api::SkyReport;
use astrocast::config::StationConfig;
use astrocast::ephemeris::Ephemeris;
use astrocast::models::weather::parse_weather_json_file;
use astrocast::services::conditions::build_sky_report;

fn refresh(
    ephemeris: &Ephemeris,
    config: &StationConfig,
    weather_path: &std::path::Path,
) -> anyhow::Result<SkyReport> {
    let tz = config.timezone()?;
    let snapshot = parse_weather_json_file(weather_path, tz)?;
    let report = build_sky_report(ephemeris, config, &snapshot, Utc::now())?;
    Ok(report)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting astrocast station");

    let config = StationConfig::from_env_or_default().context("Failed to load station config")?;
    config.validate()?;
    info!(
        "Station '{}' at ({}, {}) in {}",
        config.station.name,
        config.station.latitude,
        config.station.longitude,
        config.station.timezone
    );

    // Ephemeris is loaded once; a failure disables every astronomical feature
    let provider = config.ephemeris_provider();
    let ephemeris = match provider.get() {
        Ok(ephemeris) => ephemeris,
        Err(e) => {
            error!("Astronomical data unavailable: {}", e);
            return Err(e.into());
        }
    };

    let weather_path: PathBuf = env::var("ASTROCAST_WEATHER")
        .map(PathBuf::from)
        .context("ASTROCAST_WEATHER must point to a weather snapshot")?;
    let run_once = env::var("ASTROCAST_ONCE").map(|v| v == "1").unwrap_or(false);
    let config = Arc::new(config);

    let mut ticker = tokio::time::interval(Duration::from_secs(config.refresh.interval_seconds));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let ephemeris = Arc::clone(&ephemeris);
                let config = Arc::clone(&config);
                let path = weather_path.clone();
                // awaited before the next tick, so refreshes never overlap
                let outcome =
                    tokio::task::spawn_blocking(move || refresh(&ephemeris, &config, &path)).await?;
                match outcome {
                    Ok(report) => {
                        info!(score = report.astro_score, "Refreshed sky report");
                        info!("{}", serde_json::to_string(&report)?);
                    }
                    Err(e) => warn!("Refresh failed: {:#}", e),
                }
                if run_once {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}
