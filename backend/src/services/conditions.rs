//! View-model assembly for one refresh.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::api::{CurrentConditions, SkyReport, Twilight, FORECAST_PLACEHOLDER};
use crate::config::StationConfig;
use crate::ephemeris::Ephemeris;
use crate::error::AstroResult;
use crate::models::time::{format_clock, local_date, local_midnight_utc};
use crate::models::weather::WeatherSnapshot;
use crate::services::astronomical_night::tonight_dark_window;
use crate::services::forecast::format_forecast_rows;
use crate::services::imaging_score::{astro_score_for, moon_sky};
use crate::services::moon_events::{moon_rise_set, next_new_and_full_within};
use crate::services::sun_events::twilight_events;

fn clock_or_placeholder(instant: Option<DateTime<Utc>>, tz: Tz) -> String {
    instant
        .map(|t| format_clock(t, tz))
        .unwrap_or_else(|| FORECAST_PLACEHOLDER.to_string())
}

/// Current weather rendered as display labels.
pub fn current_conditions(snapshot: &WeatherSnapshot, tz: Tz) -> CurrentConditions {
    let current = &snapshot.current;
    let today = snapshot.today();

    let probability = today
        .and_then(|d| d.precipitation_probability_max)
        .map(|p| format!("Precipitation Probability: {:.0}%", p))
        .unwrap_or_else(|| format!("Precipitation Probability: {}", FORECAST_PLACEHOLDER));
    let hours = today
        .and_then(|d| d.precipitation_hours)
        .map(|h| format!("Precipitation Hours: {:.1} hours", h))
        .unwrap_or_else(|| format!("Precipitation Hours: {}", FORECAST_PLACEHOLDER));

    CurrentConditions {
        temperature: format!("Temperature: {:.1}°F", current.temperature_f),
        cloud_cover: format!("Cloud Cover: {:.0}%", current.cloud_cover_percent),
        day_night: if current.is_day { "Day" } else { "Night" }.to_string(),
        precipitation: format!("Precipitation Amount: {:.2}\"", current.precipitation_in),
        sunrise: format!(
            "Sunrise: {}",
            clock_or_placeholder(today.and_then(|d| d.sunrise), tz)
        ),
        sunset: format!(
            "Sunset: {}",
            clock_or_placeholder(today.and_then(|d| d.sunset), tz)
        ),
        precipitation_probability: probability,
        precipitation_hours: hours,
    }
}

/// Run every calculator for `now` and merge the results with the weather.
///
/// An ephemeris failure never reaches here: the caller resolves the handle
/// first and reports a load error as the refresh status.
pub fn build_sky_report(
    ephemeris: &Ephemeris,
    config: &StationConfig,
    snapshot: &WeatherSnapshot,
    now: DateTime<Utc>,
) -> AstroResult<SkyReport> {
    let location = config.location()?;
    let tz = config.timezone()?;
    let today = local_date(now, tz);

    let sun = twilight_events(ephemeris, &location, today, tz, Twilight::Astronomical)?;
    let moon = moon_sky(ephemeris, now, &location)?;
    let moon_days = moon_rise_set(
        ephemeris,
        &location,
        tz,
        local_midnight_utc(today, tz)?,
        config.search.moon_days,
    )?;
    let next_lunar = next_new_and_full_within(
        ephemeris,
        now,
        chrono::Duration::days(config.search.lunar_window_days as i64),
    );
    let darkness = tonight_dark_window(ephemeris, &location, tz, today)?;
    let astro_score = astro_score_for(
        snapshot.current.cloud_cover_percent,
        &moon,
        darkness.as_ref(),
    )?;
    let forecast = format_forecast_rows(
        &snapshot.probabilities(),
        &snapshot.hours(),
        &snapshot.dates(),
    );

    log::debug!(
        "Sky report for {}: score {}, moon {} at {:.1}°",
        today,
        astro_score,
        moon.phase,
        moon.altitude_deg
    );

    Ok(SkyReport {
        station: config.station.name.clone(),
        generated_at: now,
        conditions: current_conditions(snapshot, tz),
        sun,
        moon,
        moon_days,
        next_lunar,
        darkness,
        astro_score,
        forecast,
    })
}

#[cfg(test)]
#[path = "conditions_tests.rs"]
mod conditions_tests;
