// ============================================================================
// Weather Snapshot Parsing
// ============================================================================
//
// The station consumes an Open-Meteo forecast payload fetched by an external
// collaborator. Daily timestamps arrive as local ISO strings without an
// offset and are resolved in the station timezone here, so everything past
// this module sees UTC instants.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{AstroError, AstroResult};
use crate::models::time::parse_local;

#[derive(Debug, Deserialize)]
struct WeatherInput {
    current: CurrentInput,
    #[serde(default)]
    daily: DailyInput,
}

#[derive(Debug, Deserialize)]
struct CurrentInput {
    temperature_2m: f64,
    cloud_cover: f64,
    is_day: u8,
    #[serde(default)]
    precipitation: f64,
}

#[derive(Debug, Default, Deserialize)]
struct DailyInput {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    sunrise: Vec<Option<String>>,
    #[serde(default)]
    sunset: Vec<Option<String>>,
    #[serde(default)]
    precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_hours: Vec<Option<f64>>,
}

/// Current conditions in station units (°F, inches).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature_f: f64,
    pub cloud_cover_percent: f64,
    pub is_day: bool,
    pub precipitation_in: f64,
}

/// One forecast day; any field may be missing in the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    /// `None` when the payload's date string is malformed.
    pub date: Option<NaiveDate>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub precipitation_probability_max: Option<f64>,
    pub precipitation_hours: Option<f64>,
}

/// Weather snapshot handed to the calculators on each refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentWeather,
    pub daily: Vec<DailyWeather>,
}

impl WeatherSnapshot {
    pub fn today(&self) -> Option<&DailyWeather> {
        self.daily.first()
    }

    pub fn probabilities(&self) -> Vec<Option<f64>> {
        self.daily
            .iter()
            .map(|d| d.precipitation_probability_max)
            .collect()
    }

    pub fn hours(&self) -> Vec<Option<f64>> {
        self.daily.iter().map(|d| d.precipitation_hours).collect()
    }

    pub fn dates(&self) -> Vec<Option<NaiveDate>> {
        self.daily.iter().map(|d| d.date).collect()
    }
}

fn local_instant(text: Option<&Option<String>>, tz: Tz, field: &str) -> Option<DateTime<Utc>> {
    let text = text?.as_deref()?;
    match parse_local(text, tz) {
        Ok(instant) => Some(instant),
        Err(e) => {
            log::warn!("Skipping malformed {} value '{}': {}", field, text, e);
            None
        }
    }
}

/// Parse an Open-Meteo forecast payload.
///
/// Rows are keyed by `daily.time`; shorter sibling arrays leave the
/// corresponding fields empty. A row with an unparseable date is kept with
/// every field empty so later rows stay on their day.
pub fn parse_weather_json_str(json: &str, tz: Tz) -> AstroResult<WeatherSnapshot> {
    let deserializer = &mut serde_json::Deserializer::from_str(json);
    let input: WeatherInput = serde_path_to_error::deserialize(deserializer)
        .map_err(|e| AstroError::WeatherParse(format!("{} at {}", e.inner(), e.path())))?;

    let current = CurrentWeather {
        temperature_f: input.current.temperature_2m,
        cloud_cover_percent: input.current.cloud_cover,
        is_day: input.current.is_day != 0,
        precipitation_in: input.current.precipitation,
    };

    let daily_input = &input.daily;
    let mut daily = Vec::with_capacity(daily_input.time.len());
    for (i, day) in daily_input.time.iter().enumerate() {
        let date = match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            Ok(date) => date,
            Err(e) => {
                log::warn!("Blanking forecast row {} with malformed date '{}': {}", i, day, e);
                daily.push(DailyWeather::default());
                continue;
            }
        };
        daily.push(DailyWeather {
            date: Some(date),
            sunrise: local_instant(daily_input.sunrise.get(i), tz, "sunrise"),
            sunset: local_instant(daily_input.sunset.get(i), tz, "sunset"),
            precipitation_probability_max: daily_input
                .precipitation_probability_max
                .get(i)
                .copied()
                .flatten(),
            precipitation_hours: daily_input.precipitation_hours.get(i).copied().flatten(),
        });
    }

    Ok(WeatherSnapshot { current, daily })
}

/// Parse a weather snapshot from a JSON file on disk.
pub fn parse_weather_json_file(path: &Path, tz: Tz) -> AstroResult<WeatherSnapshot> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        AstroError::WeatherParse(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_weather_json_str(&json, tz)
}

#[cfg(test)]
#[path = "weather_tests.rs"]
mod weather_tests;
