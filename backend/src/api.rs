//! Public value types shared with the display layer.
//!
//! Every type here is an immutable snapshot computed from a location, a
//! timezone and a reference instant. All derive Serialize/Deserialize so a
//! refresh can be logged or shipped as JSON.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, AstroError, AstroResult};

pub use crate::models::ModifiedJulianDate;

/// Rendered in place of any missing value.
pub const FORECAST_PLACEHOLDER: &str = "--";

/// Geographic location of the station.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeographicLocation {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180), east positive
    pub longitude: f64,
}

impl GeographicLocation {
    pub fn new(latitude: f64, longitude: f64) -> AstroResult<Self> {
        let location = Self {
            latitude,
            longitude,
        };
        location.validate()?;
        Ok(location)
    }

    /// Reject NaN or out-of-range coordinates.
    pub fn validate(&self) -> AstroResult<()> {
        let latitude = ensure_finite("latitude", self.latitude)?;
        let longitude = ensure_finite("longitude", self.longitude)?;
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(AstroError::invalid_input(
                "latitude",
                "must be between -90 and 90 degrees",
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(AstroError::invalid_input(
                "longitude",
                "must be between -180 and 180 degrees",
            ));
        }
        Ok(())
    }
}

/// Time period in Modified Julian Date (MJD) format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Period {
    /// Start time in MJD
    pub start: ModifiedJulianDate,
    /// End time in MJD
    pub stop: ModifiedJulianDate,
}

impl Period {
    pub fn new(start: ModifiedJulianDate, stop: ModifiedJulianDate) -> Option<Self> {
        if start.value() < stop.value() {
            Some(Self { start, stop })
        } else {
            None
        }
    }

    pub fn from_datetimes(start: DateTime<Utc>, stop: DateTime<Utc>) -> Option<Self> {
        Self::new(start.into(), stop.into())
    }

    /// Length of the interval in days.
    pub fn duration(&self) -> qtty::Days {
        qtty::Days::new(self.stop.value() - self.start.value())
    }
}

/// Standard solar depression angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Twilight {
    /// Sunrise/sunset: upper limb on the horizon including refraction.
    Horizon,
    Civil,
    Nautical,
    Astronomical,
}

impl Twilight {
    /// Degrees of the Sun's centre below the horizon.
    pub fn depression_degrees(&self) -> f64 {
        match self {
            Twilight::Horizon => 0.8333,
            Twilight::Civil => 6.0,
            Twilight::Nautical => 12.0,
            Twilight::Astronomical => 18.0,
        }
    }
}

/// Ascending and descending crossings of a depression angle on one local date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunEvents {
    pub date: NaiveDate,
    pub depression_deg: f64,
    /// Sun rising through the depression angle; `None` if it never does.
    pub dawn: Option<DateTime<Utc>>,
    /// Sun setting through the depression angle; `None` if it never does.
    pub dusk: Option<DateTime<Utc>>,
}

/// Named phase of the Moon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Bucket a lunar age in days. Boundaries are inclusive-low, exclusive-high.
    pub fn from_age(age_days: f64) -> Self {
        let age = age_days.rem_euclid(crate::ephemeris::SYNODIC_MONTH_DAYS);
        match age {
            a if (1.0..6.0).contains(&a) => MoonPhase::WaxingCrescent,
            a if (6.0..8.5).contains(&a) => MoonPhase::FirstQuarter,
            a if (8.5..13.5).contains(&a) => MoonPhase::WaxingGibbous,
            a if (13.5..15.5).contains(&a) => MoonPhase::Full,
            a if (15.5..21.0).contains(&a) => MoonPhase::WaningGibbous,
            a if (21.0..23.5).contains(&a) => MoonPhase::LastQuarter,
            a if (23.5..28.5).contains(&a) => MoonPhase::WaningCrescent,
            _ => MoonPhase::New,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::New => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::Full => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// First moonrise and moonset inside one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoonDayEvents {
    pub date: NaiveDate,
    pub moonrise: Option<DateTime<Utc>>,
    pub moonset: Option<DateTime<Utc>>,
}

/// Next new and full moon after a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NextLunarEvents {
    pub next_new: Option<DateTime<Utc>>,
    pub next_full: Option<DateTime<Utc>>,
}

/// Continuous astronomical darkness from tonight's dusk to tomorrow's dawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DarknessWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_hours: qtty::Hours,
}

impl DarknessWindow {
    /// Build a window, or `None` unless `end` is strictly after `start`.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if end <= start {
            return None;
        }
        let seconds = crate::models::time::duration_seconds(end - start);
        Some(Self {
            start,
            end,
            duration_hours: qtty::Hours::new(seconds / 3600.0),
        })
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_hours.value() * 3600.0
    }
}

/// Moon as seen from the station at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoonSky {
    /// Topocentric altitude of the centre in degrees.
    pub altitude_deg: f64,
    /// Illuminated fraction in [0, 1].
    pub illumination: f64,
    pub age_days: f64,
    pub phase: MoonPhase,
}

/// One day of the precipitation outlook, already rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub day_label: String,
    pub probability: String,
    pub hours: String,
}

impl ForecastRow {
    pub fn placeholder() -> Self {
        Self {
            day_label: FORECAST_PLACEHOLDER.to_string(),
            probability: FORECAST_PLACEHOLDER.to_string(),
            hours: FORECAST_PLACEHOLDER.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.probability == FORECAST_PLACEHOLDER && self.hours == FORECAST_PLACEHOLDER
    }
}

/// Current weather as display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: String,
    pub cloud_cover: String,
    pub day_night: String,
    pub precipitation: String,
    pub sunrise: String,
    pub sunset: String,
    pub precipitation_probability: String,
    pub precipitation_hours: String,
}

/// Everything one refresh produces for the display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyReport {
    pub station: String,
    pub generated_at: DateTime<Utc>,
    pub conditions: CurrentConditions,
    pub sun: SunEvents,
    pub moon: MoonSky,
    pub moon_days: Vec<MoonDayEvents>,
    pub next_lunar: NextLunarEvents,
    pub darkness: Option<DarknessWindow>,
    pub astro_score: u8,
    pub forecast: Vec<ForecastRow>,
}
