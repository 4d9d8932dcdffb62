//! Imaging Score Calculator.
//!
//! The score is a fixed weighted sum:
//!
//! | component  | weight | saturates at            |
//! |------------|--------|-------------------------|
//! | clear sky  | 50     | 0 % cloud               |
//! | moon alt   | 20     | moon at or below horizon|
//! | moon illum | 20     | new moon                |
//! | darkness   | 10     | 8 h of darkness         |

use chrono::{DateTime, Utc};

use crate::api::{DarknessWindow, GeographicLocation, MoonPhase, MoonSky};
use crate::ephemeris::Ephemeris;
use crate::error::{ensure_finite, AstroResult};
use crate::services::moon_events::lunar_age;

/// Darkness that earns the full darkness component.
pub const FULL_DARKNESS_SECONDS: f64 = 28_800.0;

/// Topocentric altitude (degrees) and illuminated fraction of the Moon.
pub fn moon_altitude_and_illumination(
    ephemeris: &Ephemeris,
    instant: DateTime<Utc>,
    location: &GeographicLocation,
) -> AstroResult<(f64, f64)> {
    location.validate()?;
    Ok((
        ephemeris.moon_altitude(instant, location),
        ephemeris.moon_illumination(instant),
    ))
}

/// Moon altitude, illumination, age and phase at one instant.
pub fn moon_sky(
    ephemeris: &Ephemeris,
    instant: DateTime<Utc>,
    location: &GeographicLocation,
) -> AstroResult<MoonSky> {
    let (altitude_deg, illumination) = moon_altitude_and_illumination(ephemeris, instant, location)?;
    let age_days = lunar_age(ephemeris, instant);
    Ok(MoonSky {
        altitude_deg,
        illumination,
        age_days,
        phase: MoonPhase::from_age(age_days),
    })
}

/// Combine sky conditions into a 0-100 imaging score.
///
/// Finite out-of-range inputs are clamped; NaN is rejected.
pub fn astro_score(
    cloud_cover_percent: f64,
    moon_altitude_deg: f64,
    illumination_fraction: f64,
    darkness_seconds: f64,
) -> AstroResult<u8> {
    let cloud = ensure_not_nan("cloud_cover_percent", cloud_cover_percent)?;
    let altitude = ensure_not_nan("moon_altitude_deg", moon_altitude_deg)?;
    let illumination = ensure_not_nan("illumination_fraction", illumination_fraction)?;
    let darkness = ensure_not_nan("darkness_seconds", darkness_seconds)?;

    let clear_sky = (100.0 - cloud.clamp(0.0, 100.0)) * 0.5;
    let moon_alt = if altitude <= 0.0 {
        20.0
    } else {
        (20.0 - altitude).max(0.0)
    };
    let illum = (1.0 - illumination.clamp(0.0, 1.0)) * 20.0;
    let dark = (darkness / FULL_DARKNESS_SECONDS).min(1.0) * 10.0;

    let total = (clear_sky + moon_alt + illum + dark).clamp(0.0, 100.0).round();
    Ok(total as u8)
}

/// Score from the refresh's cloud cover, moon and optional darkness window.
pub fn astro_score_for(
    cloud_cover_percent: f64,
    moon: &MoonSky,
    darkness: Option<&DarknessWindow>,
) -> AstroResult<u8> {
    let darkness_seconds = darkness.map_or(0.0, DarknessWindow::duration_seconds);
    astro_score(
        cloud_cover_percent,
        moon.altitude_deg,
        moon.illumination,
        darkness_seconds,
    )
}

// Infinities clamp like any other out-of-range value.
fn ensure_not_nan(field: &str, value: f64) -> AstroResult<f64> {
    if value.is_nan() {
        ensure_finite(field, value)
    } else {
        Ok(value)
    }
}

#[cfg(test)]
#[path = "imaging_score_tests.rs"]
mod imaging_score_tests;
