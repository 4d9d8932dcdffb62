//! Sun Event Calculator.
//!
//! Dawn and dusk are the ascending and descending crossings of the Sun's
//! centre through `-depression` degrees, searched inside the local calendar
//! day. Sunrise/sunset use [`Twilight::Horizon`], whose depression folds in
//! refraction and the solar semidiameter.

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::api::{GeographicLocation, SunEvents, Twilight};
use crate::ephemeris::Ephemeris;
use crate::error::{ensure_finite, AstroError, AstroResult};
use crate::models::time::local_day_window;
use crate::services::event_search::{first_crossings, SearchParams};

/// Sun crossings of an arbitrary depression angle on a local date.
pub fn sun_events(
    ephemeris: &Ephemeris,
    location: &GeographicLocation,
    date: NaiveDate,
    tz: Tz,
    depression_deg: f64,
) -> AstroResult<SunEvents> {
    location.validate()?;
    let depression_deg = ensure_finite("depression_deg", depression_deg)?;
    if !(-90.0..=90.0).contains(&depression_deg) {
        return Err(AstroError::invalid_input(
            "depression_deg",
            "must be between -90 and 90 degrees",
        ));
    }

    let (start, end) = local_day_window(date, tz)?;
    let (dawn, dusk) = first_crossings(start, end, SearchParams::horizon(), -depression_deg, |t| {
        ephemeris.sun_altitude(t, location)
    });

    if dawn.is_none() || dusk.is_none() {
        log::debug!(
            "Sun does not cross -{:.2}° on {} at ({:.4}, {:.4})",
            depression_deg,
            date,
            location.latitude,
            location.longitude
        );
    }

    Ok(SunEvents {
        date,
        depression_deg,
        dawn,
        dusk,
    })
}

/// Sun events for one of the standard twilight definitions.
pub fn twilight_events(
    ephemeris: &Ephemeris,
    location: &GeographicLocation,
    date: NaiveDate,
    tz: Tz,
    twilight: Twilight,
) -> AstroResult<SunEvents> {
    sun_events(ephemeris, location, date, tz, twilight.depression_degrees())
}

/// Sunrise (`dawn`) and sunset (`dusk`).
pub fn sunrise_sunset(
    ephemeris: &Ephemeris,
    location: &GeographicLocation,
    date: NaiveDate,
    tz: Tz,
) -> AstroResult<SunEvents> {
    twilight_events(ephemeris, location, date, tz, Twilight::Horizon)
}

#[cfg(test)]
#[path = "sun_events_tests.rs"]
mod sun_events_tests;
