//! Astronomical night computation service.
//!
//! Astronomical darkness is the period when the Sun's centre is more than
//! 18° below the horizon. This module resolves tonight's darkness window for
//! the display and, using the siderust altitude-period search, every
//! darkness interval inside an arbitrary period.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use siderust::bodies::solar_system::Sun;
use siderust::calculus::altitude::AltitudePeriodsProvider;
use siderust::calculus::solar::twilight;
use siderust::time::Period as SiderustPeriod;

use crate::api::{DarknessWindow, GeographicLocation, ModifiedJulianDate, Period};
use crate::ephemeris::{observer_site, time_scale, Ephemeris};
use crate::error::AstroResult;
use crate::models::time::local_night_window;
use crate::services::event_search::{find_crossings, Crossing, SearchParams};

/// Darkness from the first descending crossing to the ascending one after it.
///
/// A window of a full day or more is not a night and is rejected.
pub fn dark_window_from_crossings(
    crossings: &[(DateTime<Utc>, Crossing)],
) -> Option<DarknessWindow> {
    let dusk_index = crossings
        .iter()
        .position(|(_, direction)| *direction == Crossing::Descending)?;
    let dusk = crossings[dusk_index].0;
    let dawn = crossings[dusk_index + 1..]
        .iter()
        .find(|(_, direction)| *direction == Crossing::Ascending)?
        .0;
    DarknessWindow::between(dusk, dawn).filter(|w| w.duration() < Duration::hours(24))
}

/// Tonight's continuous astronomical darkness at the station.
///
/// The night of `reference_date` is searched from local noon to the next
/// local noon, so a dusk that falls after midnight still pairs with the dawn
/// that follows it. Absent when the Sun never drops below -18° in that span
/// (high-latitude summer) or never rises above it (polar night).
pub fn tonight_dark_window(
    ephemeris: &Ephemeris,
    location: &GeographicLocation,
    tz: Tz,
    reference_date: NaiveDate,
) -> AstroResult<Option<DarknessWindow>> {
    location.validate()?;
    let (start, end) = local_night_window(reference_date, tz)?;
    let crossings = find_crossings(
        start,
        end,
        SearchParams::horizon(),
        twilight::ASTRONOMICAL.value(),
        |t| ephemeris.sun_altitude(t, location),
    );

    let window = dark_window_from_crossings(&crossings);
    if window.is_none() {
        log::debug!(
            "No darkness window for the night of {} ({} crossings of -18°)",
            reference_date,
            crossings.len()
        );
    }
    Ok(window)
}

/// Compute astronomical night periods for a given observer location and time period.
///
/// Astronomical night is defined as the period when the Sun's center is more than
/// 18° below the horizon (altitude < -18°). Nights overlapping the period
/// edges are clipped to it.
pub fn compute_astronomical_nights(
    location: &GeographicLocation,
    time_period: &Period,
) -> AstroResult<Vec<Period>> {
    location.validate()?;

    // Convert our Period to siderust Period (TT axis)
    let search_period = SiderustPeriod::new(
        time_scale::mjd_tt(time_period.start.to_datetime()),
        time_scale::mjd_tt(time_period.stop.to_datetime()),
    );

    let nights = Sun.below_threshold(observer_site(location), search_period, twilight::ASTRONOMICAL);

    // Convert siderust Periods back to our Period type
    Ok(nights
        .into_iter()
        .filter_map(|p| {
            let start = time_scale::utc_from_mjd_tt(p.start)?;
            let stop = time_scale::utc_from_mjd_tt(p.end)?;
            Period::from_datetimes(start, stop)
        })
        .collect())
}

/// Total hours of astronomical night inside the period.
pub fn total_dark_hours(nights: &[Period]) -> f64 {
    nights.iter().map(|p| p.duration().value() * 24.0).sum()
}

/// Period spanning `days` whole days from an MJD start.
pub fn period_of_days(start: ModifiedJulianDate, days: u32) -> Option<Period> {
    let stop = ModifiedJulianDate::new(start.value() + days as f64);
    Period::new(start, stop)
}
