//! Moon Event Calculator: phase, daily rise/set and the next new/full moon.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::api::{GeographicLocation, MoonDayEvents, MoonPhase, NextLunarEvents};
use crate::ephemeris::{Ephemeris, SYNODIC_MONTH_DAYS};
use crate::error::{AstroError, AstroResult};
use crate::models::time::{local_date, local_day_window, local_noon_utc};
use crate::services::event_search::{find_discrete_until, first_crossings, SearchParams};

/// Standard refraction at the horizon in degrees.
const HORIZON_REFRACTION_DEG: f64 = 0.5667;

/// Forward window for [`next_new_and_full`].
pub const LUNAR_SEARCH_DAYS: i64 = 90;

/// Lunar age in days since the last new moon, from the Sun-Moon elongation.
pub fn lunar_age(ephemeris: &Ephemeris, instant: DateTime<Utc>) -> f64 {
    ephemeris.phase_angle_degrees(instant) / 360.0 * SYNODIC_MONTH_DAYS
}

pub fn moon_phase_at(ephemeris: &Ephemeris, instant: DateTime<Utc>) -> MoonPhase {
    MoonPhase::from_age(lunar_age(ephemeris, instant))
}

/// Phase name for a local calendar date, evaluated at local noon.
pub fn moon_phase_name(ephemeris: &Ephemeris, date: NaiveDate, tz: Tz) -> AstroResult<MoonPhase> {
    Ok(moon_phase_at(ephemeris, local_noon_utc(date, tz)?))
}

/// First moonrise and moonset on each of `num_days` local days.
///
/// The first day is the local date of `start_local_midnight`. Rise and set
/// are crossings of the upper limb through the horizon: topocentric centre
/// altitude plus semidiameter plus standard refraction.
pub fn moon_rise_set(
    ephemeris: &Ephemeris,
    location: &GeographicLocation,
    tz: Tz,
    start_local_midnight: DateTime<Utc>,
    num_days: u32,
) -> AstroResult<Vec<MoonDayEvents>> {
    location.validate()?;
    moon_rise_set_with(tz, start_local_midnight, num_days, |t| {
        let moon = ephemeris.moon_topocentric(t, location);
        moon.altitude.value() + moon.semidiameter.value() + HORIZON_REFRACTION_DEG
    })
}

/// Daily rise/set search over any horizon-relative altitude signal
/// (positive above the horizon).
pub fn moon_rise_set_with<A>(
    tz: Tz,
    start_local_midnight: DateTime<Utc>,
    num_days: u32,
    altitude: A,
) -> AstroResult<Vec<MoonDayEvents>>
where
    A: Fn(DateTime<Utc>) -> f64,
{
    if num_days == 0 {
        return Err(AstroError::invalid_input("num_days", "must be at least 1"));
    }

    let first = local_date(start_local_midnight, tz);
    let mut days = Vec::with_capacity(num_days as usize);
    for date in first.iter_days().take(num_days as usize) {
        let (start, end) = local_day_window(date, tz)?;
        let (moonrise, moonset) = first_crossings(start, end, SearchParams::horizon(), 0.0, &altitude);
        days.push(MoonDayEvents {
            date,
            moonrise,
            moonset,
        });
    }
    Ok(days)
}

fn quarter(ephemeris: &Ephemeris, instant: DateTime<Utc>) -> u8 {
    ((ephemeris.phase_angle_degrees(instant) / 90.0).floor() as u8).min(3)
}

/// Next new and full moon within [`LUNAR_SEARCH_DAYS`] after `reference`.
pub fn next_new_and_full(ephemeris: &Ephemeris, reference: DateTime<Utc>) -> NextLunarEvents {
    next_new_and_full_within(ephemeris, reference, Duration::days(LUNAR_SEARCH_DAYS))
}

/// Next new and full moon within `window` after `reference`; either is absent
/// when the window ends first.
///
/// A boundary within one search precision of `reference` is the reference
/// itself and is skipped.
pub fn next_new_and_full_within(
    ephemeris: &Ephemeris,
    reference: DateTime<Utc>,
    window: Duration,
) -> NextLunarEvents {
    let params = SearchParams::lunar_phase();
    let earliest = reference + params.precision;
    let mut events = NextLunarEvents {
        next_new: None,
        next_full: None,
    };

    find_discrete_until(
        reference,
        reference + window,
        params,
        |t| quarter(ephemeris, t),
        |transition| {
            if transition.instant > earliest {
                match transition.to {
                    0 if events.next_new.is_none() => events.next_new = Some(transition.instant),
                    2 if events.next_full.is_none() => events.next_full = Some(transition.instant),
                    _ => {}
                }
            }
            events.next_new.is_some() && events.next_full.is_some()
        },
    );

    if events.next_new.is_none() || events.next_full.is_none() {
        log::debug!(
            "Lunar search from {} over {} days incomplete: {:?}",
            reference,
            window.num_days(),
            events
        );
    }
    events
}

#[cfg(test)]
#[path = "moon_events_tests.rs"]
mod moon_events_tests;
