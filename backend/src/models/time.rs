//! Time representations and timezone boundary conversions.
//!
//! All astronomical computation runs on absolute UTC instants
//! (`DateTime<Utc>`). Local time only appears when a calendar day is turned
//! into a UTC search window or when an instant is rendered for display, and
//! both directions go through the functions in this module.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::*;

use crate::error::{AstroError, AstroResult};

/// Display format round-tripped by [`format_local`] and [`parse_local`].
pub const LOCAL_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M %:z";

/// Twelve-hour clock used for sunrise/sunset labels.
pub const CLOCK_FORMAT: &str = "%I:%M %p";

/// Modified Julian Date representation.
/// MJD 0 = 1858-11-17 00:00:00 UTC
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ModifiedJulianDate(qtty::Days);

impl ModifiedJulianDate {
    /// Create a new MJD value.
    pub fn new<V: Into<qtty::Days>>(v: V) -> Self {
        Self(v.into())
    }

    /// Raw MJD value as f64.
    pub fn value(&self) -> f64 {
        self.0.value()
    }

    /// Convert to Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    pub fn to_unix_timestamp(&self) -> f64 {
        (self.value() - 40587.0) * 86400.0
    }

    /// Create from Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    pub fn from_unix_timestamp(timestamp: f64) -> Self {
        Self::new(timestamp / 86400.0 + 40587.0)
    }

    /// Convert to chrono DateTime<Utc>.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        let secs = self.to_unix_timestamp();
        let secs_i64 = secs.floor() as i64;
        let nanos = ((secs - secs.floor()) * 1e9) as u32;
        DateTime::from_timestamp(secs_i64, nanos).unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Create from chrono DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self::from_unix_timestamp(dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1e9)
    }
}

impl From<f64> for ModifiedJulianDate {
    fn from(v: f64) -> Self {
        ModifiedJulianDate::new(v)
    }
}

impl From<DateTime<Utc>> for ModifiedJulianDate {
    fn from(dt: DateTime<Utc>) -> Self {
        ModifiedJulianDate::from_datetime(dt)
    }
}

/// Parse an IANA zone identifier such as `America/Los_Angeles`.
pub fn parse_timezone(name: &str) -> AstroResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| AstroError::invalid_input("timezone", format!("{}: {}", name, e)))
}

/// Express a UTC instant in the given zone.
pub fn to_local(instant: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    instant.with_timezone(&tz)
}

/// Calendar date of an instant in the given zone.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    to_local(instant, tz).date_naive()
}

/// Render an instant as local wall time with its UTC offset, to the minute.
pub fn format_local(instant: DateTime<Utc>, tz: Tz) -> String {
    to_local(instant, tz).format(LOCAL_DISPLAY_FORMAT).to_string()
}

/// Render an instant on a twelve-hour local clock, e.g. `06:41 AM`.
pub fn format_clock(instant: DateTime<Utc>, tz: Tz) -> String {
    to_local(instant, tz).format(CLOCK_FORMAT).to_string()
}

/// Parse local wall time back into a UTC instant.
///
/// Accepts the [`LOCAL_DISPLAY_FORMAT`] output (offset included, so repeated
/// wall times at DST fall-back resolve exactly) and bare
/// `YYYY-MM-DD HH:MM` / `YYYY-MM-DDTHH:MM` values, which resolve to the
/// earliest matching instant in `tz`.
pub fn parse_local(text: &str, tz: Tz) -> AstroResult<DateTime<Utc>> {
    let trimmed = text.trim();

    if let Ok(dt) = DateTime::parse_from_str(trimmed, LOCAL_DISPLAY_FORMAT) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| {
            AstroError::invalid_input("local_time", format!("unrecognised timestamp '{}'", text))
        })?;

    from_local_naive(naive, tz)
}

/// Resolve a naive local timestamp in `tz` to UTC.
///
/// Ambiguous times take the earlier instant; times inside a DST gap are
/// rejected.
pub fn from_local_naive(naive: NaiveDateTime, tz: Tz) -> AstroResult<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            AstroError::invalid_input(
                "local_time",
                format!("{} does not exist in {}", naive, tz.name()),
            )
        })
}

/// UTC instant of the start of a local calendar day.
///
/// A few zones start DST at midnight, so the first existing wall time of the
/// day is used when 00:00 is skipped.
pub fn local_midnight_utc(date: NaiveDate, tz: Tz) -> AstroResult<DateTime<Utc>> {
    for hour in 0..3 {
        let wall = date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN));
        if let Some(dt) = tz.from_local_datetime(&wall).earliest() {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    Err(AstroError::invalid_input(
        "date",
        format!("no start of day for {} in {}", date, tz.name()),
    ))
}

/// UTC window `[start, end)` covering one local calendar day.
///
/// The window follows local midnights, so it spans 23 or 25 hours on DST
/// transition days.
pub fn local_day_window(date: NaiveDate, tz: Tz) -> AstroResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = local_midnight_utc(date, tz)?;
    let next = date
        .succ_opt()
        .ok_or_else(|| AstroError::invalid_input("date", format!("{} has no successor", date)))?;
    let end = local_midnight_utc(next, tz)?;
    Ok((start, end))
}

/// UTC instant of local noon on a calendar day.
pub fn local_noon_utc(date: NaiveDate, tz: Tz) -> AstroResult<DateTime<Utc>> {
    from_local_naive(date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)), tz)
}

/// UTC window `[start, end)` from local noon on `date` to local noon on the
/// next day: the whole night that begins on `date`.
pub fn local_night_window(
    date: NaiveDate,
    tz: Tz,
) -> AstroResult<(DateTime<Utc>, DateTime<Utc>)> {
    let next = date
        .succ_opt()
        .ok_or_else(|| AstroError::invalid_input("date", format!("{} has no successor", date)))?;
    Ok((local_noon_utc(date, tz)?, local_noon_utc(next, tz)?))
}

/// Length of a chrono duration in fractional seconds.
pub fn duration_seconds(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
