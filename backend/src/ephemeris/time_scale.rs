//! UTC instants on the terrestrial time axis used by the position series.
//!
//! Every siderust query takes a `JulianDate` or `ModifiedJulianDate` on the
//! JD(TT) axis. The conversions here apply ΔT = TT − UT from tempoch's
//! tables, treating UTC as UT1.

use chrono::{DateTime, Utc};
use siderust::time::ModifiedJulianDate as SiderustMJD;
use tempoch::{JulianDate, Time, UT};

/// Julian Date (TT) of a UTC instant.
pub fn julian_date_tt(instant: DateTime<Utc>) -> JulianDate {
    JulianDate::from_utc(instant)
}

/// Modified Julian Date (TT) of a UTC instant.
pub fn mjd_tt(instant: DateTime<Utc>) -> SiderustMJD {
    SiderustMJD::from_utc(instant)
}

/// ΔT in seconds at a UTC instant.
pub fn delta_t_seconds(instant: DateTime<Utc>) -> f64 {
    Time::<UT>::from_utc(instant).delta_t().value()
}

/// Back to UTC; `None` outside chrono's representable range.
pub fn utc_from_mjd_tt(mjd: SiderustMJD) -> Option<DateTime<Utc>> {
    mjd.to_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_delta_t_2024() {
        let dt = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let delta_t = delta_t_seconds(dt);
        assert!((68.5..70.5).contains(&delta_t), "ΔT = {}", delta_t);
    }

    #[test]
    fn test_j2000_is_offset_by_delta_t() {
        let dt = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let offset_s = (julian_date_tt(dt).value() - 2_451_545.0) * 86_400.0;
        assert!((63.0..65.0).contains(&offset_s), "offset = {}", offset_s);
    }

    #[test]
    fn test_utc_round_trip() {
        let dt = Utc.with_ymd_and_hms(2025, 9, 21, 19, 53, 38).unwrap();
        let back = utc_from_mjd_tt(mjd_tt(dt)).unwrap();
        assert!((back - dt).num_milliseconds().abs() < 10);
    }
}
