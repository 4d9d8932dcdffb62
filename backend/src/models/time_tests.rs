#[cfg(test)]
mod tests {
    use crate::models::time::*;
    use chrono::{Duration, NaiveDate, TimeZone, Timelike, Utc};
    use chrono_tz::Tz;

    fn la() -> Tz {
        parse_timezone("America/Los_Angeles").unwrap()
    }

    #[test]
    fn test_mjd_new() {
        let mjd = ModifiedJulianDate::new(50000.0);
        assert_eq!(mjd.value(), 50000.0);
    }

    #[test]
    fn test_mjd_from_f64() {
        let mjd: ModifiedJulianDate = 58849.0.into();
        assert_eq!(mjd.value(), 58849.0);
    }

    #[test]
    fn test_mjd_ordering() {
        let mjd1 = ModifiedJulianDate::new(50000.0);
        let mjd2 = ModifiedJulianDate::new(51000.0);

        assert!(mjd1 < mjd2);
        assert!(mjd2 > mjd1);
    }

    #[test]
    fn test_mjd_to_unix_timestamp() {
        // MJD 40587.0 corresponds to Unix epoch (1970-01-01)
        let mjd = ModifiedJulianDate::new(40587.0);
        assert!((mjd.to_unix_timestamp()).abs() < 1.0);
    }

    #[test]
    fn test_mjd_roundtrip_datetime() {
        let dt = Utc.with_ymd_and_hms(2025, 9, 7, 4, 30, 0).unwrap();
        let back = ModifiedJulianDate::from_datetime(dt).to_datetime();
        assert!((back - dt).num_milliseconds().abs() < 1);
    }

    #[test]
    fn test_night_window_runs_noon_to_noon() {
        let tz = parse_timezone("Europe/Paris").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();
        let (start, end) = local_night_window(date, tz).unwrap();
        // CEST is UTC+2
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 5, 20, 10, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 5, 21, 10, 0, 0).unwrap());
        assert_eq!(local_noon_utc(date, tz).unwrap(), start);
    }

    #[test]
    fn test_parse_timezone_rejects_unknown_zone() {
        assert!(parse_timezone("America/Los_Angeles").is_ok());
        let err = parse_timezone("Mars/Olympus_Mons").unwrap_err();
        assert!(err.to_string().contains("timezone"));
    }

    #[test]
    fn test_format_local_roundtrip_to_the_minute() {
        let tz = la();
        let instants = [
            Utc.with_ymd_and_hms(2025, 1, 15, 3, 17, 42).unwrap(),
            Utc.with_ymd_and_hms(2025, 7, 4, 19, 59, 1).unwrap(),
            // 01:30 PDT and 01:30 PST on the fall-back night
            Utc.with_ymd_and_hms(2025, 11, 2, 8, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 11, 2, 9, 30, 0).unwrap(),
        ];

        for instant in instants {
            let text = format_local(instant, tz);
            let back = parse_local(&text, tz).unwrap();
            let truncated = instant.with_second(0).unwrap().with_nanosecond(0).unwrap();
            assert_eq!(back, truncated, "round trip failed for {}", text);
        }
    }

    #[test]
    fn test_parse_local_naive_uses_station_zone() {
        let tz = la();
        let utc = parse_local("2025-09-07T06:35", tz).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2025, 9, 7, 13, 35, 0).unwrap());
    }

    #[test]
    fn test_parse_local_rejects_dst_gap() {
        let tz = la();
        assert!(parse_local("2025-03-09 02:30", tz).is_err());
        assert!(parse_local("not a time", tz).is_err());
    }

    #[test]
    fn test_format_clock() {
        let tz = la();
        let instant = Utc.with_ymd_and_hms(2025, 9, 7, 13, 35, 0).unwrap();
        assert_eq!(format_clock(instant, tz), "06:35 AM");
    }

    #[test]
    fn test_local_day_window_normal_and_dst_days() {
        let tz = la();

        let normal = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let (start, end) = local_day_window(normal, tz).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap());
        assert_eq!(end - start, Duration::hours(24));

        let spring = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let (start, end) = local_day_window(spring, tz).unwrap();
        assert_eq!(end - start, Duration::hours(23));

        let fall = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
        let (start, end) = local_day_window(fall, tz).unwrap();
        assert_eq!(end - start, Duration::hours(25));
    }

    #[test]
    fn test_local_date_crosses_utc_midnight() {
        let tz = la();
        let instant = Utc.with_ymd_and_hms(2025, 9, 8, 3, 0, 0).unwrap();
        assert_eq!(local_date(instant, tz), NaiveDate::from_ymd_opt(2025, 9, 7).unwrap());
    }
}
