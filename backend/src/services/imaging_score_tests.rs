#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    use crate::api::{DarknessWindow, GeographicLocation, MoonPhase};
    use crate::ephemeris::get_ephemeris;
    use crate::error::AstroError;
    use crate::services::imaging_score::{
        astro_score, astro_score_for, moon_altitude_and_illumination, moon_sky,
    };

    const EIGHT_HOURS: f64 = 8.0 * 3600.0;

    #[test]
    fn test_all_components_saturate() {
        assert_eq!(astro_score(0.0, -10.0, 0.0, EIGHT_HOURS).unwrap(), 100);
    }

    #[test]
    fn test_worst_case_is_zero() {
        assert_eq!(astro_score(100.0, 20.0, 1.0, 0.0).unwrap(), 0);
    }

    #[test]
    fn test_cloud_component() {
        // only the cloud term varies: 20 + 20 + 10 fixed
        assert_eq!(astro_score(0.0, -1.0, 0.0, EIGHT_HOURS).unwrap(), 100);
        assert_eq!(astro_score(100.0, -1.0, 0.0, EIGHT_HOURS).unwrap(), 50);
        assert_eq!(astro_score(50.0, -1.0, 0.0, EIGHT_HOURS).unwrap(), 75);
        assert_eq!(astro_score(150.0, -1.0, 0.0, EIGHT_HOURS).unwrap(), 50);
        assert_eq!(astro_score(-20.0, -1.0, 0.0, EIGHT_HOURS).unwrap(), 100);
    }

    #[test]
    fn test_moon_altitude_component() {
        let base = |alt: f64| astro_score(100.0, alt, 1.0, 0.0).unwrap();
        assert_eq!(base(0.0), 20);
        assert_eq!(base(-10.0), 20);
        assert_eq!(base(5.0), 15);
        assert_eq!(base(19.5), 1);
        assert_eq!(base(20.0), 0);
        assert_eq!(base(45.0), 0);
    }

    #[test]
    fn test_illumination_component() {
        let base = |illum: f64| astro_score(100.0, 45.0, illum, 0.0).unwrap();
        assert_eq!(base(0.0), 20);
        assert_eq!(base(1.0), 0);
        assert_eq!(base(0.5), 10);
        assert_eq!(base(1.5), 0);
        assert_eq!(base(-0.5), 20);
    }

    #[test]
    fn test_darkness_component() {
        let base = |secs: f64| astro_score(100.0, 45.0, 1.0, secs).unwrap();
        assert_eq!(base(0.0), 0);
        assert_eq!(base(EIGHT_HOURS / 2.0), 5);
        assert_eq!(base(EIGHT_HOURS), 10);
        assert_eq!(base(12.0 * 3600.0), 10);
    }

    #[test]
    fn test_nan_rejected() {
        assert!(matches!(
            astro_score(f64::NAN, 0.0, 0.0, 0.0),
            Err(AstroError::InvalidInput { .. })
        ));
        assert!(astro_score(0.0, f64::NAN, 0.0, 0.0).is_err());
        assert!(astro_score(0.0, 0.0, f64::NAN, 0.0).is_err());
        assert!(astro_score(0.0, 0.0, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_score_for_missing_darkness() {
        let eph = get_ephemeris().unwrap();
        let loc = GeographicLocation::new(33.8847, -118.41).unwrap();
        let instant = Utc.with_ymd_and_hms(2025, 9, 21, 12, 0, 0).unwrap();
        let moon = moon_sky(&eph, instant, &loc).unwrap();
        let dusk = Utc.with_ymd_and_hms(2025, 9, 21, 3, 0, 0).unwrap();
        let window = DarknessWindow::between(dusk, dusk + chrono::Duration::hours(9)).unwrap();

        let without = astro_score_for(0.0, &moon, None).unwrap();
        let with = astro_score_for(0.0, &moon, Some(&window)).unwrap();
        assert_eq!(with, without + 10);
    }

    #[test]
    fn test_moon_sky_near_full_moon() {
        let eph = get_ephemeris().unwrap();
        let loc = GeographicLocation::new(33.8847, -118.41).unwrap();
        // 2025-09-08 06:00 UTC is late evening in California, moon well up
        let instant = Utc.with_ymd_and_hms(2025, 9, 8, 6, 0, 0).unwrap();
        let (altitude, illumination) = moon_altitude_and_illumination(&eph, instant, &loc).unwrap();
        assert!(altitude > 20.0, "altitude {}", altitude);
        assert!(illumination > 0.98);

        let sky = moon_sky(&eph, instant, &loc).unwrap();
        assert_eq!(sky.phase, MoonPhase::Full);
    }

    proptest! {
        #[test]
        fn prop_score_in_range(
            cloud in -50.0..150.0f64,
            alt in -90.0..90.0f64,
            illum in -0.5..1.5f64,
            dark in -3600.0..86400.0f64,
        ) {
            let score = astro_score(cloud, alt, illum, dark).unwrap();
            prop_assert!(score <= 100);
        }

        #[test]
        fn prop_more_cloud_never_helps(
            a in 0.0..100.0f64,
            b in 0.0..100.0f64,
            alt in -90.0..90.0f64,
            illum in 0.0..1.0f64,
            dark in 0.0..40000.0f64,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let clear = astro_score(lo, alt, illum, dark).unwrap();
            let cloudy = astro_score(hi, alt, illum, dark).unwrap();
            prop_assert!(cloudy <= clear);
        }

        #[test]
        fn prop_moon_phase_total(age in -100.0..100.0f64) {
            // every age maps to some phase and the mapping is periodic
            let phase = MoonPhase::from_age(age);
            let wrapped = MoonPhase::from_age(age.rem_euclid(crate::ephemeris::SYNODIC_MONTH_DAYS));
            prop_assert_eq!(phase, wrapped);
        }
    }
}
