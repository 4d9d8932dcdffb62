#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::services::event_search::{
        find_crossings, find_discrete, find_discrete_until, first_crossings, Crossing, SearchParams,
    };

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn hours_since(t: DateTime<Utc>) -> f64 {
        (t - t0()).num_milliseconds() as f64 / 3_600_000.0
    }

    #[test]
    fn test_step_function_transitions_are_ordered_and_precise() {
        let start = t0();
        let end = start + Duration::hours(10);
        // value changes at 2h30m and 7h15m20s
        let a = start + Duration::minutes(150);
        let b = start + Duration::seconds(7 * 3600 + 15 * 60 + 20);
        let f = |t: DateTime<Utc>| (t >= a) as u8 + (t >= b) as u8;

        let found = find_discrete(start, end, SearchParams::horizon(), f);
        assert_eq!(found.len(), 2);
        assert!((found[0].instant - a).num_milliseconds().abs() <= 1000);
        assert!((found[1].instant - b).num_milliseconds().abs() <= 1000);
        assert_eq!((found[0].from, found[0].to), (0, 1));
        assert_eq!((found[1].from, found[1].to), (1, 2));
        assert!(found[0].instant < found[1].instant);
    }

    #[test]
    fn test_transition_at_window_start_is_excluded() {
        let start = t0();
        let f = |t: DateTime<Utc>| t >= start;
        let found = find_discrete(start, start + Duration::hours(1), SearchParams::horizon(), f);
        assert!(found.is_empty());
    }

    #[test]
    fn test_empty_or_reversed_window() {
        let start = t0();
        assert!(find_discrete(start, start, SearchParams::horizon(), |_| 0).is_empty());
        assert!(
            find_discrete(start, start - Duration::hours(1), SearchParams::horizon(), |_| 0)
                .is_empty()
        );
    }

    #[test]
    fn test_crossings_of_sine_signal() {
        // period of 12 hours, zero at 0h, 6h, 12h...
        let signal = |t: DateTime<Utc>| (hours_since(t) * std::f64::consts::PI / 6.0).sin();
        let start = t0() + Duration::minutes(30);
        let end = t0() + Duration::hours(13);
        let crossings = find_crossings(start, end, SearchParams::horizon(), 0.0, signal);

        let directions: Vec<Crossing> = crossings.iter().map(|(_, d)| *d).collect();
        assert_eq!(directions, vec![Crossing::Descending, Crossing::Ascending]);
        assert!((hours_since(crossings[0].0) - 6.0).abs() < 1.0 / 3600.0);
        assert!((hours_since(crossings[1].0) - 12.0).abs() < 1.0 / 3600.0);

        let (up, down) = first_crossings(start, end, SearchParams::horizon(), 0.0, signal);
        assert_eq!(up, Some(crossings[1].0));
        assert_eq!(down, Some(crossings[0].0));
    }

    #[test]
    fn test_constant_signal_has_no_crossings() {
        let (up, down) = first_crossings(
            t0(),
            t0() + Duration::days(1),
            SearchParams::horizon(),
            0.0,
            |_| 5.0,
        );
        assert!(up.is_none());
        assert!(down.is_none());
    }

    #[test]
    fn test_stop_condition_ends_scan() {
        let evaluations = Cell::new(0u32);
        let f = |t: DateTime<Utc>| {
            evaluations.set(evaluations.get() + 1);
            (hours_since(t) / 24.0).floor() as i64
        };
        let start = t0() + Duration::hours(1);
        let found = find_discrete_until(
            start,
            start + Duration::days(30),
            SearchParams::lunar_phase(),
            f,
            |_| true,
        );
        assert_eq!(found.len(), 1);
        assert!(evaluations.get() < 40);
    }
}
