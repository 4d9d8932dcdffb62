//! Discrete-event search over time.
//!
//! Every event the engine reports (sun and moon horizon crossings, lunar
//! quarter boundaries) is a change in a step function of time. The finder
//! samples that function at a fixed step and bisects each bracket whose
//! endpoints differ until it is narrower than the requested precision.
//!
//! The step must be shorter than the shortest interval between two
//! transitions, otherwise a pair of transitions inside one step cancels out.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Change of a step function's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<V> {
    /// First instant (to within the search precision) carrying the new value.
    pub instant: DateTime<Utc>,
    pub from: V,
    pub to: V,
}

/// Direction of a threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crossing {
    /// Signal rising through the threshold (rise, dawn).
    Ascending,
    /// Signal falling through the threshold (set, dusk).
    Descending,
}

/// Search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    pub step: Duration,
    pub precision: Duration,
}

impl SearchParams {
    /// Horizon crossings: 10 minute sampling, one second precision.
    pub fn horizon() -> Self {
        Self {
            step: Duration::minutes(10),
            precision: Duration::seconds(1),
        }
    }

    /// Lunar quarters: daily sampling, one second precision.
    pub fn lunar_phase() -> Self {
        Self {
            step: Duration::days(1),
            precision: Duration::seconds(1),
        }
    }
}

/// Locate every transition of `f` in `(start, end]`.
pub fn find_discrete<V, F>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    params: SearchParams,
    f: F,
) -> Vec<Transition<V>>
where
    V: PartialEq + Copy,
    F: Fn(DateTime<Utc>) -> V,
{
    find_discrete_until(start, end, params, f, |_| false)
}

/// Like [`find_discrete`] but stops scanning once `stop` returns true for a
/// reported transition (which is kept).
pub fn find_discrete_until<V, F, S>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    params: SearchParams,
    f: F,
    mut stop: S,
) -> Vec<Transition<V>>
where
    V: PartialEq + Copy,
    F: Fn(DateTime<Utc>) -> V,
    S: FnMut(&Transition<V>) -> bool,
{
    let mut transitions = Vec::new();
    if end <= start || params.step <= Duration::zero() {
        return transitions;
    }
    let precision = params.precision.max(Duration::milliseconds(1));

    let mut t0 = start;
    let mut v0 = f(t0);
    while t0 < end {
        let t1 = (t0 + params.step).min(end);
        let v1 = f(t1);
        if v1 != v0 {
            let transition = bisect(t0, v0, t1, &f, precision);
            transitions.push(transition);
            if stop(&transition) {
                break;
            }
        }
        t0 = t1;
        v0 = v1;
    }

    if transitions.is_empty() {
        log::debug!("No transition between {} and {}", start, end);
    }
    transitions
}

fn bisect<V, F>(
    mut lo: DateTime<Utc>,
    v_lo: V,
    mut hi: DateTime<Utc>,
    f: &F,
    precision: Duration,
) -> Transition<V>
where
    V: PartialEq + Copy,
    F: Fn(DateTime<Utc>) -> V,
{
    let mut v_hi = f(hi);
    while hi - lo > precision {
        let mid = lo + (hi - lo) / 2;
        let v_mid = f(mid);
        if v_mid == v_lo {
            lo = mid;
        } else {
            hi = mid;
            v_hi = v_mid;
        }
    }
    Transition {
        instant: hi,
        from: v_lo,
        to: v_hi,
    }
}

/// Crossings of a continuous signal through `threshold`, in time order.
pub fn find_crossings<G>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    params: SearchParams,
    threshold: f64,
    signal: G,
) -> Vec<(DateTime<Utc>, Crossing)>
where
    G: Fn(DateTime<Utc>) -> f64,
{
    find_discrete(start, end, params, |t| signal(t) > threshold)
        .into_iter()
        .map(|tr| {
            let direction = if tr.to {
                Crossing::Ascending
            } else {
                Crossing::Descending
            };
            (tr.instant, direction)
        })
        .collect()
}

/// First ascending and first descending crossing in the window.
pub fn first_crossings<G>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    params: SearchParams,
    threshold: f64,
    signal: G,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>)
where
    G: Fn(DateTime<Utc>) -> f64,
{
    let crossings = find_crossings(start, end, params, threshold, signal);
    let first = |wanted: Crossing| {
        crossings
            .iter()
            .find(|(_, direction)| *direction == wanted)
            .map(|(instant, _)| *instant)
    };
    (first(Crossing::Ascending), first(Crossing::Descending))
}

#[cfg(test)]
#[path = "event_search_tests.rs"]
mod event_search_tests;
