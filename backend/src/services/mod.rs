//! Calculators and view-model assembly.
//!
//! Every calculator is a pure function of its inputs and a borrowed
//! [`Ephemeris`](crate::ephemeris::Ephemeris) handle, so any number of calls
//! may run concurrently without locking.

pub mod astronomical_night;
pub mod conditions;
pub mod event_search;
pub mod forecast;
pub mod imaging_score;
pub mod moon_events;
pub mod sun_events;

pub use astronomical_night::{compute_astronomical_nights, tonight_dark_window};
pub use conditions::{build_sky_report, current_conditions};
pub use event_search::{find_crossings, find_discrete, Crossing, SearchParams, Transition};
pub use forecast::format_forecast_rows;
pub use imaging_score::{astro_score, moon_altitude_and_illumination, moon_sky};
pub use moon_events::{lunar_age, moon_phase_name, moon_rise_set, next_new_and_full};
pub use sun_events::{sun_events, sunrise_sunset, twilight_events};
