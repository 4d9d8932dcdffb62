//! # Astrocast
//!
//! Astronomical event engine for a weather and sky-conditions station.
//!
//! Given a fixed location, an IANA timezone and a reference instant, the
//! crate computes sunrise/sunset and twilight, moon phase, daily moonrise and
//! moonset, the next new and full moon, tonight's astronomical darkness
//! window and a 0-100 astrophotography score, and merges them with a weather
//! snapshot into one display view model.
//!
//! ## Architecture
//!
//! - [`api`]: Value types handed to the display layer
//! - [`ephemeris`]: Ephemeris data set, time scale and position series
//! - [`services`]: Event search and the calculators built on it
//! - [`models`]: Time conversions and the weather snapshot
//! - [`config`]: Station configuration file
//! - [`error`]: Error taxonomy
//!
//! All computation runs on UTC instants; local time appears only at the
//! conversion functions in [`models::time`].

pub mod api;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod models;
pub mod services;

pub use error::{AstroError, AstroResult, EphemerisLoadError};
pub use ephemeris::{get_ephemeris, Ephemeris, EphemerisProvider, EphemerisSource};
