//! Ephemeris Provider.
//!
//! Positions come from siderust: VSOP87 for the Earth (and so the Sun) and
//! ELP2000 for the Moon, evaluated on the TT axis through [`time_scale`].
//! The loaded data set is a list of observed lunar phase instants that the
//! series must reproduce; a document whose checkpoints disagree with the
//! series is rejected at load time.
//!
//! An [`EphemerisProvider`] loads and verifies the data set at most once.
//! Calculators receive the shared [`Ephemeris`] handle as an argument
//! instead of reaching for global state.
//!
//! ```ignore
//! use astrocast::ephemeris;
//!
//! let eph = ephemeris::get_ephemeris()?;
//! let alt = eph.moon_altitude(now, &location);
//! ```

pub mod dataset;
pub mod time_scale;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use qtty::{Degree, Degrees, Kilometer, Meters};
use serde::Serialize;
use siderust::bodies::solar_system::{Earth, Moon, Sun};
use siderust::bodies::MOON;
use siderust::calculus::altitude::AltitudePeriodsProvider;
use siderust::coordinates::centers::Geodetic;
use siderust::coordinates::frames::ECEF;

use crate::api::GeographicLocation;
use crate::error::{AstroResult, EphemerisLoadError};
use dataset::PhaseCheckpoint;

/// Mean length of the synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530588853;

/// Where the data set comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EphemerisSource {
    /// The data set compiled into the crate.
    Bundled,
    /// A JSON document on disk.
    File(PathBuf),
}

/// Loads an [`Ephemeris`] exactly once and hands out shared handles.
#[derive(Debug)]
pub struct EphemerisProvider {
    source: EphemerisSource,
    cell: OnceCell<Arc<Ephemeris>>,
}

impl EphemerisProvider {
    pub fn new(source: EphemerisSource) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
        }
    }

    pub fn bundled() -> Self {
        Self::new(EphemerisSource::Bundled)
    }

    /// Whether the data set has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Load on first call, then return the cached handle.
    ///
    /// A failed load leaves the cell empty, so a later call retries the read.
    pub fn get(&self) -> Result<Arc<Ephemeris>, EphemerisLoadError> {
        self.cell
            .get_or_try_init(|| {
                let ephemeris = match &self.source {
                    EphemerisSource::Bundled => dataset::bundled()?,
                    EphemerisSource::File(path) => dataset::load_file(path)?,
                };
                log::info!(
                    "Loaded ephemeris '{}' from {:?} ({} phase checkpoints within {:.2}°)",
                    ephemeris.name(),
                    self.source,
                    ephemeris.checkpoints().len(),
                    ephemeris.tolerance_degrees()
                );
                Ok(Arc::new(ephemeris))
            })
            .cloned()
    }
}

/// Process-wide provider for the bundled data set.
static BUNDLED: OnceCell<EphemerisProvider> = OnceCell::new();

/// Shared handle to the bundled ephemeris, loaded on first use.
pub fn get_ephemeris() -> AstroResult<Arc<Ephemeris>> {
    Ok(BUNDLED.get_or_init(EphemerisProvider::bundled).get()?)
}

/// Convert API `GeographicLocation` to a siderust observer site.
///
/// Constructor takes (lon, lat, height); the station sits at sea level.
pub fn observer_site(location: &GeographicLocation) -> Geodetic<ECEF> {
    Geodetic::<ECEF>::new(
        Degrees::new(location.longitude), // lon first
        Degrees::new(location.latitude),  // lat second
        Meters::new(0.0),
    )
}

/// Geocentric position of the Sun, mean ecliptic of J2000.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SolarPosition {
    pub ecliptic_longitude: Degrees,
    pub distance_km: f64,
}

/// Geocentric position of the Moon, mean ecliptic of J2000.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LunarPosition {
    pub ecliptic_longitude: Degrees,
    pub ecliptic_latitude: Degrees,
    pub distance_km: f64,
}

/// The Moon as seen from the observer.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TopocentricMoon {
    /// Altitude of the centre, parallax applied, no refraction.
    pub altitude: Degrees,
    /// Angular radius of the disk.
    pub semidiameter: Degrees,
    pub distance_km: f64,
}

/// Verified data set plus the siderust series it was checked against.
#[derive(Debug, Clone)]
pub struct Ephemeris {
    name: String,
    tolerance_degrees: f64,
    checkpoints: Vec<PhaseCheckpoint>,
}

type Vector3 = [f64; 3];

fn dot(a: Vector3, b: Vector3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm(a: Vector3) -> f64 {
    dot(a, a).sqrt()
}

fn ecliptic_longitude(v: Vector3) -> f64 {
    v[1].atan2(v[0]).to_degrees().rem_euclid(360.0)
}

impl Ephemeris {
    pub(crate) fn from_parts(
        name: String,
        tolerance_degrees: f64,
        checkpoints: Vec<PhaseCheckpoint>,
    ) -> Self {
        Self {
            name,
            tolerance_degrees,
            checkpoints,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tolerance_degrees(&self) -> f64 {
        self.tolerance_degrees
    }

    pub fn checkpoints(&self) -> &[PhaseCheckpoint] {
        &self.checkpoints
    }

    /// Geocentric Sun in km: the negated heliocentric Earth vector.
    fn sun_vector(&self, instant: DateTime<Utc>) -> Vector3 {
        let earth = Earth::vsop87a(time_scale::julian_date_tt(instant)).position;
        [
            -earth.x().to::<Kilometer>().value(),
            -earth.y().to::<Kilometer>().value(),
            -earth.z().to::<Kilometer>().value(),
        ]
    }

    fn moon_vector(&self, instant: DateTime<Utc>) -> Vector3 {
        let moon = Moon::get_geo_position::<Kilometer>(time_scale::julian_date_tt(instant));
        [moon.x().value(), moon.y().value(), moon.z().value()]
    }

    pub fn sun(&self, instant: DateTime<Utc>) -> SolarPosition {
        let s = self.sun_vector(instant);
        SolarPosition {
            ecliptic_longitude: Degrees::new(ecliptic_longitude(s)),
            distance_km: norm(s),
        }
    }

    pub fn moon(&self, instant: DateTime<Utc>) -> LunarPosition {
        let m = self.moon_vector(instant);
        let distance_km = norm(m);
        LunarPosition {
            ecliptic_longitude: Degrees::new(ecliptic_longitude(m)),
            ecliptic_latitude: Degrees::new((m[2] / distance_km).asin().to_degrees()),
            distance_km,
        }
    }

    /// Topocentric altitude of the Sun's centre in degrees, no refraction.
    pub fn sun_altitude(&self, instant: DateTime<Utc>, location: &GeographicLocation) -> f64 {
        Sun.altitude_at(&observer_site(location), time_scale::mjd_tt(instant))
            .to::<Degree>()
            .value()
    }

    pub fn moon_topocentric(
        &self,
        instant: DateTime<Utc>,
        location: &GeographicLocation,
    ) -> TopocentricMoon {
        let horizontal = Moon::get_horizontal::<Kilometer>(
            time_scale::julian_date_tt(instant),
            observer_site(location),
        );
        let distance_km = horizontal.distance.value();
        TopocentricMoon {
            altitude: Degrees::new(horizontal.alt().to::<Degree>().value()),
            semidiameter: Degrees::new(
                (MOON.radius.value() / distance_km).asin().to_degrees(),
            ),
            distance_km,
        }
    }

    /// Topocentric altitude of the Moon's centre in degrees.
    pub fn moon_altitude(&self, instant: DateTime<Utc>, location: &GeographicLocation) -> f64 {
        self.moon_topocentric(instant, location).altitude.value()
    }

    /// Illuminated fraction of the lunar disk in [0, 1].
    ///
    /// The phase angle is measured at the Moon between the Sun and the Earth.
    pub fn moon_illumination(&self, instant: DateTime<Utc>) -> f64 {
        let s = self.sun_vector(instant);
        let m = self.moon_vector(instant);
        let to_sun = [s[0] - m[0], s[1] - m[1], s[2] - m[2]];
        let to_earth = [-m[0], -m[1], -m[2]];
        let cos_i = (dot(to_sun, to_earth) / (norm(to_sun) * norm(to_earth))).clamp(-1.0, 1.0);
        ((1.0 + cos_i) / 2.0).clamp(0.0, 1.0)
    }

    /// Moon minus Sun ecliptic longitude in [0, 360): 0 new, 90 first quarter,
    /// 180 full, 270 last quarter.
    pub fn phase_angle_degrees(&self, instant: DateTime<Utc>) -> f64 {
        let sun = ecliptic_longitude(self.sun_vector(instant));
        let moon = ecliptic_longitude(self.moon_vector(instant));
        (moon - sun).rem_euclid(360.0)
    }
}
