//! On-disk format of the ephemeris data set.
//!
//! A document names the series and lists observed principal phase instants.
//! Loading re-derives the Moon-Sun elongation at each instant and rejects
//! the document if any checkpoint misses its nominal angle by more than
//! `tolerance_degrees`.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::Ephemeris;
use crate::error::EphemerisLoadError;

/// Data set compiled into the binary.
pub const BUNDLED_EPHEMERIS: &str = include_str!("../../data/ephemeris.json");

const DEFAULT_TOLERANCE_DEGREES: f64 = 1.0;

/// Principal lunar phases a checkpoint can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    New,
    FirstQuarter,
    Full,
    LastQuarter,
}

impl PhaseKind {
    /// Moon minus Sun ecliptic longitude at this phase.
    pub fn elongation_degrees(&self) -> f64 {
        match self {
            PhaseKind::New => 0.0,
            PhaseKind::FirstQuarter => 90.0,
            PhaseKind::Full => 180.0,
            PhaseKind::LastQuarter => 270.0,
        }
    }
}

/// An observed phase instant.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PhaseCheckpoint {
    pub utc: DateTime<Utc>,
    pub phase: PhaseKind,
}

#[derive(Debug, Deserialize)]
struct EphemerisDocument {
    name: String,
    #[serde(default = "default_tolerance")]
    tolerance_degrees: f64,
    checkpoints: Vec<PhaseCheckpoint>,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE_DEGREES
}

/// Signed angular difference folded into (-180, 180].
fn angular_offset(actual: f64, nominal: f64) -> f64 {
    let d = (actual - nominal).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Parse a document and check every checkpoint against the series.
pub fn parse(text: &str) -> Result<Ephemeris, EphemerisLoadError> {
    let deserializer = &mut serde_json::Deserializer::from_str(text);
    let doc: EphemerisDocument = serde_path_to_error::deserialize(deserializer)
        .map_err(|e| EphemerisLoadError::Parse(format!("{} at {}", e.inner(), e.path())))?;

    if !doc.tolerance_degrees.is_finite()
        || doc.tolerance_degrees <= 0.0
        || doc.tolerance_degrees > 45.0
    {
        return Err(EphemerisLoadError::Invalid(format!(
            "tolerance_degrees must be in (0, 45], got {}",
            doc.tolerance_degrees
        )));
    }
    if doc.checkpoints.is_empty() {
        return Err(EphemerisLoadError::Invalid(
            "checkpoint list must not be empty".to_string(),
        ));
    }

    let ephemeris = Ephemeris::from_parts(doc.name, doc.tolerance_degrees, doc.checkpoints);
    verify(&ephemeris)?;
    Ok(ephemeris)
}

fn verify(ephemeris: &Ephemeris) -> Result<(), EphemerisLoadError> {
    for (index, checkpoint) in ephemeris.checkpoints().iter().enumerate() {
        let offset = angular_offset(
            ephemeris.phase_angle_degrees(checkpoint.utc),
            checkpoint.phase.elongation_degrees(),
        );
        if offset.abs() > ephemeris.tolerance_degrees() {
            return Err(EphemerisLoadError::Invalid(format!(
                "checkpoints[{}] ({:?} at {}) is off by {:.2}°",
                index, checkpoint.phase, checkpoint.utc, offset
            )));
        }
        log::debug!(
            "checkpoint {:?} at {} within {:.3}°",
            checkpoint.phase,
            checkpoint.utc,
            offset
        );
    }
    Ok(())
}

/// Load the compiled-in data set.
pub fn bundled() -> Result<Ephemeris, EphemerisLoadError> {
    parse(BUNDLED_EPHEMERIS)
}

/// Read and parse a data set from disk.
pub fn load_file(path: &Path) -> Result<Ephemeris, EphemerisLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| EphemerisLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_data_set_parses() {
        let ephemeris = bundled().unwrap();
        assert_eq!(ephemeris.name(), "siderust-vsop87a-elp2000");
        assert_eq!(ephemeris.checkpoints().len(), 8);
        assert_eq!(ephemeris.tolerance_degrees(), 1.0);
    }

    #[test]
    fn test_parse_error_reports_path() {
        let text = r#"{"name": "x", "checkpoints": [
            {"utc": "2025-09-07T18:09:00Z", "phase": "gibbous"}]}"#;
        match parse(text) {
            Err(EphemerisLoadError::Parse(msg)) => {
                assert!(msg.contains("checkpoints[0].phase"), "{}", msg)
            }
            other => panic!("expected parse error, got {:?}", other.map(|e| e.name().to_string())),
        }
    }

    #[test]
    fn test_empty_checkpoints_are_invalid() {
        let text = r#"{"name": "x", "checkpoints": []}"#;
        assert!(matches!(parse(text), Err(EphemerisLoadError::Invalid(_))));
    }

    #[test]
    fn test_zero_tolerance_is_invalid() {
        let text = r#"{"name": "x", "tolerance_degrees": 0.0, "checkpoints": [
            {"utc": "2025-09-07T18:09:00Z", "phase": "full"}]}"#;
        assert!(matches!(parse(text), Err(EphemerisLoadError::Invalid(_))));
    }

    #[test]
    fn test_mislabelled_checkpoint_is_rejected() {
        // 2025-09-07 18:09 UTC is a full moon, not a new one.
        let text = r#"{"name": "x", "checkpoints": [
            {"utc": "2025-09-07T18:09:00Z", "phase": "new"}]}"#;
        match parse(text) {
            Err(EphemerisLoadError::Invalid(msg)) => assert!(msg.contains("checkpoints[0]"), "{}", msg),
            other => panic!("expected invalid, got {:?}", other.map(|e| e.name().to_string())),
        }
    }

    #[test]
    fn test_angular_offset_wraps() {
        assert!((angular_offset(359.5, 0.0) + 0.5).abs() < 1e-9);
        assert!((angular_offset(0.5, 0.0) - 0.5).abs() < 1e-9);
        assert!((angular_offset(181.0, 180.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            load_file(&missing),
            Err(EphemerisLoadError::Read { .. })
        ));
    }
}
