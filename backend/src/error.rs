//! Error types for the astronomical event engine.
//!
//! Absence of an event inside a search window is not an error: calculators
//! report it as `None` on the value types in [`crate::api`]. The errors here
//! cover the conditions that stop a computation before it starts.

use std::path::PathBuf;

/// Result type for calculator operations
pub type AstroResult<T> = Result<T, AstroError>;

/// Failure to load the ephemeris data set.
///
/// Fatal for every astronomical feature. Calculators propagate it unchanged.
#[derive(Debug, thiserror::Error)]
pub enum EphemerisLoadError {
    /// The backing data file could not be read.
    #[error("Failed to read ephemeris data from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file is not a valid ephemeris document.
    #[error("Failed to parse ephemeris data: {0}")]
    Parse(String),

    /// The document parsed but its tables are unusable.
    #[error("Invalid ephemeris data: {0}")]
    Invalid(String),
}

/// Error type for calculator operations
#[derive(Debug, thiserror::Error)]
pub enum AstroError {
    #[error(transparent)]
    EphemerisLoad(#[from] EphemerisLoadError),

    /// Malformed location, date or numeric input, rejected before any search.
    #[error("Invalid input for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// Station configuration could not be read or is inconsistent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The weather snapshot payload could not be decoded.
    #[error("Weather snapshot error: {0}")]
    WeatherParse(String),
}

impl AstroError {
    /// Create an invalid-input error for a named field.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error disables all astronomical features.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::EphemerisLoad(_))
    }
}

/// Reject NaN and infinite values with a descriptive [`AstroError::InvalidInput`].
pub(crate) fn ensure_finite(field: &str, value: f64) -> AstroResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AstroError::invalid_input(
            field,
            format!("expected a finite number, got {}", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message_names_field() {
        let err = AstroError::invalid_input("latitude", "must be between -90 and 90 degrees");
        assert_eq!(
            err.to_string(),
            "Invalid input for 'latitude': must be between -90 and 90 degrees"
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_ephemeris_error_is_fatal() {
        let err: AstroError = EphemerisLoadError::Invalid("empty table".to_string()).into();
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "Invalid ephemeris data: empty table");
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("x", 1.5).unwrap(), 1.5);
        assert!(ensure_finite("x", f64::NAN).is_err());
        assert!(ensure_finite("x", f64::INFINITY).is_err());
    }
}
