//! # Error Types
//!
//! Structured error types for motor_core. Every variant carries enough
//! context to tell a caller (human or program) which input was rejected and
//! why, and every variant serializes to JSON.
//!
//! ## Example
//!
//! ```rust
//! use motor_core::errors::{CalcError, CalcResult};
//!
//! fn validate_diameter(diameter_m: f64) -> CalcResult<()> {
//!     if diameter_m <= 0.0 {
//!         return Err(CalcError::invalid_geometry(
//!             "diameter_m",
//!             diameter_m.to_string(),
//!             "Diameter must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_diameter(-0.5).unwrap_err().is_fatal());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for motor_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for sizing operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, not finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Zero or several independent variables were selected
    #[error("Invalid mode selection: {reason}")]
    InvalidModeSelection { reason: String },

    /// Propellant constants would make the ballistic equations degenerate
    #[error("Invalid propellant '{propellant}' parameter '{field}': {value} - {reason}")]
    InvalidPropellantParameters {
        propellant: String,
        field: String,
        value: String,
        reason: String,
    },

    /// Motor dimensions cannot form a pill-shaped casing
    #[error("Invalid geometry for '{field}': {value} - {reason}")]
    InvalidGeometry {
        field: String,
        value: String,
        reason: String,
    },

    /// Solved pressure or wall falls outside the material's allowable range
    #[error("Structural envelope violated: {quantity} = {value} (limit {limit}) - {reason}")]
    StructuralEnvelopeViolation {
        quantity: String,
        value: f64,
        limit: f64,
        reason: String,
    },

    /// Operating point overflowed or collapsed for otherwise valid inputs
    #[error("Numerical failure: {quantity} = {value} - {reason}")]
    NumericalFailure {
        quantity: String,
        value: String,
        reason: String,
    },

    /// Named model missing from the catalog
    #[error("{kind} not found: {name}")]
    ModelNotFound { kind: String, name: String },

    /// Two catalog records share a name
    #[error("Duplicate {kind} definition: {name}")]
    DuplicateModel { kind: String, name: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidModeSelection error
    pub fn invalid_mode(reason: impl Into<String>) -> Self {
        CalcError::InvalidModeSelection {
            reason: reason.into(),
        }
    }

    /// Create an InvalidPropellantParameters error
    pub fn invalid_propellant(
        propellant: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidPropellantParameters {
            propellant: propellant.into(),
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidGeometry error
    pub fn invalid_geometry(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidGeometry {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a NumericalFailure error
    pub fn numerical_failure(quantity: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        CalcError::NumericalFailure {
            quantity: quantity.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a ModelNotFound error
    pub fn model_not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        CalcError::ModelNotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError from anything printable
    pub fn serialization(reason: impl std::fmt::Display) -> Self {
        CalcError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Configuration errors that must stop the solve outright
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidModeSelection { .. }
                | CalcError::InvalidPropellantParameters { .. }
                | CalcError::InvalidGeometry { .. }
                | CalcError::NumericalFailure { .. }
        )
    }

    /// Check if this is a recoverable error (retry later, or show as a hint)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CalcError::FileLocked { .. } | CalcError::StructuralEnvelopeViolation { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InvalidModeSelection { .. } => "INVALID_MODE_SELECTION",
            CalcError::InvalidPropellantParameters { .. } => "INVALID_PROPELLANT_PARAMETERS",
            CalcError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            CalcError::StructuralEnvelopeViolation { .. } => "STRUCTURAL_ENVELOPE_VIOLATION",
            CalcError::NumericalFailure { .. } => "NUMERICAL_FAILURE",
            CalcError::ModelNotFound { .. } => "MODEL_NOT_FOUND",
            CalcError::DuplicateModel { .. } => "DUPLICATE_MODEL",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_geometry("length_m", "-2", "Length must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidGeometry\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::invalid_mode("none").error_code(), "INVALID_MODE_SELECTION");
        assert_eq!(CalcError::model_not_found("Propellant", "X").error_code(), "MODEL_NOT_FOUND");
    }

    #[test]
    fn test_fatal_and_recoverable() {
        assert!(CalcError::invalid_mode("two inputs").is_fatal());
        assert!(CalcError::invalid_propellant("APCP", "burn_rate_exponent", "1", "must be < 1").is_fatal());

        let envelope = CalcError::StructuralEnvelopeViolation {
            quantity: "chamber_pressure_pa".to_string(),
            value: 9.0e7,
            limit: 5.0e7,
            reason: "above maximum".to_string(),
        };
        assert!(!envelope.is_fatal());
        assert!(envelope.is_recoverable());
    }

    #[test]
    fn test_numerical_failure_survives_json() {
        let error = CalcError::numerical_failure("chamber_pressure_pa", f64::INFINITY, "overflow");
        assert_eq!(error.error_code(), "NUMERICAL_FAILURE");
        assert!(error.is_fatal());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"value\":\"inf\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_display_message() {
        let err = CalcError::model_not_found("Nozzle", "Bell-9");
        assert_eq!(err.to_string(), "Nozzle not found: Bell-9");
    }
}
