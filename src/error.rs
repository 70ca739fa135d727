use std::path::PathBuf;
use thiserror::Error;

use crate::conversion::ConversionReport;
use crate::validation::ValidationReport;
use crate::version::NgffVersion;

/// The main error type for ngffmeta operations.
#[derive(Debug, Error)]
pub enum NgffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse NGFF metadata JSON from {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write NGFF metadata JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Input does not conform to its version's schema.
    ///
    /// `path` is the offending dataset's path, or the root field name
    /// (`datasets`, `coordinateTransformations`, `coordinateSystems`) for
    /// metadata-level violations.
    #[error("Schema violation in '{path}': {reason}")]
    SchemaViolation { path: String, reason: String },

    #[error("Transform '{tag}' has no representation in NGFF {target}")]
    UnsupportedTransform { tag: String, target: NgffVersion },

    #[error("Cannot convert NGFF {from} metadata to unsupported version '{target}'")]
    UnsupportedVersion { from: NgffVersion, target: String },

    #[error("Unknown NGFF version '{0}' (supported: 0.4, 0.5, 0.6)")]
    UnknownVersion(String),

    #[error("Dataset '{path}' references coordinate system '{name}' which is not declared")]
    MissingCoordinateSystem { path: String, name: String },

    #[error(
        "Dataset '{path}' maps to coordinate system '{found}' but the first dataset maps to '{expected}'"
    )]
    CoordinateSystemMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Conversion from NGFF {from} to {to} is lossy; pass --allow-lossy to proceed")]
    LossyConversion {
        from: NgffVersion,
        to: NgffVersion,
        report: ConversionReport,
    },
}

impl NgffError {
    pub(crate) fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        NgffError::SchemaViolation {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
