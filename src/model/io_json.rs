//! JSON serialization for NGFF metadata documents.
//!
//! A document is one version-tagged metadata object, e.g.
//! `{"version": "0.4", "axes": [...], "datasets": [...]}`. Reading always
//! validates the parsed metadata so callers never hold a non-conformant
//! instance.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::AnyMetadata;
use crate::error::NgffError;

/// Reads and validates a metadata document from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if the parsed
/// metadata violates its version's schema.
pub fn read_metadata_json(path: &Path) -> Result<AnyMetadata, NgffError> {
    let metadata = read_metadata_json_unchecked(path)?;
    metadata.validate()?;
    Ok(metadata)
}

/// Reads a metadata document from a JSON file without schema checks.
///
/// Used by the validator, which reports every violation instead of
/// stopping at the first.
pub fn read_metadata_json_unchecked(path: &Path) -> Result<AnyMetadata, NgffError> {
    let file = File::open(path).map_err(NgffError::Io)?;
    let reader = BufReader::new(file);

    let metadata: AnyMetadata =
        serde_json::from_reader(reader).map_err(|source| NgffError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!(
        "read NGFF {} metadata from {}",
        metadata.version(),
        path.display()
    );
    Ok(metadata)
}

/// Writes a metadata document to a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_metadata_json(path: &Path, metadata: &AnyMetadata) -> Result<(), NgffError> {
    let file = File::create(path).map_err(NgffError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, metadata).map_err(|source| NgffError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "wrote NGFF {} metadata to {}",
        metadata.version(),
        path.display()
    );
    Ok(())
}

/// Parses a metadata document from a JSON string without validating it.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<AnyMetadata, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parses a metadata document from raw bytes without validating it.
///
/// Useful for fuzzing and for callers that already hold the attribute bytes.
pub fn from_json_slice(bytes: &[u8]) -> Result<AnyMetadata, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Writes a metadata document to a pretty-printed JSON string.
pub fn to_json_string(metadata: &AnyMetadata) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(metadata)
}
