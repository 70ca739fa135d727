//! Versioned OME-NGFF multiscale metadata models.
//!
//! Each schema revision lives in its own module with its own closed
//! transform union, dataset and root metadata types:
//!
//! - [`v04`]: flat `axes`, `[scale]` or `[scale, translation]` per dataset
//! - [`v05`]: as v0.4, plus a declared `identity` transform
//! - [`v06`]: named coordinate systems, `rotation` and `sequence` transforms
//!
//! [`AnyMetadata`] wraps one instance of any revision and is what documents
//! deserialize into; its `version` field selects the variant.
//!
//! # Example
//!
//! ```
//! use ngffmeta::model::{v04, Axis};
//!
//! let dataset = v04::Dataset::new(
//!     "0",
//!     vec![v04::Transform::scale([2.0, 1.0, 1.0])],
//! ).unwrap();
//! let metadata = v04::Metadata::new(
//!     vec![Axis::new("z"), Axis::new("y"), Axis::new("x")],
//!     vec![dataset],
//! ).unwrap();
//! assert_eq!(metadata.axes.len(), 3);
//! ```

mod axis;
pub mod io_json;
mod method;
pub mod v04;
pub mod v05;
pub mod v06;

pub use axis::Axis;
pub use method::MethodMetadata;
pub use crate::conversion::NgffMetadata;

use serde::{Deserialize, Serialize};

use crate::error::NgffError;
use crate::version::NgffVersion;

/// Metadata of any supported revision, tagged by its `version` field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "version")]
pub enum AnyMetadata {
    #[serde(rename = "0.4")]
    V04(v04::Metadata),
    #[serde(rename = "0.5")]
    V05(v05::Metadata),
    #[serde(rename = "0.6")]
    V06(v06::Metadata),
}

impl AnyMetadata {
    pub fn version(&self) -> NgffVersion {
        match self {
            AnyMetadata::V04(_) => NgffVersion::V04,
            AnyMetadata::V05(_) => NgffVersion::V05,
            AnyMetadata::V06(_) => NgffVersion::V06,
        }
    }

    /// Runs the structural checks of the wrapped revision.
    pub fn validate(&self) -> Result<(), NgffError> {
        match self {
            AnyMetadata::V04(m) => m.validate(),
            AnyMetadata::V05(m) => m.validate(),
            AnyMetadata::V06(m) => m.validate(),
        }
    }

    /// Dataset paths in pyramid order.
    pub fn dataset_paths(&self) -> Vec<&str> {
        match self {
            AnyMetadata::V04(m) => m.datasets.iter().map(|d| d.path.as_str()).collect(),
            AnyMetadata::V05(m) => m.datasets.iter().map(|d| d.path.as_str()).collect(),
            AnyMetadata::V06(m) => m.datasets.iter().map(|d| d.path.as_str()).collect(),
        }
    }

    /// The image axes: `axes` for v0.4/v0.5, the first coordinate system's
    /// axes for v0.6.
    pub fn primary_axes(&self) -> &[Axis] {
        match self {
            AnyMetadata::V04(m) => &m.axes,
            AnyMetadata::V05(m) => &m.axes,
            AnyMetadata::V06(m) => m
                .coordinate_systems
                .first()
                .map(|cs| cs.axes.as_slice())
                .unwrap_or(&[]),
        }
    }
}

impl From<v04::Metadata> for AnyMetadata {
    fn from(metadata: v04::Metadata) -> Self {
        AnyMetadata::V04(metadata)
    }
}

impl From<v05::Metadata> for AnyMetadata {
    fn from(metadata: v05::Metadata) -> Self {
        AnyMetadata::V05(metadata)
    }
}

impl From<v06::Metadata> for AnyMetadata {
    fn from(metadata: v06::Metadata) -> Self {
        AnyMetadata::V06(metadata)
    }
}

fn variant_mismatch(found: &AnyMetadata, expected: NgffVersion) -> NgffError {
    NgffError::UnsupportedVersion {
        from: found.version(),
        target: expected.to_string(),
    }
}

impl TryFrom<AnyMetadata> for v04::Metadata {
    type Error = NgffError;

    fn try_from(any: AnyMetadata) -> Result<Self, Self::Error> {
        match any {
            AnyMetadata::V04(m) => Ok(m),
            other => Err(variant_mismatch(&other, NgffVersion::V04)),
        }
    }
}

impl TryFrom<AnyMetadata> for v05::Metadata {
    type Error = NgffError;

    fn try_from(any: AnyMetadata) -> Result<Self, Self::Error> {
        match any {
            AnyMetadata::V05(m) => Ok(m),
            other => Err(variant_mismatch(&other, NgffVersion::V05)),
        }
    }
}

impl TryFrom<AnyMetadata> for v06::Metadata {
    type Error = NgffError;

    fn try_from(any: AnyMetadata) -> Result<Self, Self::Error> {
        match any {
            AnyMetadata::V06(m) => Ok(m),
            other => Err(variant_mismatch(&other, NgffVersion::V06)),
        }
    }
}

/// Renders transform tags as `[scale, translation]` for error messages.
pub(crate) fn describe_tags<'a>(tags: impl Iterator<Item = &'a str>) -> String {
    format!("[{}]", tags.collect::<Vec<_>>().join(", "))
}
