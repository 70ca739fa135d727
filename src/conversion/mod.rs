//! Conversion between NGFF metadata revisions.
//!
//! Only adjacent revisions have direct converters (v0.4 <-> v0.5 and
//! v0.5 <-> v0.6). [`AnyMetadata::to_version`] bridges v0.4 and v0.6 by
//! going through v0.5; [`NgffMetadata::from_version`] refuses to.
//!
//! Every conversion returns a [`ConversionReport`] alongside the value,
//! listing dropped information (warnings) and policy decisions (notes).
//!
//! # Example
//!
//! ```
//! use ngffmeta::model::{v04, v06, Axis, NgffMetadata};
//! use ngffmeta::NgffVersion;
//!
//! let dataset = v04::Dataset::new(
//!     "0",
//!     vec![
//!         v04::Transform::scale([2.0, 1.0, 1.0]),
//!         v04::Transform::translation([0.0, 0.0, 0.0]),
//!     ],
//! ).unwrap();
//! let source = v04::Metadata::new(
//!     vec![Axis::new("z"), Axis::new("y"), Axis::new("x")],
//!     vec![dataset],
//! ).unwrap();
//!
//! let converted = source.to_version(NgffVersion::V06).unwrap();
//! assert_eq!(converted.report.route.len(), 3);
//!
//! let v06 = v06::Metadata::try_from(converted.value).unwrap();
//! assert_eq!(v06.coordinate_systems[0].name, "physical");
//! ```

pub mod report;
mod v04_v05;
mod v05_v06;

pub use report::{
    ConversionCounts, ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity,
};
pub use v05_v06::{OUTPUT, PHYSICAL};

use crate::error::NgffError;
use crate::model::{v04, v05, v06, AnyMetadata};
use crate::version::NgffVersion;

/// A converted value together with the report describing the conversion.
#[derive(Clone, Debug)]
pub struct Converted<T> {
    pub value: T,
    pub report: ConversionReport,
}

impl<T> Converted<T> {
    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Converted<U> {
        Converted {
            value: f(self.value),
            report: self.report,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Converted<U>, E> {
        Ok(Converted {
            value: f(self.value)?,
            report: self.report,
        })
    }

    /// Fails with [`NgffError::LossyConversion`] if the report holds any warning.
    pub fn reject_lossy(self) -> Result<Self, NgffError> {
        if self.report.is_lossy() {
            return Err(NgffError::LossyConversion {
                from: self.report.from,
                to: self.report.to,
                report: self.report,
            });
        }
        Ok(self)
    }
}

/// Versions visited after `from` on the way to `to`.
pub fn route(from: NgffVersion, to: NgffVersion) -> Vec<NgffVersion> {
    if from == to {
        Vec::new()
    } else if from.is_adjacent(to) {
        vec![to]
    } else {
        vec![NgffVersion::V05, to]
    }
}

fn unsupported_direct(from: NgffVersion, to: NgffVersion) -> NgffError {
    NgffError::NotImplemented(format!("v{}→v{} direct conversion unsupported", from, to))
}

/// One direct conversion between adjacent revisions.
fn step(
    source: AnyMetadata,
    target: NgffVersion,
    report: &mut ConversionReport,
) -> Result<AnyMetadata, NgffError> {
    let from = source.version();
    if from == target {
        return Ok(source);
    }
    log::debug!("converting NGFF metadata {} -> {}", from, target);

    let converted: AnyMetadata = match (&source, target) {
        (AnyMetadata::V04(m), NgffVersion::V05) => v04_v05::upgrade(m, report).into(),
        (AnyMetadata::V05(m), NgffVersion::V04) => v04_v05::downgrade(m, report).into(),
        (AnyMetadata::V05(m), NgffVersion::V06) => v05_v06::upgrade(m, report).into(),
        (AnyMetadata::V06(m), NgffVersion::V05) => v05_v06::downgrade(m, report)?.into(),
        _ => return Err(unsupported_direct(from, target)),
    };
    report.route.push(target);
    Ok(converted)
}

impl AnyMetadata {
    /// Converts to `target`, composing through v0.5 when no direct
    /// converter exists.
    ///
    /// The source is validated first and the result before it is returned.
    /// Converting to the current version returns the metadata unchanged.
    pub fn to_version(self, target: NgffVersion) -> Result<Converted<AnyMetadata>, NgffError> {
        self.validate()?;

        let from = self.version();
        let mut report = ConversionReport::new(from, target);
        report.input = ConversionCounts::of(&self);

        let hops = route(from, target);
        if hops.len() > 1 {
            log::debug!(
                "no direct converter for NGFF {} -> {}, composing through {}",
                from,
                target,
                NgffVersion::V05
            );
            report.add(ConversionIssue::info(
                ConversionIssueCode::ComposedThroughIntermediate,
                format!(
                    "{} -> {} has no direct converter; converted through {}",
                    from,
                    target,
                    NgffVersion::V05
                ),
            ));
        }

        let mut current = self;
        for hop in hops {
            current = step(current, hop, &mut report)?;
        }
        current.validate()?;

        report.output = ConversionCounts::of(&current);
        Ok(Converted {
            value: current,
            report,
        })
    }

    /// Like [`AnyMetadata::to_version`] with the target given by name
    /// (`"0.5"`, `"v05"`, `"latest"`, ...).
    pub fn to_version_named(self, target: &str) -> Result<Converted<AnyMetadata>, NgffError> {
        let parsed = target
            .parse::<NgffVersion>()
            .map_err(|_| NgffError::UnsupportedVersion {
                from: self.version(),
                target: target.to_string(),
            })?;
        self.to_version(parsed)
    }
}

/// Conversion entry points shared by the per-revision metadata types.
pub trait NgffMetadata:
    Sized + Into<AnyMetadata> + TryFrom<AnyMetadata, Error = NgffError>
{
    /// The revision this type models.
    const VERSION: NgffVersion;

    /// See [`AnyMetadata::to_version`].
    fn to_version(self, target: NgffVersion) -> Result<Converted<AnyMetadata>, NgffError> {
        let any: AnyMetadata = self.into();
        any.to_version(target)
    }

    /// Builds this revision from `source` using a direct converter only.
    ///
    /// # Errors
    /// [`NgffError::NotImplemented`] when `source` is neither this revision
    /// nor an adjacent one.
    fn from_version(source: AnyMetadata) -> Result<Converted<Self>, NgffError> {
        let from = source.version();
        if from != Self::VERSION && !from.is_adjacent(Self::VERSION) {
            return Err(unsupported_direct(from, Self::VERSION));
        }
        source
            .to_version(Self::VERSION)?
            .try_map(<Self as TryFrom<AnyMetadata>>::try_from)
    }
}

impl NgffMetadata for v04::Metadata {
    const VERSION: NgffVersion = NgffVersion::V04;
}

impl NgffMetadata for v05::Metadata {
    const VERSION: NgffVersion = NgffVersion::V05;
}

impl NgffMetadata for v06::Metadata {
    const VERSION: NgffVersion = NgffVersion::V06;
}
