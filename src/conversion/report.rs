//! Conversion report types for tracking lossiness and policy decisions.
//!
//! This module provides structured reporting for version conversions,
//! similar to how `validation::ValidationReport` tracks schema issues.

use serde::Serialize;
use std::fmt;

use crate::model::{v06, AnyMetadata};
use crate::version::NgffVersion;

/// A report generated during version conversion.
///
/// Tracks input/output counts, the version route taken, lossiness warnings,
/// and policy decisions so callers can see exactly what happened.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionReport {
    /// Source version.
    pub from: NgffVersion,
    /// Target version.
    pub to: NgffVersion,
    /// Every version the metadata passed through, source and target included.
    pub route: Vec<NgffVersion>,
    /// Counts from the input metadata.
    pub input: ConversionCounts,
    /// Counts in the output (may differ if global transforms are dropped, etc.).
    pub output: ConversionCounts,
    /// Issues recorded during conversion.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    /// Create a new empty report for a conversion between versions.
    pub fn new(from: NgffVersion, to: NgffVersion) -> Self {
        Self {
            from,
            to,
            route: vec![from],
            input: ConversionCounts::default(),
            output: ConversionCounts::default(),
            issues: Vec::new(),
        }
    }

    /// Add an issue to the report.
    pub fn add(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    /// Count of warning-level issues (true lossiness).
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Warning)
            .count()
    }

    /// Count of info-level issues (policy decisions, notes).
    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Info)
            .count()
    }

    /// Returns true if this conversion lost information.
    ///
    /// A conversion is lossy if it has any warning-level issues.
    pub fn is_lossy(&self) -> bool {
        self.warning_count() > 0
    }

    /// Returns true if any issue carries the given code.
    pub fn has(&self, code: ConversionIssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    /// Iterate over warning messages (for error display compatibility).
    pub fn lossy_messages(&self) -> impl Iterator<Item = &str> {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Warning)
            .map(|i| i.message.as_str())
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let route: Vec<&str> = self.route.iter().map(NgffVersion::as_str).collect();
        writeln!(f, "  route: {}", route.join(" -> "))?;
        writeln!(f, "  {}", self.input)?;

        // Show output counts if they differ from input
        if self.output != self.input {
            writeln!(f, "  output: {}", self.output)?;
        }

        let warnings = self.warning_count();
        let infos = self.info_count();

        if warnings > 0 {
            writeln!(f)?;
            writeln!(f, "Warnings ({}):", warnings)?;
            for message in self.lossy_messages() {
                writeln!(f, "  - {}", message)?;
            }
        }

        if infos > 0 {
            writeln!(f)?;
            writeln!(f, "Notes ({}):", infos)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Info)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        Ok(())
    }
}

/// Counts of metadata elements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionCounts {
    pub axes: usize,
    pub coordinate_systems: usize,
    pub datasets: usize,
    /// Primitive dataset transforms; sequences count their children.
    pub transformations: usize,
    /// Primitive global transforms.
    pub global_transformations: usize,
}

impl ConversionCounts {
    pub fn of(metadata: &AnyMetadata) -> Self {
        match metadata {
            AnyMetadata::V04(m) => Self {
                axes: m.axes.len(),
                coordinate_systems: 0,
                datasets: m.datasets.len(),
                transformations: m
                    .datasets
                    .iter()
                    .map(|d| d.coordinate_transformations.len())
                    .sum(),
                global_transformations: m.coordinate_transformations.as_ref().map_or(0, Vec::len),
            },
            AnyMetadata::V05(m) => Self {
                axes: m.axes.len(),
                coordinate_systems: 0,
                datasets: m.datasets.len(),
                transformations: m
                    .datasets
                    .iter()
                    .map(|d| d.coordinate_transformations.len())
                    .sum(),
                global_transformations: m.coordinate_transformations.as_ref().map_or(0, Vec::len),
            },
            AnyMetadata::V06(m) => Self {
                axes: metadata.primary_axes().len(),
                coordinate_systems: m.coordinate_systems.len(),
                datasets: m.datasets.len(),
                transformations: m
                    .datasets
                    .iter()
                    .flat_map(|d| &d.coordinate_transformations)
                    .map(v06::Transform::primitive_count)
                    .sum(),
                global_transformations: m
                    .coordinate_transformations
                    .iter()
                    .flatten()
                    .map(v06::Transform::primitive_count)
                    .sum(),
            },
        }
    }
}

impl fmt::Display for ConversionCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} axes, {} coordinate systems, {} datasets, {} transformations, {} global transformations",
            self.axes,
            self.coordinate_systems,
            self.datasets,
            self.transformations,
            self.global_transformations
        )
    }
}

/// A single issue recorded during conversion.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: ConversionIssueCode,
    pub message: String,
}

impl ConversionIssue {
    /// Create a warning-level issue (indicates lossiness).
    pub fn warning(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Create an info-level issue (policy note, does not block).
    pub fn info(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Info,
            code,
            message: message.into(),
        }
    }
}

/// Severity level for conversion issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    /// A warning indicates information loss; requires `--allow-lossy`.
    Warning,
    /// An info note describes policy decisions; does not block conversion.
    Info,
}

/// Stable issue codes for programmatic consumption.
///
/// These codes are part of the JSON report schema and should remain stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    // Lossiness (Warning level)
    /// v0.6 global coordinate transformations have no v0.5 counterpart.
    DropGlobalTransformations,
    /// Coordinate systems other than the one the datasets map to are dropped.
    DropCoordinateSystems,

    // Policy decisions (Info level)
    /// An identity was written as a scale of ones.
    IdentityMaterializedAsScale,
    /// A coordinate system was invented to host axes that had no name.
    SynthesizedCoordinateSystem,
    /// A scale + translation pair was wrapped into one sequence.
    CollapsedIntoSequence,
    /// A sequence was unwrapped into its children.
    FlattenedSequence,
    /// Transform names and input/output references were discarded.
    DropTransformReferences,
    /// Non-adjacent versions were bridged through v0.5.
    ComposedThroughIntermediate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_not_lossy() {
        let report = ConversionReport::new(NgffVersion::V04, NgffVersion::V05);
        assert!(!report.is_lossy());
        assert_eq!(report.warning_count(), 0);
        assert_eq!(report.info_count(), 0);
        assert_eq!(report.route, vec![NgffVersion::V04]);
    }

    #[test]
    fn warning_makes_report_lossy() {
        let mut report = ConversionReport::new(NgffVersion::V06, NgffVersion::V05);
        report.add(ConversionIssue::warning(
            ConversionIssueCode::DropGlobalTransformations,
            "1 global coordinate transformation(s) will be dropped",
        ));
        assert!(report.is_lossy());
        assert!(report.has(ConversionIssueCode::DropGlobalTransformations));
        assert_eq!(report.lossy_messages().count(), 1);
    }

    #[test]
    fn info_does_not_make_report_lossy() {
        let mut report = ConversionReport::new(NgffVersion::V05, NgffVersion::V06);
        report.add(ConversionIssue::info(
            ConversionIssueCode::SynthesizedCoordinateSystem,
            "synthesized coordinate system 'physical'",
        ));
        assert!(!report.is_lossy());
        assert_eq!(report.info_count(), 1);
    }

    #[test]
    fn report_serializes_to_json() {
        let mut report = ConversionReport::new(NgffVersion::V06, NgffVersion::V04);
        report.route = vec![NgffVersion::V06, NgffVersion::V05, NgffVersion::V04];
        report.add(ConversionIssue::warning(
            ConversionIssueCode::DropCoordinateSystems,
            "1 coordinate system(s) will be dropped",
        ));

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"from\":\"0.6\""));
        assert!(json.contains("\"route\":[\"0.6\",\"0.5\",\"0.4\"]"));
        assert!(json.contains("\"severity\":\"warning\""));
        assert!(json.contains("\"code\":\"drop_coordinate_systems\""));
    }

    #[test]
    fn display_lists_route_and_warnings() {
        let mut report = ConversionReport::new(NgffVersion::V06, NgffVersion::V05);
        report.route.push(NgffVersion::V05);
        report.add(ConversionIssue::warning(
            ConversionIssueCode::DropGlobalTransformations,
            "global transformations dropped",
        ));

        let text = report.to_string();
        assert!(text.contains("route: 0.6 -> 0.5"));
        assert!(text.contains("Warnings (1):"));
        assert!(text.contains("- global transformations dropped"));
    }
}
