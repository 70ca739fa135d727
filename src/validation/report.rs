//! Validation report types for structured error reporting.
//!
//! This module provides rich, structured validation results that can be
//! displayed to users, serialized to JSON, or processed programmatically.

use serde::Serialize;
use std::fmt;

/// The result of validating a metadata document.
///
/// Contains all issues found during validation, categorized by severity.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    /// All issues found during validation.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Returns the number of errors in the report.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Returns the number of warnings in the report.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns true if validation passed in strict mode (no errors or warnings).
    pub fn is_ok_strict(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if any issue carries the given code.
    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "Validation passed: no issues found");
        }

        writeln!(
            f,
            "Validation completed with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single validation issue (error or warning).
#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,

    /// A stable code for the issue type.
    pub code: IssueCode,

    pub message: String,

    /// Where in the document the issue occurred.
    pub context: IssueContext,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        context: IssueContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Error, code, message, context)
    }

    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

/// The severity of a validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Conformant, but likely to confuse readers of the metadata.
    Warning,
    /// The document violates its version's schema.
    Error,
}

/// A stable code identifying the type of validation issue.
///
/// These codes are part of the JSON report and should remain stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    // Schema violations (Error level)
    /// The multiscale has no datasets.
    EmptyDatasets,
    /// A transform list has an illegal length, order or transform type.
    InvalidTransformSequence,
    /// A v0.6 document declares no coordinate systems.
    EmptyCoordinateSystems,
    /// Two v0.6 coordinate systems share a name.
    DuplicateCoordinateSystemName,
    /// A v0.6 sequence has no children.
    EmptySequence,
    /// A v0.6 rotation matrix is empty or not square.
    InvalidRotation,

    // Likely mistakes (Warning level)
    /// A scale or translation vector length differs from the axis count.
    DimensionMismatch,
    /// A rotation matrix size differs from the axis count.
    RotationSizeMismatch,
    /// Fewer than 2 or more than 5 axes.
    AxisCountOutOfRange,
    /// Two axes share a name.
    DuplicateAxisName,
    /// A transform output names no declared coordinate system.
    UnresolvedCoordinateSystem,
}

/// Where in a metadata document an issue occurred.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueContext {
    /// The document as a whole.
    Metadata,
    /// A dataset, by path.
    Dataset { path: String },
    /// A v0.6 coordinate system, by name.
    CoordinateSystem { name: String },
    /// The root-level `coordinateTransformations`.
    GlobalTransformations,
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Metadata => write!(f, "metadata"),
            IssueContext::Dataset { path } => write!(f, "dataset '{}'", path),
            IssueContext::CoordinateSystem { name } => write!(f, "coordinate system '{}'", name),
            IssueContext::GlobalTransformations => write!(f, "global coordinateTransformations"),
        }
    }
}
