//! Metadata validation with a full issue report.
//!
//! [`AnyMetadata::validate`] stops at the first schema violation. This
//! module instead walks the whole document and collects:
//! - Schema violations as errors (empty datasets, illegal transform lists,
//!   duplicate coordinate systems, malformed rotations and sequences)
//! - Likely mistakes as warnings (vector lengths that disagree with the axis
//!   count, unusual axis counts, duplicate axis names, unresolved
//!   coordinate system references)

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::HashSet;

use crate::error::NgffError;
use crate::model::v06::{CoordinateSystemRef, TransformKind};
use crate::model::{v04, v05, v06, AnyMetadata, Axis};

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Validates a metadata document and returns a report of all issues found.
pub fn validate_metadata(metadata: &AnyMetadata, _opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();
    match metadata {
        AnyMetadata::V04(m) => validate_v04(m, &mut report),
        AnyMetadata::V05(m) => validate_v05(m, &mut report),
        AnyMetadata::V06(m) => validate_v06(m, &mut report),
    }
    log::debug!(
        "validated NGFF {} metadata: {} error(s), {} warning(s)",
        metadata.version(),
        report.error_count(),
        report.warning_count()
    );
    report
}

fn reason(err: NgffError) -> String {
    match err {
        NgffError::SchemaViolation { reason, .. } => reason,
        other => other.to_string(),
    }
}

fn validate_v04(metadata: &v04::Metadata, report: &mut ValidationReport) {
    let axis_count = metadata.axes.len();
    validate_axes(&metadata.axes, IssueContext::Metadata, report);
    check_datasets_present(metadata.datasets.is_empty(), report);

    for dataset in &metadata.datasets {
        let context = IssueContext::Dataset {
            path: dataset.path.clone(),
        };
        if let Err(err) = v04::check_transforms(&dataset.path, &dataset.coordinate_transformations)
        {
            report.add(ValidationIssue::error(
                IssueCode::InvalidTransformSequence,
                reason(err),
                context.clone(),
            ));
        }
        check_vectors(
            dataset
                .coordinate_transformations
                .iter()
                .filter_map(|t| t.values().map(|v| (t.tag(), v))),
            axis_count,
            &context,
            report,
        );
    }

    if let Some(global) = metadata.coordinate_transformations.as_ref() {
        if !global.is_empty() {
            if let Err(err) = v04::check_transforms("coordinateTransformations", global) {
                report.add(ValidationIssue::error(
                    IssueCode::InvalidTransformSequence,
                    reason(err),
                    IssueContext::GlobalTransformations,
                ));
            }
            check_vectors(
                global
                    .iter()
                    .filter_map(|t| t.values().map(|v| (t.tag(), v))),
                axis_count,
                &IssueContext::GlobalTransformations,
                report,
            );
        }
    }
}

fn validate_v05(metadata: &v05::Metadata, report: &mut ValidationReport) {
    let axis_count = metadata.axes.len();
    validate_axes(&metadata.axes, IssueContext::Metadata, report);
    check_datasets_present(metadata.datasets.is_empty(), report);

    for dataset in &metadata.datasets {
        let context = IssueContext::Dataset {
            path: dataset.path.clone(),
        };
        if let Err(err) = v05::check_transforms(&dataset.path, &dataset.coordinate_transformations)
        {
            report.add(ValidationIssue::error(
                IssueCode::InvalidTransformSequence,
                reason(err),
                context.clone(),
            ));
        }
        check_vectors(
            dataset
                .coordinate_transformations
                .iter()
                .filter_map(|t| t.values().map(|v| (t.tag(), v))),
            axis_count,
            &context,
            report,
        );
    }

    if let Some(global) = metadata.coordinate_transformations.as_ref() {
        if !global.is_empty() {
            if let Err(err) = v05::check_transforms("coordinateTransformations", global) {
                report.add(ValidationIssue::error(
                    IssueCode::InvalidTransformSequence,
                    reason(err),
                    IssueContext::GlobalTransformations,
                ));
            }
            check_vectors(
                global
                    .iter()
                    .filter_map(|t| t.values().map(|v| (t.tag(), v))),
                axis_count,
                &IssueContext::GlobalTransformations,
                report,
            );
        }
    }
}

fn validate_v06(metadata: &v06::Metadata, report: &mut ValidationReport) {
    if metadata.coordinate_systems.is_empty() {
        report.add(ValidationIssue::error(
            IssueCode::EmptyCoordinateSystems,
            "coordinateSystems must not be empty",
            IssueContext::Metadata,
        ));
    }

    let mut seen = HashSet::new();
    for system in &metadata.coordinate_systems {
        let context = IssueContext::CoordinateSystem {
            name: system.name.clone(),
        };
        if !seen.insert(system.name.as_str()) {
            report.add(ValidationIssue::error(
                IssueCode::DuplicateCoordinateSystemName,
                format!("coordinate system '{}' is declared more than once", system.name),
                context.clone(),
            ));
        }
        validate_axes(&system.axes, context, report);
    }

    check_datasets_present(metadata.datasets.is_empty(), report);

    for dataset in &metadata.datasets {
        let context = IssueContext::Dataset {
            path: dataset.path.clone(),
        };
        if let Err(err) =
            v06::check_dataset_transforms(&dataset.path, &dataset.coordinate_transformations)
        {
            let code = dataset
                .coordinate_transformations
                .iter()
                .find_map(malformed_kind)
                .unwrap_or(IssueCode::InvalidTransformSequence);
            report.add(ValidationIssue::error(code, reason(err), context.clone()));
        }
        for transform in &dataset.coordinate_transformations {
            check_v06_transform(metadata, transform, None, &context, report);
        }
    }

    for transform in metadata.coordinate_transformations.iter().flatten() {
        let context = IssueContext::GlobalTransformations;
        if let Err(err) = v06::check_transform("coordinateTransformations", transform) {
            let code = malformed_kind(transform).unwrap_or(IssueCode::InvalidTransformSequence);
            report.add(ValidationIssue::error(code, reason(err), context.clone()));
        }
        check_v06_transform(metadata, transform, None, &context, report);
    }
}

/// The specific code for a transform whose own shape is broken, if any.
fn malformed_kind(transform: &v06::Transform) -> Option<IssueCode> {
    match &transform.kind {
        TransformKind::Rotation { rotation } => {
            let size = rotation.len();
            (size == 0 || rotation.iter().any(|row| row.len() != size))
                .then_some(IssueCode::InvalidRotation)
        }
        TransformKind::Sequence { transformations } if transformations.is_empty() => {
            Some(IssueCode::EmptySequence)
        }
        TransformKind::Sequence { transformations } => {
            transformations.iter().find_map(malformed_kind)
        }
        _ => None,
    }
}

/// Resolves `output` references and checks vector sizes against the axis
/// count of the system the transform maps into. Children of a sequence
/// inherit the parent's axis count unless they name their own output.
fn check_v06_transform(
    metadata: &v06::Metadata,
    transform: &v06::Transform,
    inherited_axes: Option<usize>,
    context: &IssueContext,
    report: &mut ValidationReport,
) {
    let resolved_axes = match &transform.output {
        Some(CoordinateSystemRef::Name(name)) => match metadata.coordinate_system(name) {
            Some(system) => Some(system.axes.len()),
            None => {
                report.add(ValidationIssue::warning(
                    IssueCode::UnresolvedCoordinateSystem,
                    format!(
                        "{} output '{}' is not a declared coordinate system",
                        transform.tag(),
                        name
                    ),
                    context.clone(),
                ));
                None
            }
        },
        Some(CoordinateSystemRef::Inline(system)) => Some(system.axes.len()),
        None => None,
    };
    let axis_count = resolved_axes.or(inherited_axes);

    match &transform.kind {
        TransformKind::Scale { scale } => {
            if let Some(count) = axis_count {
                check_vectors(std::iter::once(("scale", scale.as_slice())), count, context, report);
            }
        }
        TransformKind::Translation { translation } => {
            if let Some(count) = axis_count {
                check_vectors(
                    std::iter::once(("translation", translation.as_slice())),
                    count,
                    context,
                    report,
                );
            }
        }
        TransformKind::Rotation { rotation } => {
            if let Some(count) = axis_count {
                if !rotation.is_empty() && rotation.len() != count {
                    report.add(ValidationIssue::warning(
                        IssueCode::RotationSizeMismatch,
                        format!(
                            "rotation is {0}x{0} but the output has {1} axes",
                            rotation.len(),
                            count
                        ),
                        context.clone(),
                    ));
                }
            }
        }
        TransformKind::Sequence { transformations } => {
            for child in transformations {
                check_v06_transform(metadata, child, axis_count, context, report);
            }
        }
        TransformKind::Identity => {}
    }
}

fn check_datasets_present(empty: bool, report: &mut ValidationReport) {
    if empty {
        report.add(ValidationIssue::error(
            IssueCode::EmptyDatasets,
            "datasets must not be empty",
            IssueContext::Metadata,
        ));
    }
}

fn validate_axes(axes: &[Axis], context: IssueContext, report: &mut ValidationReport) {
    if !(2..=5).contains(&axes.len()) {
        report.add(ValidationIssue::warning(
            IssueCode::AxisCountOutOfRange,
            format!("{} axes (expected between 2 and 5)", axes.len()),
            context.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for axis in axes {
        if !seen.insert(axis.name.as_str()) {
            report.add(ValidationIssue::warning(
                IssueCode::DuplicateAxisName,
                format!("axis '{}' appears more than once", axis.name),
                context.clone(),
            ));
        }
    }
}

fn check_vectors<'a>(
    vectors: impl Iterator<Item = (&'static str, &'a [f64])>,
    axis_count: usize,
    context: &IssueContext,
    report: &mut ValidationReport,
) {
    for (tag, values) in vectors {
        if values.len() != axis_count {
            report.add(ValidationIssue::warning(
                IssueCode::DimensionMismatch,
                format!(
                    "{} has {} value(s) but there are {} axes",
                    tag,
                    values.len(),
                    axis_count
                ),
                context.clone(),
            ));
        }
    }
}
