//! Direct conversion between v0.4 and v0.5.
//!
//! Both revisions share the same document shape; only the status of
//! `identity` differs. v0.4 has no identity transform, so identity is
//! written as a scale of ones (one per axis) in either direction that
//! cannot name it.

use super::report::{ConversionIssue, ConversionIssueCode, ConversionReport};
use crate::model::{v04, v05};

/// v0.4 -> v0.5. The v0.4 `identity` sentinel becomes `Scale([1.0; N])`.
pub(crate) fn upgrade(source: &v04::Metadata, report: &mut ConversionReport) -> v05::Metadata {
    let axis_count = source.axes.len();
    let mut materialized = 0usize;

    let mut upgrade_transform = |transform: &v04::Transform| match transform {
        v04::Transform::Identity => {
            materialized += 1;
            v05::Transform::Scale {
                scale: vec![1.0; axis_count],
            }
        }
        v04::Transform::Scale { scale } => v05::Transform::Scale {
            scale: scale.clone(),
        },
        v04::Transform::Translation { translation } => v05::Transform::Translation {
            translation: translation.clone(),
        },
    };

    let datasets = source
        .datasets
        .iter()
        .map(|dataset| v05::Dataset {
            path: dataset.path.clone(),
            coordinate_transformations: dataset
                .coordinate_transformations
                .iter()
                .map(&mut upgrade_transform)
                .collect(),
        })
        .collect();

    let coordinate_transformations = source
        .coordinate_transformations
        .as_ref()
        .map(|global| global.iter().map(&mut upgrade_transform).collect());

    if materialized > 0 {
        report.add(ConversionIssue::info(
            ConversionIssueCode::IdentityMaterializedAsScale,
            format!(
                "{} v0.4 identity transform(s) written as a scale of {} one(s)",
                materialized, axis_count
            ),
        ));
    }

    v05::Metadata {
        axes: source.axes.clone(),
        datasets,
        coordinate_transformations,
        name: source.name.clone(),
        labels: source.labels.clone(),
        downscaling_type: source.downscaling_type.clone(),
        metadata: source.metadata.clone(),
    }
}

/// v0.5 -> v0.4. `Identity` becomes `Scale([1.0; N])`.
pub(crate) fn downgrade(source: &v05::Metadata, report: &mut ConversionReport) -> v04::Metadata {
    let axis_count = source.axes.len();
    let mut materialized = 0usize;

    let mut downgrade_transform = |transform: &v05::Transform| match transform {
        v05::Transform::Identity => {
            materialized += 1;
            v04::Transform::Scale {
                scale: vec![1.0; axis_count],
            }
        }
        v05::Transform::Scale { scale } => v04::Transform::Scale {
            scale: scale.clone(),
        },
        v05::Transform::Translation { translation } => v04::Transform::Translation {
            translation: translation.clone(),
        },
    };

    let datasets = source
        .datasets
        .iter()
        .map(|dataset| v04::Dataset {
            path: dataset.path.clone(),
            coordinate_transformations: dataset
                .coordinate_transformations
                .iter()
                .map(&mut downgrade_transform)
                .collect(),
        })
        .collect();

    let coordinate_transformations = source
        .coordinate_transformations
        .as_ref()
        .map(|global| global.iter().map(&mut downgrade_transform).collect());

    if materialized > 0 {
        report.add(ConversionIssue::info(
            ConversionIssueCode::IdentityMaterializedAsScale,
            format!(
                "{} identity transform(s) have no v0.4 form and were written as a scale of {} one(s)",
                materialized, axis_count
            ),
        ));
    }

    v04::Metadata {
        axes: source.axes.clone(),
        datasets,
        coordinate_transformations,
        name: source.name.clone(),
        labels: source.labels.clone(),
        downscaling_type: source.downscaling_type.clone(),
        metadata: source.metadata.clone(),
    }
}
