//! Direct conversion between v0.5 and v0.6.
//!
//! v0.5 axes are implicit: every dataset maps its array space onto the
//! single `axes` list. Upgrading names that space `"physical"` and binds
//! each dataset transform to it; downgrading reverses this by locating the
//! coordinate system the datasets map to and flattening sequences.
//!
//! v0.6 -> v0.5 is lossy: global transformations and any coordinate system
//! other than the datasets' target are dropped (reported as warnings).

use super::report::{ConversionIssue, ConversionIssueCode, ConversionReport};
use crate::error::NgffError;
use crate::model::v06::{CoordinateSystem, CoordinateSystemRef, TransformKind};
use crate::model::{describe_tags, v05, v06};
use crate::version::NgffVersion;

/// Name of the coordinate system synthesized from v0.5 `axes`.
pub const PHYSICAL: &str = "physical";

/// Name of the coordinate system synthesized for v0.5 global transforms.
pub const OUTPUT: &str = "output";

/// v0.5 -> v0.6.
pub(crate) fn upgrade(source: &v05::Metadata, report: &mut ConversionReport) -> v06::Metadata {
    let mut coordinate_systems = vec![CoordinateSystem::new(PHYSICAL, source.axes.clone())];
    report.add(ConversionIssue::info(
        ConversionIssueCode::SynthesizedCoordinateSystem,
        format!(
            "synthesized coordinate system '{}' from the {} v0.5 axes",
            PHYSICAL,
            source.axes.len()
        ),
    ));

    let mut collapsed = 0usize;
    let datasets = source
        .datasets
        .iter()
        .enumerate()
        .map(|(index, dataset)| {
            let transforms: Vec<v06::Transform> = dataset
                .coordinate_transformations
                .iter()
                .map(upgrade_transform)
                .collect();
            if transforms.len() > 1 {
                collapsed += 1;
            }
            v06::Dataset {
                path: dataset.path.clone(),
                coordinate_transformations: vec![bind(
                    transforms,
                    format!("scale{}_to_{}", index, PHYSICAL),
                    &dataset.path,
                    PHYSICAL,
                )],
            }
        })
        .collect();

    let coordinate_transformations = match &source.coordinate_transformations {
        Some(global) if !global.is_empty() => {
            coordinate_systems.push(CoordinateSystem::new(OUTPUT, source.axes.clone()));
            report.add(ConversionIssue::info(
                ConversionIssueCode::SynthesizedCoordinateSystem,
                format!(
                    "synthesized coordinate system '{}' as the range of the global transformations",
                    OUTPUT
                ),
            ));
            if global.len() > 1 {
                collapsed += 1;
            }
            let transforms = global.iter().map(upgrade_transform).collect();
            Some(vec![bind(
                transforms,
                format!("{}_to_{}", PHYSICAL, OUTPUT),
                PHYSICAL,
                OUTPUT,
            )])
        }
        Some(_) => Some(Vec::new()),
        None => None,
    };

    if collapsed > 0 {
        report.add(ConversionIssue::info(
            ConversionIssueCode::CollapsedIntoSequence,
            format!(
                "{} scale + translation pair(s) wrapped into a single sequence",
                collapsed
            ),
        ));
    }

    v06::Metadata {
        coordinate_systems,
        datasets,
        coordinate_transformations,
        name: source.name.clone(),
        labels: source.labels.clone(),
        downscaling_type: source.downscaling_type.clone(),
        metadata: source.metadata.clone(),
    }
}

fn upgrade_transform(transform: &v05::Transform) -> v06::Transform {
    match transform {
        v05::Transform::Identity => v06::Transform::identity(),
        v05::Transform::Scale { scale } => v06::Transform::scale(scale.clone()),
        v05::Transform::Translation { translation } => {
            v06::Transform::translation(translation.clone())
        }
    }
}

/// Turns a converted transform list into the single transform v0.6 allows,
/// mapping `input` to `output`. One transform is annotated in place; more
/// are wrapped in a sequence named `sequence_name`.
fn bind(
    mut transforms: Vec<v06::Transform>,
    sequence_name: String,
    input: &str,
    output: &str,
) -> v06::Transform {
    let bound = if transforms.len() == 1 {
        transforms.remove(0)
    } else {
        v06::Transform::sequence(transforms).with_name(sequence_name)
    };
    bound.with_input(input).with_output(output)
}

/// v0.6 -> v0.5.
pub(crate) fn downgrade(
    source: &v06::Metadata,
    report: &mut ConversionReport,
) -> Result<v05::Metadata, NgffError> {
    let target = resolve_target_system(source)?;

    let mut flattened = 0usize;
    let mut references = 0usize;
    let mut datasets = Vec::with_capacity(source.datasets.len());
    for dataset in &source.datasets {
        let mut transforms = Vec::new();
        for transform in &dataset.coordinate_transformations {
            if matches!(transform.kind, TransformKind::Sequence { .. }) {
                flattened += 1;
            }
            references += count_references(transform);
            flatten_into(transform, &mut transforms)?;
        }
        // Valid v0.6 sequences such as [translation, scale] have no v0.5 form.
        if v05::check_transforms(&dataset.path, &transforms).is_err() {
            return Err(NgffError::UnsupportedTransform {
                tag: describe_tags(transforms.iter().map(v05::Transform::tag)),
                target: NgffVersion::V05,
            });
        }
        datasets.push(v05::Dataset {
            path: dataset.path.clone(),
            coordinate_transformations: transforms,
        });
    }

    if flattened > 0 {
        report.add(ConversionIssue::info(
            ConversionIssueCode::FlattenedSequence,
            format!("{} sequence(s) unwrapped into their children", flattened),
        ));
    }
    if references > 0 {
        report.add(ConversionIssue::info(
            ConversionIssueCode::DropTransformReferences,
            format!(
                "{} transform name/input/output field(s) have no v0.5 equivalent",
                references
            ),
        ));
    }

    // TODO: re-express a single global scale/translation as v0.5 global
    // transformations once the output coordinate system can be checked
    // against the physical axes.
    let dropped_global = source
        .coordinate_transformations
        .as_ref()
        .map_or(0, Vec::len);
    if dropped_global > 0 {
        log::warn!(
            "dropping {} global coordinate transformation(s) converting v0.6 to v0.5",
            dropped_global
        );
        report.add(ConversionIssue::warning(
            ConversionIssueCode::DropGlobalTransformations,
            format!(
                "{} global coordinate transformation(s) will be dropped",
                dropped_global
            ),
        ));
    }

    let dropped_systems: Vec<&str> = source
        .coordinate_systems
        .iter()
        .filter(|cs| cs.name != target.name)
        .map(|cs| cs.name.as_str())
        .collect();
    if !dropped_systems.is_empty() {
        log::warn!(
            "dropping coordinate system(s) {:?} converting v0.6 to v0.5",
            dropped_systems
        );
        report.add(ConversionIssue::warning(
            ConversionIssueCode::DropCoordinateSystems,
            format!(
                "{} coordinate system(s) will be dropped: {}",
                dropped_systems.len(),
                dropped_systems.join(", ")
            ),
        ));
    }

    Ok(v05::Metadata {
        axes: target.axes.clone(),
        datasets,
        coordinate_transformations: None,
        name: source.name.clone(),
        labels: source.labels.clone(),
        downscaling_type: source.downscaling_type.clone(),
        metadata: source.metadata.clone(),
    })
}

fn flatten_into(
    transform: &v06::Transform,
    out: &mut Vec<v05::Transform>,
) -> Result<(), NgffError> {
    match &transform.kind {
        TransformKind::Identity => out.push(v05::Transform::Identity),
        TransformKind::Scale { scale } => out.push(v05::Transform::Scale {
            scale: scale.clone(),
        }),
        TransformKind::Translation { translation } => out.push(v05::Transform::Translation {
            translation: translation.clone(),
        }),
        TransformKind::Rotation { .. } => {
            return Err(NgffError::UnsupportedTransform {
                tag: transform.tag().to_string(),
                target: NgffVersion::V05,
            })
        }
        TransformKind::Sequence { transformations } => {
            for child in transformations {
                flatten_into(child, out)?;
            }
        }
    }
    Ok(())
}

fn count_references(transform: &v06::Transform) -> usize {
    let own = [
        transform.name.is_some(),
        transform.input.is_some(),
        transform.output.is_some(),
    ]
    .into_iter()
    .filter(|present| *present)
    .count();
    let children = match &transform.kind {
        TransformKind::Sequence { transformations } => {
            transformations.iter().map(count_references).sum()
        }
        _ => 0,
    };
    own + children
}

/// The coordinate system whose axes become the v0.5 `axes`.
///
/// Taken from the first dataset's transform `output`; every other dataset
/// must map to the same system.
fn resolve_target_system(source: &v06::Metadata) -> Result<&CoordinateSystem, NgffError> {
    let mut datasets = source.datasets.iter();
    let first = datasets
        .next()
        .ok_or_else(|| NgffError::schema("datasets", "datasets must not be empty"))?;
    let target = resolve_dataset_system(source, first)?;

    for dataset in datasets {
        let system = resolve_dataset_system(source, dataset)?;
        if system.name != target.name || system.axes != target.axes {
            return Err(NgffError::CoordinateSystemMismatch {
                path: dataset.path.clone(),
                expected: target.name.clone(),
                found: system.name.clone(),
            });
        }
    }
    Ok(target)
}

fn resolve_dataset_system<'a>(
    source: &'a v06::Metadata,
    dataset: &'a v06::Dataset,
) -> Result<&'a CoordinateSystem, NgffError> {
    let output = dataset
        .coordinate_transformations
        .first()
        .and_then(|t| t.output.as_ref());

    match output {
        Some(CoordinateSystemRef::Name(name)) => {
            source
                .coordinate_system(name)
                .ok_or_else(|| NgffError::MissingCoordinateSystem {
                    path: dataset.path.clone(),
                    name: name.clone(),
                })
        }
        Some(CoordinateSystemRef::Inline(system)) => Ok(system),
        // Without an explicit output the only candidate is a sole declared system.
        None => match source.coordinate_systems.as_slice() {
            [only] => Ok(only),
            _ => Err(NgffError::MissingCoordinateSystem {
                path: dataset.path.clone(),
                name: "<no output>".to_string(),
            }),
        },
    }
}
