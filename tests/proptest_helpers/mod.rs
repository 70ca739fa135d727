#![allow(dead_code)]

use ngffmeta::model::{v04, v05, v06, Axis};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

const AXIS_NAMES: [&str; 5] = ["t", "c", "z", "y", "x"];

/// 2 to 5 distinct axes in canonical `t, c, z, y, x` order.
pub fn arb_axes() -> BoxedStrategy<Vec<Axis>> {
    (2usize..=5)
        .prop_flat_map(|count| {
            proptest::sample::subsequence(AXIS_NAMES.to_vec(), count)
        })
        .prop_map(|names| {
            names
                .into_iter()
                .map(|name| match name {
                    "t" => Axis::new(name).with_type("time").with_unit("second"),
                    "c" => Axis::new(name).with_type("channel"),
                    _ => Axis::space(name, Some("micrometer")),
                })
                .collect()
        })
        .boxed()
}

pub fn arb_vector(len: usize) -> BoxedStrategy<Vec<f64>> {
    proptest::collection::vec(-1.0e6f64..1.0e6, len).boxed()
}

pub fn arb_positive_vector(len: usize) -> BoxedStrategy<Vec<f64>> {
    proptest::collection::vec(1.0e-3f64..1.0e3, len).boxed()
}

/// A legal v0.4 dataset transform list: `[scale]` or `[scale, translation]`.
pub fn arb_v04_transforms(axes: usize) -> BoxedStrategy<Vec<v04::Transform>> {
    (arb_positive_vector(axes), proptest::option::of(arb_vector(axes)))
        .prop_map(|(scale, translation)| {
            let mut transforms = vec![v04::Transform::Scale { scale }];
            if let Some(translation) = translation {
                transforms.push(v04::Transform::Translation { translation });
            }
            transforms
        })
        .boxed()
}

/// A legal v0.5 dataset transform list, identity included.
pub fn arb_v05_transforms(axes: usize) -> BoxedStrategy<Vec<v05::Transform>> {
    prop_oneof![
        1 => Just(vec![v05::Transform::Identity]),
        4 => (arb_positive_vector(axes), proptest::option::of(arb_vector(axes))).prop_map(
            |(scale, translation)| {
                let mut transforms = vec![v05::Transform::Scale { scale }];
                if let Some(translation) = translation {
                    transforms.push(v05::Transform::Translation { translation });
                }
                transforms
            }
        ),
    ]
    .boxed()
}

fn dataset_count() -> std::ops::RangeInclusive<usize> {
    1..=4
}

/// v0.4 metadata with only scale/translation transforms.
pub fn arb_v04_metadata() -> BoxedStrategy<v04::Metadata> {
    arb_axes()
        .prop_flat_map(|axes| {
            let n = axes.len();
            (
                Just(axes),
                proptest::collection::vec(arb_v04_transforms(n), dataset_count()),
                proptest::option::of(arb_v04_transforms(n)),
                proptest::option::of("[a-z]{1,8}"),
            )
        })
        .prop_map(|(axes, transform_lists, global, name)| v04::Metadata {
            axes,
            datasets: transform_lists
                .into_iter()
                .enumerate()
                .map(|(i, coordinate_transformations)| v04::Dataset {
                    path: i.to_string(),
                    coordinate_transformations,
                })
                .collect(),
            coordinate_transformations: global,
            name,
            labels: None,
            downscaling_type: None,
            metadata: None,
        })
        .boxed()
}

/// v0.5 metadata; global transforms are included when `with_global` is set.
pub fn arb_v05_metadata(with_global: bool) -> BoxedStrategy<v05::Metadata> {
    arb_axes()
        .prop_flat_map(move |axes| {
            let n = axes.len();
            let global = if with_global {
                arb_v05_transforms(n).prop_map(Some).boxed()
            } else {
                Just(None).boxed()
            };
            (
                Just(axes),
                proptest::collection::vec(arb_v05_transforms(n), dataset_count()),
                global,
            )
        })
        .prop_map(|(axes, transform_lists, global)| v05::Metadata {
            axes,
            datasets: transform_lists
                .into_iter()
                .enumerate()
                .map(|(i, coordinate_transformations)| v05::Dataset {
                    path: format!("s{}", i),
                    coordinate_transformations,
                })
                .collect(),
            coordinate_transformations: global,
            name: None,
            labels: Some(vec!["cells".to_string()]),
            downscaling_type: Some("mean".to_string()),
            metadata: None,
        })
        .boxed()
}

/// Every scale and translation vector in pyramid order, globals last.
pub fn v04_vectors(metadata: &v04::Metadata) -> Vec<Vec<f64>> {
    metadata
        .datasets
        .iter()
        .flat_map(|d| &d.coordinate_transformations)
        .chain(metadata.coordinate_transformations.iter().flatten())
        .filter_map(|t| t.values().map(<[f64]>::to_vec))
        .collect()
}

/// Every scale and translation vector of a v0.6 document, sequences
/// flattened, globals last.
pub fn v06_vectors(metadata: &v06::Metadata) -> Vec<Vec<f64>> {
    fn collect(transform: &v06::Transform, out: &mut Vec<Vec<f64>>) {
        match &transform.kind {
            v06::TransformKind::Scale { scale } => out.push(scale.clone()),
            v06::TransformKind::Translation { translation } => out.push(translation.clone()),
            v06::TransformKind::Sequence { transformations } => {
                for child in transformations {
                    collect(child, out);
                }
            }
            v06::TransformKind::Identity | v06::TransformKind::Rotation { .. } => {}
        }
    }

    let mut out = Vec::new();
    for transform in metadata
        .datasets
        .iter()
        .flat_map(|d| &d.coordinate_transformations)
        .chain(metadata.coordinate_transformations.iter().flatten())
    {
        collect(transform, &mut out);
    }
    out
}
