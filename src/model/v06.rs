//! NGFF v0.6 multiscale metadata.
//!
//! v0.6 replaces the flat `axes` list by named coordinate systems and lets
//! every transform state which coordinate systems it maps between.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{describe_tags, Axis, MethodMetadata};
use crate::error::NgffError;

/// A named axis set that transforms refer to as their domain or range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSystem {
    pub name: String,
    pub axes: Vec<Axis>,
}

impl CoordinateSystem {
    pub fn new(name: impl Into<String>, axes: Vec<Axis>) -> Self {
        Self {
            name: name.into(),
            axes,
        }
    }
}

/// The `input`/`output` of a transform: a coordinate system name or an
/// inline declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinateSystemRef {
    Name(String),
    Inline(CoordinateSystem),
}

impl CoordinateSystemRef {
    pub fn name(&self) -> &str {
        match self {
            CoordinateSystemRef::Name(name) => name,
            CoordinateSystemRef::Inline(system) => &system.name,
        }
    }
}

impl From<&str> for CoordinateSystemRef {
    fn from(name: &str) -> Self {
        CoordinateSystemRef::Name(name.to_string())
    }
}

impl From<String> for CoordinateSystemRef {
    fn from(name: String) -> Self {
        CoordinateSystemRef::Name(name)
    }
}

impl From<CoordinateSystem> for CoordinateSystemRef {
    fn from(system: CoordinateSystem) -> Self {
        CoordinateSystemRef::Inline(system)
    }
}

/// The operation a v0.6 transform performs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransformKind {
    Identity,
    Scale { scale: Vec<f64> },
    Translation { translation: Vec<f64> },
    /// Square matrix, row-major.
    Rotation { rotation: Vec<Vec<f64>> },
    /// Children are applied in list order.
    Sequence { transformations: Vec<Transform> },
}

/// A v0.6 coordinate transformation with its optional name and endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(flatten)]
    pub kind: TransformKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<CoordinateSystemRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<CoordinateSystemRef>,
}

impl Transform {
    pub fn new(kind: TransformKind) -> Self {
        Self {
            kind,
            name: None,
            input: None,
            output: None,
        }
    }

    pub fn identity() -> Self {
        Self::new(TransformKind::Identity)
    }

    pub fn scale(scale: impl Into<Vec<f64>>) -> Self {
        Self::new(TransformKind::Scale {
            scale: scale.into(),
        })
    }

    pub fn translation(translation: impl Into<Vec<f64>>) -> Self {
        Self::new(TransformKind::Translation {
            translation: translation.into(),
        })
    }

    pub fn rotation(rotation: Vec<Vec<f64>>) -> Self {
        Self::new(TransformKind::Rotation { rotation })
    }

    pub fn sequence(transformations: Vec<Transform>) -> Self {
        Self::new(TransformKind::Sequence { transformations })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_input(mut self, input: impl Into<CoordinateSystemRef>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<CoordinateSystemRef>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn tag(&self) -> &'static str {
        match self.kind {
            TransformKind::Identity => "identity",
            TransformKind::Scale { .. } => "scale",
            TransformKind::Translation { .. } => "translation",
            TransformKind::Rotation { .. } => "rotation",
            TransformKind::Sequence { .. } => "sequence",
        }
    }

    /// Number of primitive transforms, counting through sequences.
    pub fn primitive_count(&self) -> usize {
        match &self.kind {
            TransformKind::Sequence { transformations } => {
                transformations.iter().map(Transform::primitive_count).sum()
            }
            _ => 1,
        }
    }
}

/// Checks the internal shape of one transform, recursing into sequences.
pub(crate) fn check_transform(path: &str, transform: &Transform) -> Result<(), NgffError> {
    match &transform.kind {
        TransformKind::Rotation { rotation } => {
            let size = rotation.len();
            if size == 0 || rotation.iter().any(|row| row.len() != size) {
                let shape: Vec<usize> = rotation.iter().map(Vec::len).collect();
                return Err(NgffError::schema(
                    path,
                    format!(
                        "rotation must be a non-empty square matrix (got {} row(s) of lengths {:?})",
                        size, shape
                    ),
                ));
            }
            Ok(())
        }
        TransformKind::Sequence { transformations } => {
            if transformations.is_empty() {
                return Err(NgffError::schema(path, "sequence must not be empty"));
            }
            transformations
                .iter()
                .try_for_each(|child| check_transform(path, child))
        }
        TransformKind::Identity | TransformKind::Scale { .. } | TransformKind::Translation { .. } => {
            Ok(())
        }
    }
}

/// Checks a v0.6 dataset transform list: exactly one `identity`, `scale`
/// or `sequence` of primitives.
pub(crate) fn check_dataset_transforms(
    path: &str,
    transforms: &[Transform],
) -> Result<(), NgffError> {
    match transforms {
        [] => Err(NgffError::schema(
            path,
            "coordinateTransformations must not be empty",
        )),
        [single] => match &single.kind {
            TransformKind::Identity | TransformKind::Scale { .. } => check_transform(path, single),
            TransformKind::Sequence { transformations } => {
                if let Some(nested) = transformations
                    .iter()
                    .find(|t| matches!(t.kind, TransformKind::Sequence { .. }))
                {
                    return Err(NgffError::schema(
                        path,
                        format!(
                            "dataset sequence must contain only primitive transforms (found nested {})",
                            nested.tag()
                        ),
                    ));
                }
                check_transform(path, single)
            }
            TransformKind::Translation { .. } | TransformKind::Rotation { .. } => {
                Err(NgffError::schema(
                    path,
                    format!(
                        "illegal transform combination [{}] (v0.6 allows [identity], [scale] or [sequence])",
                        single.tag()
                    ),
                ))
            }
        },
        other => Err(NgffError::schema(
            path,
            format!(
                "illegal transform combination {} (v0.6 datasets carry exactly one transform)",
                describe_tags(other.iter().map(Transform::tag))
            ),
        )),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub path: String,

    #[serde(rename = "coordinateTransformations")]
    pub coordinate_transformations: Vec<Transform>,
}

impl Dataset {
    pub fn new(path: impl Into<String>, transforms: Vec<Transform>) -> Result<Self, NgffError> {
        let dataset = Self {
            path: path.into(),
            coordinate_transformations: transforms,
        };
        dataset.check()?;
        Ok(dataset)
    }

    pub fn check(&self) -> Result<(), NgffError> {
        check_dataset_transforms(&self.path, &self.coordinate_transformations)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "coordinateSystems")]
    pub coordinate_systems: Vec<CoordinateSystem>,

    pub datasets: Vec<Dataset>,

    #[serde(rename = "coordinateTransformations")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate_transformations: Option<Vec<Transform>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,

    #[serde(rename = "type")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downscaling_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MethodMetadata>,
}

impl Metadata {
    pub fn new(
        coordinate_systems: Vec<CoordinateSystem>,
        datasets: Vec<Dataset>,
    ) -> Result<Self, NgffError> {
        let metadata = Self {
            coordinate_systems,
            datasets,
            coordinate_transformations: None,
            name: None,
            labels: None,
            downscaling_type: None,
            metadata: None,
        };
        metadata.validate()?;
        Ok(metadata)
    }

    pub fn with_coordinate_transformations(
        mut self,
        transforms: Vec<Transform>,
    ) -> Result<Self, NgffError> {
        self.coordinate_transformations = Some(transforms);
        self.validate()?;
        Ok(self)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn with_downscaling_type(mut self, downscaling_type: impl Into<String>) -> Self {
        self.downscaling_type = Some(downscaling_type.into());
        self
    }

    pub fn with_method_metadata(mut self, metadata: MethodMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Looks up a declared coordinate system by name.
    pub fn coordinate_system(&self, name: &str) -> Option<&CoordinateSystem> {
        self.coordinate_systems.iter().find(|cs| cs.name == name)
    }

    pub fn validate(&self) -> Result<(), NgffError> {
        if self.coordinate_systems.is_empty() {
            return Err(NgffError::schema(
                "coordinateSystems",
                "coordinateSystems must not be empty",
            ));
        }
        let mut seen = HashSet::new();
        for system in &self.coordinate_systems {
            if !seen.insert(system.name.as_str()) {
                return Err(NgffError::schema(
                    "coordinateSystems",
                    format!("duplicate coordinate system name '{}'", system.name),
                ));
            }
        }

        if self.datasets.is_empty() {
            return Err(NgffError::schema("datasets", "datasets must not be empty"));
        }
        for dataset in &self.datasets {
            dataset.check()?;
        }

        self.coordinate_transformations
            .iter()
            .flatten()
            .try_for_each(|t| check_transform("coordinateTransformations", t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physical() -> CoordinateSystem {
        CoordinateSystem::new(
            "physical",
            vec![Axis::new("z"), Axis::new("y"), Axis::new("x")],
        )
    }

    #[test]
    fn sequence_serializes_with_endpoints() {
        let transform = Transform::sequence(vec![
            Transform::scale([2.0, 1.0, 1.0]),
            Transform::translation([0.0, 0.0, 0.0]),
        ])
        .with_name("scale0_to_physical")
        .with_input("0")
        .with_output("physical");

        let value = serde_json::to_value(&transform).unwrap();
        assert_eq!(value["type"], "sequence");
        assert_eq!(value["name"], "scale0_to_physical");
        assert_eq!(value["input"], "0");
        assert_eq!(value["output"], "physical");
        assert_eq!(value["transformations"][1]["type"], "translation");
        assert!(value["transformations"][0].get("name").is_none());
    }

    #[test]
    fn parses_inline_coordinate_system_reference() {
        let json = r#"{
            "type": "scale",
            "scale": [1.0, 2.0],
            "output": {"name": "world", "axes": [{"name": "y"}, {"name": "x"}]}
        }"#;
        let transform: Transform = serde_json::from_str(json).unwrap();
        match &transform.output {
            Some(CoordinateSystemRef::Inline(system)) => {
                assert_eq!(system.name, "world");
                assert_eq!(system.axes.len(), 2);
            }
            other => panic!("unexpected output: {other:?}"),
        }
        assert_eq!(transform.output.as_ref().map(|o| o.name()), Some("world"));
    }

    #[test]
    fn identity_parses_alongside_endpoints() {
        let json = r#"{"type": "identity", "input": "0", "output": "physical"}"#;
        let transform: Transform = serde_json::from_str(json).unwrap();
        assert_eq!(transform.kind, TransformKind::Identity);
        assert_eq!(transform.input, Some("0".into()));
    }

    #[test]
    fn rejects_lone_translation_dataset() {
        let err = Dataset::new("0", vec![Transform::translation([1.0, 1.0, 1.0])]).unwrap_err();
        assert!(matches!(err, NgffError::SchemaViolation { ref reason, .. } if reason.contains("[translation]")));
    }

    #[test]
    fn rejects_nested_dataset_sequence() {
        let nested = Transform::sequence(vec![Transform::sequence(vec![Transform::scale([
            1.0, 1.0, 1.0,
        ])])]);
        assert!(Dataset::new("0", vec![nested]).is_err());
    }

    #[test]
    fn rejects_empty_sequence() {
        assert!(Dataset::new("0", vec![Transform::sequence(vec![])]).is_err());
    }

    #[test]
    fn rejects_non_square_rotation() {
        let rotation = Transform::rotation(vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]);
        let dataset = Dataset::new("0", vec![Transform::sequence(vec![rotation])]);
        assert!(matches!(dataset, Err(NgffError::SchemaViolation { .. })));
    }

    #[test]
    fn rejects_empty_coordinate_systems() {
        let dataset = Dataset::new("0", vec![Transform::identity()]).unwrap();
        let err = Metadata::new(Vec::new(), vec![dataset]).unwrap_err();
        assert!(
            matches!(err, NgffError::SchemaViolation { ref path, .. } if path == "coordinateSystems")
        );
    }

    #[test]
    fn rejects_duplicate_coordinate_system_names() {
        let dataset = Dataset::new("0", vec![Transform::identity()]).unwrap();
        let err = Metadata::new(vec![physical(), physical()], vec![dataset]).unwrap_err();
        assert!(
            matches!(err, NgffError::SchemaViolation { ref path, .. } if path == "coordinateSystems")
        );
    }

    #[test]
    fn primitive_count_walks_sequences() {
        let transform = Transform::sequence(vec![
            Transform::scale([1.0]),
            Transform::sequence(vec![Transform::translation([1.0]), Transform::identity()]),
        ]);
        assert_eq!(transform.primitive_count(), 3);
    }
}
