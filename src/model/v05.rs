//! NGFF v0.5 multiscale metadata.
//!
//! Same layout as v0.4, with `identity` promoted to a declared transform.

use serde::{Deserialize, Serialize};

use super::{describe_tags, Axis, MethodMetadata};
use crate::error::NgffError;

/// A v0.5 coordinate transformation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Transform {
    Identity,
    Scale { scale: Vec<f64> },
    Translation { translation: Vec<f64> },
}

impl Transform {
    pub fn scale(scale: impl Into<Vec<f64>>) -> Self {
        Transform::Scale {
            scale: scale.into(),
        }
    }

    pub fn translation(translation: impl Into<Vec<f64>>) -> Self {
        Transform::Translation {
            translation: translation.into(),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Transform::Identity => "identity",
            Transform::Scale { .. } => "scale",
            Transform::Translation { .. } => "translation",
        }
    }

    pub fn values(&self) -> Option<&[f64]> {
        match self {
            Transform::Identity => None,
            Transform::Scale { scale } => Some(scale),
            Transform::Translation { translation } => Some(translation),
        }
    }
}

/// Checks a v0.5 transform list: `[identity]`, `[scale]` or
/// `[scale, translation]`.
pub(crate) fn check_transforms(path: &str, transforms: &[Transform]) -> Result<(), NgffError> {
    match transforms {
        [Transform::Identity]
        | [Transform::Scale { .. }]
        | [Transform::Scale { .. }, Transform::Translation { .. }] => Ok(()),
        [] => Err(NgffError::schema(
            path,
            "coordinateTransformations must not be empty",
        )),
        other => Err(NgffError::schema(
            path,
            format!(
                "illegal transform combination {} (v0.5 allows [identity], [scale] or [scale, translation])",
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
        check_transforms(&self.path, &self.coordinate_transformations)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub axes: Vec<Axis>,

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
    pub fn new(axes: Vec<Axis>, datasets: Vec<Dataset>) -> Result<Self, NgffError> {
        let metadata = Self {
            axes,
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

    pub fn validate(&self) -> Result<(), NgffError> {
        if self.datasets.is_empty() {
            return Err(NgffError::schema("datasets", "datasets must not be empty"));
        }
        for dataset in &self.datasets {
            dataset.check()?;
        }
        match &self.coordinate_transformations {
            Some(global) if !global.is_empty() => {
                check_transforms("coordinateTransformations", global)
            }
            _ => Ok(()),
        }
    }
}
