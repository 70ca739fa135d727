use serde::{Deserialize, Serialize};

// https://ngff.openmicroscopy.org/0.4/#axes-md

/// One dimension of the image grid.
///
/// `type` and `unit` are free-form strings; the known vocabularies
/// (`space`/`time`/`channel`, SI length and time units) are not enforced.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Axis {
    pub name: String,

    #[serde(rename = "type")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Axis {
    /// Creates an axis with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            axis_type: None,
            unit: None,
        }
    }

    /// Creates a `type: space` axis with an optional unit.
    pub fn space(name: impl Into<String>, unit: Option<&str>) -> Self {
        Self {
            name: name.into(),
            axis_type: Some("space".to_string()),
            unit: unit.map(str::to_string),
        }
    }

    /// Sets the axis type.
    pub fn with_type(mut self, axis_type: impl Into<String>) -> Self {
        self.axis_type = Some(axis_type.into());
        self
    }

    /// Sets the axis unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}
