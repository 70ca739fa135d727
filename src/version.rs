//! NGFF schema revision identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NgffError;

/// One of the NGFF schema revisions this crate models.
///
/// Serializes as the literal version string (`"0.4"`, `"0.5"`, `"0.6"`)
/// found in the `version` field of a metadata document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NgffVersion {
    #[serde(rename = "0.4")]
    V04,
    #[serde(rename = "0.5")]
    V05,
    #[serde(rename = "0.6")]
    V06,
}

impl NgffVersion {
    /// The newest revision modelled.
    pub const LATEST: NgffVersion = NgffVersion::V06;

    /// All revisions, oldest first.
    pub const ALL: [NgffVersion; 3] = [NgffVersion::V04, NgffVersion::V05, NgffVersion::V06];

    /// The literal version string used in documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            NgffVersion::V04 => "0.4",
            NgffVersion::V05 => "0.5",
            NgffVersion::V06 => "0.6",
        }
    }

    /// Returns true if a direct converter exists between `self` and `other`.
    pub fn is_adjacent(&self, other: NgffVersion) -> bool {
        matches!(
            (self, other),
            (NgffVersion::V04, NgffVersion::V05)
                | (NgffVersion::V05, NgffVersion::V04)
                | (NgffVersion::V05, NgffVersion::V06)
                | (NgffVersion::V06, NgffVersion::V05)
        )
    }
}

impl fmt::Display for NgffVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NgffVersion {
    type Err = NgffError;

    /// Accepts the literal (`0.5`) and symbolic forms (`v0.5`, `V05`, `v05`),
    /// plus `latest`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("latest") {
            return Ok(NgffVersion::LATEST);
        }

        let bare = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        match bare {
            "0.4" | "04" => Ok(NgffVersion::V04),
            "0.5" | "05" => Ok(NgffVersion::V05),
            "0.6" | "06" => Ok(NgffVersion::V06),
            _ => Err(NgffError::UnknownVersion(s.to_string())),
        }
    }
}
