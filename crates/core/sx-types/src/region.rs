//! Search API deployment regions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use sx_error::SxError;

/// A search API deployment.
///
/// `Prod` is the original US deployment and has no region segment in its
/// hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Prod,
    Us2,
    Au,
    De,
    Eu,
    Jp,
}

impl Region {
    /// Every supported region.
    pub const ALL: [Region; 6] = [
        Region::Prod,
        Region::Us2,
        Region::Au,
        Region::De,
        Region::Eu,
        Region::Jp,
    ];

    /// The identifier used in step input (`endpoint` field).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prod => "prod",
            Self::Us2 => "us2",
            Self::Au => "au",
            Self::De => "de",
            Self::Eu => "eu",
            Self::Jp => "jp",
        }
    }

    /// Hostname segment inserted after `api`, empty for `prod`.
    pub fn host_segment(&self) -> String {
        match self {
            Self::Prod => String::new(),
            other => format!(".{}", other.as_str()),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = SxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|region| region.as_str() == s)
            .ok_or_else(|| SxError::InvalidRegion(s.to_string()))
    }
}
