//! Common domain type definitions
//!
//! This module contains the small enum types shared by the observation,
//! reference and classification layers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sex of a tested subject, selecting which reference table applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male reference ranges
    Male,
    /// Female reference ranges
    Female,
    /// Unknown or not specified
    Unknown,
}

impl From<&str> for Sex {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" | "man" | "1" => Self::Male,
            "f" | "female" | "woman" | "2" => Self::Female,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Sex tag of a reference-range row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SexTag {
    /// Applies to male subjects
    Male,
    /// Applies to female subjects
    Female,
    /// Applies to both, unless a sex-specific row exists
    Common,
}

impl SexTag {
    /// Parse a reference-table sex label
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "common" | "both" | "all" | "any" => Some(Self::Common),
            other => match Sex::from(other) {
                Sex::Male => Some(Self::Male),
                Sex::Female => Some(Self::Female),
                Sex::Unknown => None,
            },
        }
    }
}
