//! Measure and sex vocabularies
//!
//! The WHO publishes one reference table per (measure, sex) combination. Both
//! selectors are closed enums so that an unrecognized selection can never reach
//! the engine; free-text input is parsed and validated at the system boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GrowthError;

/// Anthropometric measure tracked against a growth standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measure {
    /// Body weight
    Weight,
    /// Body height / length
    Height,
    /// Head circumference
    HeadCircumference,
}

/// Sex of the child, selecting the boys' or girls' reference table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Boys' tables
    Male,
    /// Girls' tables
    Female,
}

/// Static configuration for one measure
///
/// Replaces the per-measure lookup dictionaries of the original application
/// with a single record, constructed once and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureInfo {
    /// Code used in the WHO reference table file names (e.g. "wfa")
    pub file_code: &'static str,
    /// Unit label for presentation
    pub unit_label: &'static str,
    /// Prompt text for a single-value calculator
    pub prompt: &'static str,
    /// Column key in uploaded observation files
    pub column: &'static str,
}

static WEIGHT_INFO: MeasureInfo = MeasureInfo {
    file_code: "wfa",
    unit_label: "kg.",
    prompt: "Enter the child's weight",
    column: "w",
};

static HEIGHT_INFO: MeasureInfo = MeasureInfo {
    file_code: "lhfa",
    unit_label: "cm.",
    prompt: "Enter the child's height",
    column: "h",
};

static HEAD_CIRCUMFERENCE_INFO: MeasureInfo = MeasureInfo {
    file_code: "hcfa",
    unit_label: "cm.",
    prompt: "Enter the child's head circumference",
    column: "hc",
};

impl Measure {
    /// All measures, in presentation order
    pub const ALL: [Self; 3] = [Self::Weight, Self::Height, Self::HeadCircumference];

    /// Static metadata for this measure
    #[must_use]
    pub fn info(self) -> &'static MeasureInfo {
        match self {
            Self::Weight => &WEIGHT_INFO,
            Self::Height => &HEIGHT_INFO,
            Self::HeadCircumference => &HEAD_CIRCUMFERENCE_INFO,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weight => write!(f, "Weight"),
            Self::Height => write!(f, "Height"),
            Self::HeadCircumference => write!(f, "Head Circumference"),
        }
    }
}

impl FromStr for Measure {
    type Err = GrowthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weight" | "wfa" | "w" => Ok(Self::Weight),
            "height" | "length" | "lhfa" | "h" => Ok(Self::Height),
            "head-circumference" | "head_circumference" | "hcfa" | "hc" => {
                Ok(Self::HeadCircumference)
            }
            other => Err(GrowthError::InvalidParameter(format!(
                "unknown measure '{other}', expected weight, height or head-circumference"
            ))),
        }
    }
}

impl Sex {
    /// Code used in the WHO reference table file names
    #[must_use]
    pub const fn table_code(self) -> &'static str {
        match self {
            Self::Male => "boys",
            Self::Female => "girls",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
        }
    }
}

impl FromStr for Sex {
    type Err = GrowthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "boys" | "boy" | "m" => Ok(Self::Male),
            "female" | "girls" | "girl" | "f" => Ok(Self::Female),
            other => Err(GrowthError::InvalidParameter(format!(
                "unknown sex '{other}', expected male or female"
            ))),
        }
    }
}
