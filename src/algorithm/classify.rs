//! Reference-band classification
//!
//! Places a value into one of five clinical tiers. For higher-is-better
//! indicators the two high tiers read as favorable (`good`, `excellent`)
//! instead of adverse.

use std::fmt;

use serde::Serialize;

use crate::config::{Polarity, PolarityRules};
use crate::models::table::CellValue;
use crate::reference::{ThresholdBand, ThresholdTable};

/// Outcome of classifying one value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No band for the indicator, or no usable value
    Missing,
    /// Below the low range
    SevereLow,
    /// Below the normal range
    Low,
    /// Within the normal range
    Normal,
    /// Above the normal range
    High,
    /// Above the normal range, favorable
    Good,
    /// Above the high range
    SevereHigh,
    /// Above the high range, favorable
    Excellent,
}

impl Verdict {
    /// Machine label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::SevereLow => "severe_low",
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Good => "good",
            Self::SevereHigh => "severe_high",
            Self::Excellent => "excellent",
        }
    }

    /// Display name
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Missing => "No Data",
            Self::SevereLow => "Severe Low",
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
            Self::Good => "Good",
            Self::SevereHigh => "Severe High",
            Self::Excellent => "Excellent",
        }
    }

    /// Signed distance from normal: -2 severe low through 2 severe high
    #[must_use]
    pub const fn severity_rank(self) -> Option<i8> {
        match self {
            Self::Missing => None,
            Self::SevereLow => Some(-2),
            Self::Low => Some(-1),
            Self::Normal => Some(0),
            Self::High | Self::Good => Some(1),
            Self::SevereHigh | Self::Excellent => Some(2),
        }
    }

    /// Whether the verdict is normal or better
    #[must_use]
    pub const fn is_favorable(self) -> bool {
        matches!(self, Self::Normal | Self::Good | Self::Excellent)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Verdict together with its severity rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Verdict
    pub verdict: Verdict,
    /// Severity rank, `None` when missing
    pub severity_rank: Option<i8>,
}

impl From<Verdict> for Classification {
    fn from(verdict: Verdict) -> Self {
        Self {
            verdict,
            severity_rank: verdict.severity_rank(),
        }
    }
}

/// Classify a value against one band
///
/// Cut points are checked from the outside in; absent cut points never fire.
#[must_use]
pub fn classify_band(value: f64, band: &ThresholdBand, polarity: Polarity) -> Verdict {
    if value.is_nan() {
        return Verdict::Missing;
    }
    let favorable_high = polarity == Polarity::HigherIsBetter;

    if band.low_1.is_some_and(|cut| value < cut) {
        Verdict::SevereLow
    } else if band.low_2.is_some_and(|cut| value < cut) {
        Verdict::Low
    } else if band.high_1.is_some_and(|cut| value > cut) {
        if favorable_high { Verdict::Excellent } else { Verdict::SevereHigh }
    } else if band.high_2.is_some_and(|cut| value > cut) {
        if favorable_high { Verdict::Good } else { Verdict::High }
    } else {
        Verdict::Normal
    }
}

/// Classify a numeric value of an indicator
#[must_use]
pub fn classify_value(
    indicator: &str,
    value: f64,
    thresholds: &ThresholdTable,
    polarity: &PolarityRules,
) -> Classification {
    let verdict = thresholds.get(indicator).map_or(Verdict::Missing, |band| {
        classify_band(value, band, polarity.classification_polarity(indicator))
    });
    verdict.into()
}

/// Classify a raw cell of an indicator; non-numeric cells are missing
#[must_use]
pub fn classify(
    indicator: &str,
    cell: &CellValue,
    thresholds: &ThresholdTable,
    polarity: &PolarityRules,
) -> Classification {
    match cell.as_f64() {
        Some(value) => classify_value(indicator, value, thresholds, polarity),
        None => Verdict::Missing.into(),
    }
}
