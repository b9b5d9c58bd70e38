//! Radar profiles: oriented Z-score vectors for a subject's recent tests

use chrono::NaiveDate;
use serde::Serialize;

use crate::algorithm::zscore::CohortBaseline;
use crate::config::PolarityRules;
use crate::models::observations::Observations;
use crate::resolve::IndicatorResolver;

/// Smallest radial axis limit
const MIN_AXIS_LIMIT: f64 = 2.5;

/// Oriented Z-scores of one test date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSnapshot {
    /// Test date
    pub date: NaiveDate,
    /// One score per profile indicator, in indicator order
    pub z_scores: Vec<f64>,
}

/// A subject's recent tests relative to a cohort baseline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarProfile {
    /// Subject name
    pub subject: String,
    /// Profile axes
    pub indicators: Vec<String>,
    /// Which axes are negated lower-is-better indicators
    pub inverted: Vec<bool>,
    /// Snapshots, oldest first
    pub snapshots: Vec<ProfileSnapshot>,
    /// Symmetric radial limit covering every score
    pub axis_limit: f64,
}

impl RadarProfile {
    /// Most recent snapshot
    #[must_use]
    pub fn latest(&self) -> Option<&ProfileSnapshot> {
        self.snapshots.last()
    }
}

/// Radial limit: at least 2.5, otherwise the largest magnitude rounded up to a half
#[must_use]
pub fn axis_limit(scores: impl IntoIterator<Item = f64>) -> f64 {
    let max_abs = scores.into_iter().map(f64::abs).fold(0.0, f64::max);
    MIN_AXIS_LIMIT.max((max_abs * 2.0).ceil() / 2.0)
}

/// Build the profile of a subject history over its last `window` test dates
///
/// `history` must hold one subject ordered by date. Returns `None` for an
/// empty history.
#[must_use]
pub fn build_profile<S: AsRef<str>>(
    history: &Observations,
    indicators: &[S],
    baseline: &CohortBaseline,
    resolver: &IndicatorResolver,
    polarity: &PolarityRules,
    window: usize,
) -> Option<RadarProfile> {
    let subject = history.subject(0)?.to_string();
    let dates = history.distinct_dates();
    let recent = &dates[dates.len().saturating_sub(window)..];

    let columns: Vec<Option<usize>> = indicators
        .iter()
        .map(|indicator| resolver.resolve_in(history.table().columns(), indicator.as_ref()))
        .collect();

    let snapshots: Vec<ProfileSnapshot> = recent
        .iter()
        .filter_map(|&date| {
            let row = history.table().row(history.first_row_on(date)?)?;
            let z_scores = indicators
                .iter()
                .zip(&columns)
                .map(|(indicator, column)| {
                    let value = column.and_then(|idx| row[idx].as_f64());
                    baseline.zscore(indicator.as_ref(), value, polarity)
                })
                .collect();
            Some(ProfileSnapshot { date, z_scores })
        })
        .collect();

    let limit = axis_limit(snapshots.iter().flat_map(|s| s.z_scores.iter().copied()));

    Some(RadarProfile {
        subject,
        indicators: indicators.iter().map(|i| i.as_ref().to_string()).collect(),
        inverted: indicators
            .iter()
            .map(|i| polarity.is_lower_better(i.as_ref()))
            .collect(),
        snapshots,
        axis_limit: limit,
    })
}
