//! Cohort-relative standardized scores
//!
//! Baselines are computed per indicator over a comparison cohort (each
//! member's most recent observations). Scores are oriented so that positive
//! is always favorable: lower-is-better indicators are negated.

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::config::PolarityRules;
use crate::models::table::Table;
use crate::reference::ThresholdBand;
use crate::resolve::IndicatorResolver;

/// Cohort mean and spread of one indicator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineStat {
    /// Mean of the cohort values
    pub mean: f64,
    /// Sample standard deviation, or 1 when fewer than two samples exist
    pub std_dev: f64,
    /// Number of non-missing cohort values
    pub samples: usize,
}

impl BaselineStat {
    /// Statistics over the given values
    ///
    /// Two or more samples give the sample mean and sample standard deviation.
    /// A single sample is its own mean with unit spread; no samples give a
    /// zero mean with unit spread.
    #[must_use]
    pub fn from_samples(values: &[f64]) -> Self {
        let samples = values.len();
        match samples {
            0 => Self {
                mean: 0.0,
                std_dev: 1.0,
                samples,
            },
            1 => Self {
                mean: values[0],
                std_dev: 1.0,
                samples,
            },
            _ => {
                let n = samples as f64;
                let mean = values.iter().sum::<f64>() / n;
                let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
                Self {
                    mean,
                    std_dev: variance.sqrt(),
                    samples,
                }
            }
        }
    }

    /// Raw Z-score; zero when the spread is zero
    #[must_use]
    pub fn standardize(&self, value: f64) -> f64 {
        if self.std_dev == 0.0 || !self.std_dev.is_finite() {
            0.0
        } else {
            (value - self.mean) / self.std_dev
        }
    }
}

/// Normal range expressed in Z space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZInterval {
    /// Lower edge
    pub lower: Option<f64>,
    /// Upper edge
    pub upper: Option<f64>,
}

/// Per-indicator baselines of a comparison cohort
#[derive(Debug, Clone, Default)]
pub struct CohortBaseline {
    stats: FxHashMap<String, BaselineStat>,
}

impl CohortBaseline {
    /// Compute baselines for `indicators` over a cohort table
    ///
    /// Indicators that cannot be resolved in the cohort get the empty-cohort
    /// baseline. Indicators are processed in parallel.
    #[must_use]
    pub fn compute<S: AsRef<str> + Sync>(
        cohort: &Table,
        indicators: &[S],
        resolver: &IndicatorResolver,
    ) -> Self {
        let stats = indicators
            .par_iter()
            .map(|indicator| {
                let indicator = indicator.as_ref();
                let values = resolver
                    .resolve(cohort, indicator)
                    .map(|column| cohort.numeric_values(column))
                    .unwrap_or_default();
                (indicator.to_string(), BaselineStat::from_samples(&values))
            })
            .collect();
        Self { stats }
    }

    /// Baseline of an indicator
    #[must_use]
    pub fn stat(&self, indicator: &str) -> Option<&BaselineStat> {
        self.stats.get(indicator)
    }

    /// Number of indicators with a baseline
    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Whether no baselines were computed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Polarity-adjusted Z-score; zero for a missing value or baseline
    #[must_use]
    pub fn zscore(&self, indicator: &str, value: Option<f64>, polarity: &PolarityRules) -> f64 {
        let z = match (self.stat(indicator), value) {
            (Some(stat), Some(value)) if !value.is_nan() => stat.standardize(value),
            _ => 0.0,
        };
        if polarity.is_lower_better(indicator) { -z } else { z }
    }

    /// The band's normal range in the same oriented Z space as [`Self::zscore`]
    #[must_use]
    pub fn normal_band_z(
        &self,
        indicator: &str,
        band: &ThresholdBand,
        polarity: &PolarityRules,
    ) -> Option<ZInterval> {
        let stat = self.stat(indicator)?;
        let orient = |z: f64| if polarity.is_lower_better(indicator) { -z } else { z };
        let low = band.low_2.map(|v| orient(stat.standardize(v)));
        let high = band.high_2.map(|v| orient(stat.standardize(v)));

        // Negation swaps which edge is lower
        let interval = match (low, high) {
            (Some(a), Some(b)) => ZInterval {
                lower: Some(a.min(b)),
                upper: Some(a.max(b)),
            },
            (a, b) if polarity.is_lower_better(indicator) => ZInterval { lower: b, upper: a },
            (a, b) => ZInterval { lower: a, upper: b },
        };
        Some(interval)
    }
}

impl FromIterator<(String, BaselineStat)> for CohortBaseline {
    fn from_iter<I: IntoIterator<Item = (String, BaselineStat)>>(iter: I) -> Self {
        Self {
            stats: iter.into_iter().collect(),
        }
    }
}
