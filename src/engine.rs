//! Session facade
//!
//! `Engine` owns the immutable configuration of one analysis session: engine
//! settings, the indicator resolver and the per-sex reference ranges. It is
//! `Send + Sync` and may be shared across threads.

use chrono::NaiveDate;
use log::info;

use crate::algorithm::classify::{Classification, classify};
use crate::algorithm::profile::{RadarProfile, build_profile};
use crate::algorithm::summary::{IndicatorSummary, ThemeSummary};
use crate::algorithm::trend::{TrendSeries, trend_series};
use crate::algorithm::zscore::{CohortBaseline, ZInterval};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::fusion::{FusionOutcome, fuse};
use crate::models::observations::Observations;
use crate::models::sheet::Sheet;
use crate::models::table::{CellValue, Table};
use crate::models::types::Sex;
use crate::reference::{ReferenceRanges, ThresholdTable};
use crate::resolve::{AliasTable, IndicatorResolver};

/// Indicator resolution, fusion, classification and scoring for one session
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    resolver: IndicatorResolver,
    ranges: ReferenceRanges,
}

impl Engine {
    /// Engine with the bundled alias table and reference ranges
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_reference_override(config, None)
    }

    /// Engine using an override reference table, if it loads
    #[must_use]
    pub fn with_reference_override(config: EngineConfig, reference: Option<&Table>) -> Self {
        let ranges = ReferenceRanges::load_or_bundled(reference, &config.reference_columns);
        let resolver = IndicatorResolver::new(AliasTable::bundled(), config.fuzzy);
        info!("Engine ready with {ranges}");
        Self {
            config,
            resolver,
            ranges,
        }
    }

    /// Replace the alias table
    #[must_use]
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.resolver = IndicatorResolver::new(aliases, self.config.fuzzy);
        self
    }

    /// Engine settings
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Indicator resolver
    #[must_use]
    pub const fn resolver(&self) -> &IndicatorResolver {
        &self.resolver
    }

    /// Reference ranges in use
    #[must_use]
    pub const fn ranges(&self) -> &ReferenceRanges {
        &self.ranges
    }

    /// Reference thresholds for a sex
    #[must_use]
    pub fn thresholds(&self, sex: Sex) -> &ThresholdTable {
        self.ranges.for_sex(sex)
    }

    /// Column holding `indicator` in `table`
    #[must_use]
    pub fn resolve<'t>(&self, table: &'t Table, indicator: &str) -> Option<&'t str> {
        self.resolver.resolve(table, indicator)
    }

    /// Fuse a primary table with secondary sheets
    #[must_use]
    pub fn fuse(&self, primary: Table, secondary: &[Sheet]) -> FusionOutcome {
        fuse(primary, secondary, &self.config)
    }

    /// Fuse a primary sheet with secondary sheets
    ///
    /// Only a malformed primary sheet is an error; secondaries are skipped.
    pub fn fuse_sheets(&self, primary: &Sheet, secondary: &[Sheet]) -> Result<FusionOutcome> {
        Ok(self.fuse(primary.to_table()?, secondary))
    }

    /// Clean a fused table into observations
    pub fn prepare(&self, table: Table) -> Result<Observations> {
        Observations::prepare(table, &self.config)
    }

    /// Classify a cell of `indicator` for a subject of the given sex
    #[must_use]
    pub fn classify(&self, indicator: &str, value: &CellValue, sex: Sex) -> Classification {
        classify(indicator, value, self.thresholds(sex), &self.config.polarity)
    }

    /// Baselines over the latest `baseline_window` observations of each cohort member
    #[must_use]
    pub fn baseline<S: AsRef<str>, I: AsRef<str> + Sync>(
        &self,
        observations: &Observations,
        cohort: &[S],
        indicators: &[I],
    ) -> CohortBaseline {
        let window = observations.baseline_cohort(cohort, self.config.baseline_window);
        CohortBaseline::compute(window.table(), indicators, &self.resolver)
    }

    /// Polarity-adjusted Z-score of a value against a baseline
    #[must_use]
    pub fn zscore(&self, baseline: &CohortBaseline, indicator: &str, value: Option<f64>) -> f64 {
        baseline.zscore(indicator, value, &self.config.polarity)
    }

    /// Normal range of `indicator` for a sex, in the baseline's Z space
    #[must_use]
    pub fn normal_band_z(
        &self,
        baseline: &CohortBaseline,
        indicator: &str,
        sex: Sex,
    ) -> Option<ZInterval> {
        let band = self.thresholds(sex).get(indicator)?;
        baseline.normal_band_z(indicator, band, &self.config.polarity)
    }

    /// Latest-test panel of a subject over the configured panel indicators
    #[must_use]
    pub fn summary(&self, observations: &Observations, subject: &str) -> Option<IndicatorSummary> {
        self.summary_for(observations, subject, self.config.panel_indicators.as_slice())
    }

    /// Latest-test panel of a subject over the given indicators
    #[must_use]
    pub fn summary_for<S: AsRef<str>>(
        &self,
        observations: &Observations,
        subject: &str,
        indicators: &[S],
    ) -> Option<IndicatorSummary> {
        let history = observations.subject_history(subject);
        let sex = observations.sex_of(subject);
        IndicatorSummary::build(
            &history,
            indicators,
            &self.resolver,
            self.thresholds(sex),
            &self.config.polarity,
        )
    }

    /// Latest-test panel of a subject for the configured theme `name`
    #[must_use]
    pub fn theme_summary(
        &self,
        observations: &Observations,
        subject: &str,
        name: &str,
    ) -> Option<ThemeSummary> {
        let theme = self.config.panel_theme(name)?;
        let history = observations.subject_history(subject);
        let sex = observations.sex_of(subject);
        ThemeSummary::build(
            &history,
            theme,
            &self.resolver,
            self.thresholds(sex),
            &self.config.polarity,
        )
    }

    /// Latest-test panels of a subject for every configured theme
    #[must_use]
    pub fn theme_summaries(&self, observations: &Observations, subject: &str) -> Vec<ThemeSummary> {
        let history = observations.subject_history(subject);
        let thresholds = self.thresholds(observations.sex_of(subject));
        self.config
            .panel_themes
            .iter()
            .filter_map(|theme| {
                ThemeSummary::build(&history, theme, &self.resolver, thresholds, &self.config.polarity)
            })
            .collect()
    }

    /// Trend of one indicator for several subjects within an inclusive date range
    #[must_use]
    pub fn trend<S: AsRef<str>>(
        &self,
        observations: &Observations,
        indicator: &str,
        subjects: &[S],
        range: (Option<NaiveDate>, Option<NaiveDate>),
        sex: Sex,
    ) -> Option<TrendSeries> {
        trend_series(
            observations,
            indicator,
            subjects,
            range,
            &self.resolver,
            self.thresholds(sex).get(indicator),
        )
    }

    /// Radar profile of a subject against a comparison cohort
    ///
    /// The baseline covers the configured profile indicators over each cohort
    /// member's latest observations; the subject is only part of the cohort
    /// when listed in `cohort`.
    #[must_use]
    pub fn profile<S: AsRef<str>>(
        &self,
        observations: &Observations,
        subject: &str,
        cohort: &[S],
    ) -> Option<RadarProfile> {
        let indicators = self.config.profile_indicators.as_slice();
        let baseline = self.baseline(observations, cohort, indicators);
        build_profile(
            &observations.subject_history(subject),
            indicators,
            &baseline,
            &self.resolver,
            &self.config.polarity,
            self.config.profile_window,
        )
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
