//! Latest-test indicator panel for one subject

use chrono::NaiveDate;
use serde::Serialize;

use crate::algorithm::classify::{Classification, Verdict, classify_value};
use crate::config::{PanelTheme, PolarityRules};
use crate::models::observations::Observations;
use crate::reference::ThresholdTable;
use crate::resolve::IndicatorResolver;

/// Placeholder for absent values and ranges
const EMPTY_MARK: &str = "—";

/// Format a value with precision scaled to its magnitude
#[must_use]
pub fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1000.0 {
        format!("{value:.0}")
    } else if magnitude >= 100.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

/// One indicator on the latest test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    /// Requested indicator
    pub indicator: String,
    /// Column it resolved to
    pub column: String,
    /// Latest value, if recorded
    pub value: Option<f64>,
    /// Formatted value, `—` when absent
    pub display_value: String,
    /// Formatted normal range, `—` when the indicator has no band
    pub normal_range: String,
    /// Verdict and rank
    pub classification: Classification,
}

/// Row for `indicator` on history row `row`, or `None` when it has no column
fn summary_row(
    history: &Observations,
    row: usize,
    indicator: &str,
    resolver: &IndicatorResolver,
    thresholds: &ThresholdTable,
    polarity: &PolarityRules,
) -> Option<SummaryRow> {
    let columns = history.table().columns();
    let column_idx = resolver.resolve_in(columns, indicator)?;
    let value = history.table().row(row)?[column_idx].as_f64();
    let classification = value.map_or_else(
        || Verdict::Missing.into(),
        |v| classify_value(indicator, v, thresholds, polarity),
    );

    Some(SummaryRow {
        indicator: indicator.to_string(),
        column: columns[column_idx].clone(),
        value,
        display_value: value.map_or_else(|| EMPTY_MARK.to_string(), format_value),
        normal_range: thresholds
            .get(indicator)
            .map_or_else(|| EMPTY_MARK.to_string(), |band| band.normal_range_display()),
        classification,
    })
}

/// Latest-test panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSummary {
    /// Subject name
    pub subject: String,
    /// Date of the latest test
    pub date: NaiveDate,
    /// Rows for resolved indicators, in request order
    pub rows: Vec<SummaryRow>,
    /// Indicators with no column in the table
    pub missing: Vec<String>,
}

impl IndicatorSummary {
    /// Summarise the last row of a date-ordered subject history
    ///
    /// Returns `None` for an empty history.
    #[must_use]
    pub fn build<S: AsRef<str>>(
        history: &Observations,
        indicators: &[S],
        resolver: &IndicatorResolver,
        thresholds: &ThresholdTable,
        polarity: &PolarityRules,
    ) -> Option<Self> {
        let last = history.len().checked_sub(1)?;
        let subject = history.subject(last)?.to_string();
        let date = history.date(last)?;

        let mut rows = Vec::with_capacity(indicators.len());
        let mut missing = Vec::new();

        for indicator in indicators {
            let indicator = indicator.as_ref();
            match summary_row(history, last, indicator, resolver, thresholds, polarity) {
                Some(row) => rows.push(row),
                None => missing.push(indicator.to_string()),
            }
        }

        Some(Self {
            subject,
            date,
            rows,
            missing,
        })
    }

    /// Rows whose verdict is not normal or better
    pub fn flagged(&self) -> impl Iterator<Item = &SummaryRow> {
        self.rows.iter().filter(|row| {
            row.classification.verdict != Verdict::Missing && !row.classification.verdict.is_favorable()
        })
    }
}

/// One category of a themed panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    /// Category heading
    pub title: String,
    /// Rows for resolved indicators, in category order
    pub rows: Vec<SummaryRow>,
}

/// Latest-test panel grouped by the categories of a theme
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeSummary {
    /// Theme name
    pub theme: String,
    /// Subject name
    pub subject: String,
    /// Date of the latest test
    pub date: NaiveDate,
    /// Categories in theme order
    pub categories: Vec<CategorySummary>,
    /// Theme indicators with no column in the table, each listed once
    pub missing: Vec<String>,
}

impl ThemeSummary {
    /// Summarise the last row of a date-ordered subject history by theme
    ///
    /// Returns `None` for an empty history.
    #[must_use]
    pub fn build(
        history: &Observations,
        theme: &PanelTheme,
        resolver: &IndicatorResolver,
        thresholds: &ThresholdTable,
        polarity: &PolarityRules,
    ) -> Option<Self> {
        let last = history.len().checked_sub(1)?;
        let subject = history.subject(last)?.to_string();
        let date = history.date(last)?;

        let mut missing: Vec<String> = Vec::new();
        let categories = theme
            .categories
            .iter()
            .map(|category| {
                let mut rows = Vec::with_capacity(category.indicators.len());
                for indicator in &category.indicators {
                    match summary_row(history, last, indicator, resolver, thresholds, polarity) {
                        Some(row) => rows.push(row),
                        None if !missing.contains(indicator) => missing.push(indicator.clone()),
                        None => {}
                    }
                }
                CategorySummary {
                    title: category.title.clone(),
                    rows,
                }
            })
            .collect();

        Some(Self {
            theme: theme.name.clone(),
            subject,
            date,
            categories,
            missing,
        })
    }

    /// All rows across categories
    pub fn rows(&self) -> impl Iterator<Item = &SummaryRow> {
        self.categories.iter().flat_map(|category| category.rows.iter())
    }
}
