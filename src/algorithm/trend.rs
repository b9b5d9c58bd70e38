//! Chart-ready trend series for one indicator across several subjects

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;

use crate::models::observations::Observations;
use crate::reference::ThresholdBand;
use crate::resolve::IndicatorResolver;

/// One plotted value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Position of `date` on the shared date axis
    pub index: usize,
    /// Test date
    pub date: NaiveDate,
    /// Indicator value
    pub value: f64,
}

/// Points of one subject, ordered by date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectSeries {
    /// Subject name
    pub subject: String,
    /// Points
    pub points: Vec<TrendPoint>,
}

/// Trend of one indicator for several subjects on a shared date axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    /// Requested indicator
    pub indicator: String,
    /// Column it resolved to
    pub column: String,
    /// Sorted union of dates on which any selected subject has a value
    pub dates: Vec<NaiveDate>,
    /// One series per selected subject with data, in selection order
    pub series: Vec<SubjectSeries>,
    /// Normal range `(low, high)` when both bounds exist
    pub normal_band: Option<(f64, f64)>,
}

/// Build the trend of `indicator` for `subjects` within an optional date range
///
/// Returns `None` when the indicator cannot be resolved or no selected subject
/// has a value in range.
#[must_use]
pub fn trend_series<S: AsRef<str>>(
    observations: &Observations,
    indicator: &str,
    subjects: &[S],
    range: (Option<NaiveDate>, Option<NaiveDate>),
    resolver: &IndicatorResolver,
    band: Option<&ThresholdBand>,
) -> Option<TrendSeries> {
    let in_range = observations.within_dates(range.0, range.1);
    let column = resolver.resolve(in_range.table(), indicator)?.to_string();
    let column_idx = in_range.table().column_index(&column)?;

    let value_at = |row: usize| -> Option<f64> { in_range.table().row(row)?[column_idx].as_f64() };

    let per_subject: Vec<(String, Vec<(NaiveDate, f64)>)> = subjects
        .iter()
        .map(|subject| {
            let subject = subject.as_ref();
            let points: Vec<(NaiveDate, f64)> = (0..in_range.len())
                .filter(|&row| in_range.subject(row) == Some(subject))
                .filter_map(|row| Some((in_range.date(row)?, value_at(row)?)))
                .sorted_by_key(|(date, _)| *date)
                .collect();
            (subject.to_string(), points)
        })
        .filter(|(_, points)| !points.is_empty())
        .collect();

    let dates: Vec<NaiveDate> = per_subject
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(date, _)| *date))
        .sorted()
        .dedup()
        .collect();
    if dates.is_empty() {
        return None;
    }

    let series = per_subject
        .into_iter()
        .map(|(subject, points)| SubjectSeries {
            subject,
            points: points
                .into_iter()
                .filter_map(|(date, value)| {
                    let index = dates.binary_search(&date).ok()?;
                    Some(TrendPoint { index, date, value })
                })
                .collect(),
        })
        .collect();

    let normal_band = band.and_then(|band| band.low_2.zip(band.high_2));

    Some(TrendSeries {
        indicator: indicator.to_string(),
        column,
        dates,
        series,
        normal_band,
    })
}
