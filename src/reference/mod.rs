//! Reference-range tables
//!
//! Each sex maps indicator names to a six-cut-point `ThresholdBand`. Tables
//! come from the bundled defaults or from an uploaded override table; a
//! malformed override degrades to the bundled defaults.

pub mod defaults;
pub mod range_spec;

use std::fmt;

use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use crate::config::ReferenceColumns;
use crate::error::{BloodworkError, Result};
use crate::models::table::Table;
use crate::models::types::{Sex, SexTag};

pub use defaults::{DEFAULT_REFERENCE_ROWS, DEFAULT_REFERENCE_VERSION};
pub use range_spec::RangeSpec;

/// Six optional cut points, ordered from the severe-low edge upwards
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThresholdBand {
    /// Severe-low cut point
    pub severe_low_1: Option<f64>,
    /// Values below are severe low
    pub low_1: Option<f64>,
    /// Values below are low (normal lower bound)
    pub low_2: Option<f64>,
    /// Values above are high (normal upper bound)
    pub high_2: Option<f64>,
    /// Values above are severe high
    pub high_1: Option<f64>,
    /// Severe-high cut point
    pub severe_high_1: Option<f64>,
}

impl ThresholdBand {
    /// Derive the cut points from the five textual ranges of a reference row
    #[must_use]
    pub fn from_ranges(
        severe_low: RangeSpec,
        low: RangeSpec,
        normal: RangeSpec,
        high: RangeSpec,
        severe_high: RangeSpec,
    ) -> Self {
        Self {
            severe_low_1: severe_low.lower_or_upper(),
            low_1: low.lower,
            low_2: normal.lower,
            high_2: normal.upper,
            high_1: high.upper,
            severe_high_1: severe_high.upper_or_lower(),
        }
    }

    /// Band with only a normal range
    #[must_use]
    pub const fn normal(low: Option<f64>, high: Option<f64>) -> Self {
        Self {
            severe_low_1: None,
            low_1: None,
            low_2: low,
            high_2: high,
            high_1: None,
            severe_high_1: None,
        }
    }

    /// Human-readable normal range: `"210.0-430.0"`, `"≥210.0"`, `"≤430.0"` or `"—"`
    #[must_use]
    pub fn normal_range_display(&self) -> String {
        match (self.low_2, self.high_2) {
            (Some(low), Some(high)) => format!("{low:.1}-{high:.1}"),
            (Some(low), None) => format!("≥{low:.1}"),
            (None, Some(high)) => format!("≤{high:.1}"),
            (None, None) => "—".to_string(),
        }
    }
}

/// Indicator name to threshold band, for one sex
#[derive(Debug, Clone, Default)]
pub struct ThresholdTable {
    bands: FxHashMap<String, ThresholdBand>,
}

impl ThresholdTable {
    /// Empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Band for an indicator
    #[must_use]
    pub fn get(&self, indicator: &str) -> Option<&ThresholdBand> {
        self.bands.get(indicator)
    }

    /// Insert or replace a band
    pub fn insert(&mut self, indicator: impl Into<String>, band: ThresholdBand) {
        self.bands.insert(indicator.into(), band);
    }

    /// Whether the indicator has a band
    #[must_use]
    pub fn contains(&self, indicator: &str) -> bool {
        self.bands.contains_key(indicator)
    }

    /// Number of indicators
    #[must_use]
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Iterate over `(indicator, band)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThresholdBand)> {
        self.bands.iter().map(|(name, band)| (name.as_str(), band))
    }
}

impl<S: Into<String>> FromIterator<(S, ThresholdBand)> for ThresholdTable {
    fn from_iter<I: IntoIterator<Item = (S, ThresholdBand)>>(iter: I) -> Self {
        Self {
            bands: iter.into_iter().map(|(name, band)| (name.into(), band)).collect(),
        }
    }
}

/// Per-sex reference tables
#[derive(Debug, Clone)]
pub struct ReferenceRanges {
    male: ThresholdTable,
    female: ThresholdTable,
    version: String,
}

type ReferenceEntry = (String, SexTag, ThresholdBand);

impl ReferenceRanges {
    /// Merge parsed rows into per-sex tables
    ///
    /// Explicit `male`/`female` rows win; `common` rows only fill indicators a
    /// sex does not already define.
    fn assemble(entries: Vec<ReferenceEntry>, version: impl Into<String>) -> Self {
        let mut male = ThresholdTable::new();
        let mut female = ThresholdTable::new();
        let mut common = Vec::new();

        for (indicator, tag, band) in entries {
            match tag {
                SexTag::Male => male.insert(indicator, band),
                SexTag::Female => female.insert(indicator, band),
                SexTag::Common => common.push((indicator, band)),
            }
        }

        for (indicator, band) in common {
            if !male.contains(&indicator) {
                male.insert(indicator.clone(), band);
            }
            if !female.contains(&indicator) {
                female.insert(indicator, band);
            }
        }

        Self {
            male,
            female,
            version: version.into(),
        }
    }

    /// The bundled default tables
    #[must_use]
    pub fn bundled() -> Self {
        let entries = DEFAULT_REFERENCE_ROWS
            .iter()
            .filter_map(|[indicator, sex, severe_low, low, normal, high, severe_high]| {
                let tag = SexTag::parse(sex)?;
                let band = ThresholdBand::from_ranges(
                    RangeSpec::parse(severe_low),
                    RangeSpec::parse(low),
                    RangeSpec::parse(normal),
                    RangeSpec::parse(high),
                    RangeSpec::parse(severe_high),
                );
                Some(((*indicator).to_string(), tag, band))
            })
            .collect();
        Self::assemble(entries, DEFAULT_REFERENCE_VERSION)
    }

    /// Build tables from an override table
    ///
    /// Any missing column, or a blank indicator on a row that carries a sex
    /// tag, rejects the whole table. Blank separator rows and rows with an
    /// unrecognised sex tag are ignored.
    pub fn from_table(table: &Table, columns: &ReferenceColumns) -> Result<Self> {
        let index = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| BloodworkError::missing_column(name, "reference table"))
        };
        let indicator_idx = index(&columns.indicator)?;
        let sex_idx = index(&columns.sex)?;
        let range_idx = [
            index(&columns.severe_low)?,
            index(&columns.low)?,
            index(&columns.normal)?,
            index(&columns.high)?,
            index(&columns.severe_high)?,
        ];

        let mut entries = Vec::with_capacity(table.num_rows());
        for (row_number, row) in table.rows().enumerate() {
            if row[indicator_idx].is_null() && row[sex_idx].is_null() {
                debug!("Skipping blank reference row {row_number}");
                continue;
            }

            let indicator = row[indicator_idx].as_text().ok_or_else(|| {
                BloodworkError::MalformedReferenceRow {
                    row: row_number,
                    reason: "indicator name is blank".to_string(),
                }
            })?;

            let Some(tag) = row[sex_idx].as_text().and_then(|label| SexTag::parse(&label)) else {
                debug!("Skipping reference row {row_number} ({indicator}): unrecognised sex");
                continue;
            };

            let [severe_low, low, normal, high, severe_high] =
                range_idx.map(|idx| RangeSpec::from_cell(&row[idx]));
            let band = ThresholdBand::from_ranges(severe_low, low, normal, high, severe_high);
            entries.push((indicator, tag, band));
        }

        Ok(Self::assemble(entries, "override"))
    }

    /// Load an override table, falling back to the bundled defaults
    ///
    /// A rejected override, or one that leaves either sex without any band,
    /// is logged and replaced by [`ReferenceRanges::bundled`].
    #[must_use]
    pub fn load_or_bundled(table: Option<&Table>, columns: &ReferenceColumns) -> Self {
        let Some(table) = table else {
            return Self::bundled();
        };

        match Self::from_table(table, columns) {
            Ok(ranges) if ranges.male.is_empty() || ranges.female.is_empty() => {
                warn!("Reference override leaves a sex without ranges; using bundled defaults");
                Self::bundled()
            }
            Ok(ranges) => {
                info!(
                    "Loaded reference override: {} male and {} female indicators",
                    ranges.male.len(),
                    ranges.female.len()
                );
                ranges
            }
            Err(e) => {
                warn!("Failed to load reference override ({e}); using bundled defaults");
                Self::bundled()
            }
        }
    }

    /// Table for a sex
    ///
    /// Subjects of unknown sex are classified against the male table.
    #[must_use]
    pub fn for_sex(&self, sex: Sex) -> &ThresholdTable {
        match sex {
            Sex::Female => &self.female,
            Sex::Male => &self.male,
            Sex::Unknown => {
                debug!("Unknown sex; using male reference ranges");
                &self.male
            }
        }
    }

    /// Where the tables came from: the bundled version string or `"override"`
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Default for ReferenceRanges {
    fn default() -> Self {
        Self::bundled()
    }
}

impl fmt::Display for ReferenceRanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reference ranges {} ({} male, {} female)",
            self.version,
            self.male.len(),
            self.female.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::table::CellValue;

    fn override_table(rows: Vec<Vec<CellValue>>) -> Table {
        let columns = ReferenceColumns::default();
        Table::from_rows(
            [
                columns.indicator,
                columns.sex,
                columns.severe_low,
                columns.low,
                columns.normal,
                columns.high,
                columns.severe_high,
            ],
            rows,
        )
        .unwrap()
    }

    fn row(cells: [&str; 7]) -> Vec<CellValue> {
        cells.iter().map(|&c| CellValue::from(c)).collect()
    }

    #[test]
    fn test_band_derivation() {
        let band = ThresholdBand::from_ranges(
            RangeSpec::parse("< 150"),
            RangeSpec::parse("150-210"),
            RangeSpec::parse("210-430"),
            RangeSpec::parse("430-450"),
            RangeSpec::parse("> 450"),
        );
        assert_eq!(band.severe_low_1, Some(150.0));
        assert_eq!(band.low_1, Some(150.0));
        assert_eq!(band.low_2, Some(210.0));
        assert_eq!(band.high_2, Some(430.0));
        assert_eq!(band.high_1, Some(450.0));
        assert_eq!(band.severe_high_1, Some(450.0));
    }

    #[test]
    fn test_normal_range_display() {
        assert_eq!(ThresholdBand::normal(Some(210.0), Some(430.0)).normal_range_display(), "210.0-430.0");
        assert_eq!(ThresholdBand::normal(Some(210.0), None).normal_range_display(), "≥210.0");
        assert_eq!(ThresholdBand::normal(None, Some(430.0)).normal_range_display(), "≤430.0");
        assert_eq!(ThresholdBand::default().normal_range_display(), "—");
    }

    #[test]
    fn test_bundled_common_rows_fill_both_sexes() {
        let ranges = ReferenceRanges::bundled();
        assert_eq!(ranges.version(), DEFAULT_REFERENCE_VERSION);
        let male = ranges.for_sex(Sex::Male);
        let female = ranges.for_sex(Sex::Female);
        assert!(male.contains("Cortisol"));
        assert!(female.contains("Cortisol"));
        assert_eq!(male.get("Ferritin").unwrap().low_2, Some(30.0));
        assert_eq!(female.get("Ferritin").unwrap().low_2, Some(20.0));
        assert_eq!(ranges.for_sex(Sex::Unknown).len(), male.len());
    }

    #[test]
    fn test_explicit_rows_beat_common() {
        let table = override_table(vec![
            row(["Ferritin", "common", "-", "-", "10-100", "-", "-"]),
            row(["Ferritin", "male", "-", "-", "30-400", "-", "-"]),
            row(["Ferritin", "unspecified", "-", "-", "1-2", "-", "-"]),
        ]);
        let ranges = ReferenceRanges::from_table(&table, &ReferenceColumns::default()).unwrap();
        assert_eq!(ranges.for_sex(Sex::Male).get("Ferritin").unwrap().low_2, Some(30.0));
        assert_eq!(ranges.for_sex(Sex::Female).get("Ferritin").unwrap().low_2, Some(10.0));
    }

    #[test]
    fn test_malformed_override_falls_back() {
        let columns = ReferenceColumns::default();

        let blank_indicator = override_table(vec![row(["", "male", "-", "-", "1-2", "-", "-"])]);
        assert!(ReferenceRanges::from_table(&blank_indicator, &columns).is_err());
        let ranges = ReferenceRanges::load_or_bundled(Some(&blank_indicator), &columns);
        assert_eq!(ranges.version(), DEFAULT_REFERENCE_VERSION);

        let missing_column = Table::from_rows(["Indicator"], vec![vec!["Ferritin".into()]]).unwrap();
        assert!(ReferenceRanges::from_table(&missing_column, &columns).is_err());

        let male_only = override_table(vec![row(["Ferritin", "male", "-", "-", "30-400", "-", "-"])]);
        let ranges = ReferenceRanges::load_or_bundled(Some(&male_only), &columns);
        assert_eq!(ranges.version(), DEFAULT_REFERENCE_VERSION);
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let columns = ReferenceColumns::default();
        let table = override_table(vec![
            row(["Ferritin", "common", "-", "-", "10-100", "-", "-"]),
            vec![CellValue::Null; 7],
            row(["", "", "-", "-", "1-2", "-", "-"]),
        ]);

        let ranges = ReferenceRanges::from_table(&table, &columns).unwrap();
        assert_eq!(ranges.for_sex(Sex::Male).len(), 1);

        let loaded = ReferenceRanges::load_or_bundled(Some(&table), &columns);
        assert_eq!(loaded.version(), "override");
        assert_eq!(loaded.for_sex(Sex::Male).get("Ferritin").unwrap().low_2, Some(10.0));
    }

    #[test]
    fn test_valid_override_is_used() {
        let table = override_table(vec![row(["Ferritin", "common", "-", "-", "10-100", "-", "-"])]);
        let ranges = ReferenceRanges::load_or_bundled(Some(&table), &ReferenceColumns::default());
        assert_eq!(ranges.version(), "override");
        assert_eq!(ranges.for_sex(Sex::Male).len(), 1);
    }
}
