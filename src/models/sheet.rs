//! Cadence sheets and header flattening
//!
//! Source workbooks split results by measurement frequency. Each sheet arrives
//! with one or two physical header rows; grouped headers are flattened into a
//! single unique header before the sheet becomes a `Table`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BloodworkError, Result};
use crate::models::table::{CellValue, Table, dedup_names};

/// Measurement frequency of a source sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Monthly or weekly panel (the fusion base)
    MonthlyWeekly,
    /// Quarterly panel
    Quarterly,
    /// Yearly panel
    Yearly,
    /// Ad-hoc tests
    AdHoc,
}

impl Cadence {
    /// Default sheet label, also used as the collision suffix during fusion
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MonthlyWeekly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
            Self::AdHoc => "other",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Cadence {
    type Err = BloodworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "weekly" | "monthly_weekly" => Ok(Self::MonthlyWeekly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" | "annual" => Ok(Self::Yearly),
            "other" | "ad_hoc" | "adhoc" => Ok(Self::AdHoc),
            other => Err(BloodworkError::MalformedTable(format!(
                "unknown cadence '{other}'"
            ))),
        }
    }
}

/// Whether a header label is a reader placeholder rather than a real name
fn is_placeholder(label: &str) -> bool {
    label.to_ascii_lowercase().starts_with("unnamed")
}

/// Flatten one or more header levels into a single unique header
///
/// For each column the first level carrying a real label wins; columns with no
/// label on any level become `Unnamed_<index>`. Repeated names are suffixed.
#[must_use]
pub fn flatten_header(levels: &[Vec<Option<String>>]) -> Vec<String> {
    let width = levels.iter().map(Vec::len).max().unwrap_or(0);

    let flat: Vec<String> = (0..width)
        .map(|index| {
            levels
                .iter()
                .filter_map(|level| level.get(index).and_then(Option::as_deref))
                .map(str::trim)
                .find(|label| !label.is_empty() && !is_placeholder(label))
                .map_or_else(|| format!("Unnamed_{index}"), str::to_string)
        })
        .collect();

    dedup_names(&flat)
}

/// A source sheet as exported from one cadence of the workbook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet label, used to disambiguate colliding indicator columns
    pub label: String,
    /// Measurement frequency
    pub cadence: Cadence,
    /// Header levels, top first (one or two)
    pub headers: Vec<Vec<Option<String>>>,
    /// Data rows
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Sheet with a single header row, labelled after its cadence
    #[must_use]
    pub fn new<S: Into<String>>(
        cadence: Cadence,
        header: impl IntoIterator<Item = S>,
        rows: Vec<Vec<CellValue>>,
    ) -> Self {
        Self {
            label: cadence.label().to_string(),
            cadence,
            headers: vec![header.into_iter().map(|s| Some(s.into())).collect()],
            rows,
        }
    }

    /// Sheet with a grouped two-row header
    #[must_use]
    pub fn with_grouped_header(
        cadence: Cadence,
        upper: Vec<Option<String>>,
        lower: Vec<Option<String>>,
        rows: Vec<Vec<CellValue>>,
    ) -> Self {
        Self {
            label: cadence.label().to_string(),
            cadence,
            headers: vec![upper, lower],
            rows,
        }
    }

    /// Override the sheet label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Flattened, deduplicated header
    #[must_use]
    pub fn flattened_header(&self) -> Vec<String> {
        flatten_header(&self.headers)
    }

    /// Convert into a `Table`
    ///
    /// Short rows are padded with nulls (trailing empty cells are routinely
    /// trimmed by exporters); rows wider than the header are an error.
    pub fn to_table(&self) -> Result<Table> {
        let header = self.flattened_header();
        let width = header.len();
        let mut table = Table::new(header);

        for (index, row) in self.rows.iter().enumerate() {
            if row.len() > width {
                return Err(BloodworkError::MalformedTable(format!(
                    "sheet '{}' row {index} has {} cells but the header has {width} columns",
                    self.label,
                    row.len()
                )));
            }
            let mut padded = row.clone();
            padded.resize(width, CellValue::Null);
            table.push_row(padded)?;
        }

        Ok(table)
    }
}
