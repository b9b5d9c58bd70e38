//! In-memory observation tables
//!
//! A `Table` is the uniform record set the engine consumes: ordered rows of
//! cells addressed by column name. Spreadsheet readers, Arrow batches and JSON
//! documents are all converted into this shape before any resolution, fusion
//! or classification happens.

use std::fmt;

use chrono::NaiveDate;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{BloodworkError, Result};

/// A single cell value
///
/// Boolean inputs are stored as `1.0` / `0.0`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged, from = "RawCell")]
pub enum CellValue {
    /// Missing value
    #[default]
    Null,
    /// Numeric value
    Number(f64),
    /// Calendar date
    Date(NaiveDate),
    /// Free text
    Text(String),
}

/// Cell shapes accepted from JSON documents
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Null,
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl From<RawCell> for CellValue {
    fn from(raw: RawCell) -> Self {
        match raw {
            RawCell::Null => Self::Null,
            RawCell::Bool(flag) => Self::Number(if flag { 1.0 } else { 0.0 }),
            RawCell::Number(n) => Self::Number(n),
            RawCell::Date(d) => Self::Date(d),
            RawCell::Text(s) => Self::Text(s),
        }
    }
}

impl CellValue {
    /// Whether the cell counts as missing (null, NaN or blank text)
    #[must_use]
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Number(n) => n.is_nan(),
            Self::Text(s) => s.trim().is_empty(),
            Self::Date(_) => false,
        }
    }

    /// Numeric interpretation of the cell, if any
    ///
    /// Text cells are parsed after trimming. NaN never comes back as a value.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) if !n.is_nan() => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
            _ => None,
        }
    }

    /// Trimmed textual form of a non-missing cell
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        Some(match self {
            Self::Text(s) => s.trim().to_string(),
            other => other.to_string(),
        })
    }

    /// Date cell from an optional date
    #[must_use]
    pub fn from_date(date: Option<NaiveDate>) -> Self {
        date.map_or(Self::Null, Self::Date)
    }

    /// Date held by the cell, if it is a date cell
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{n:.0}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// Make column names unique by suffixing repeats with `.1`, `.2`, ...
///
/// The first occurrence keeps its name. A suffix that would itself collide
/// with a name already taken is skipped.
#[must_use]
pub fn dedup_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut unique = Vec::with_capacity(names.len());

    for name in names {
        let name = name.as_ref();
        let candidate = if seen.contains(name) {
            let mut counter = 1;
            loop {
                let suffixed = format!("{name}.{counter}");
                if !seen.contains(&suffixed) {
                    break suffixed;
                }
                counter += 1;
            }
        } else {
            name.to_string()
        };
        seen.insert(candidate.clone());
        unique.push(candidate);
    }

    unique
}

/// Locate the first candidate header present among `columns`
///
/// Candidates are tried in priority order, so the earliest candidate wins even
/// when a later one appears further left in the table.
#[must_use]
pub fn locate_column<S: AsRef<str>>(columns: &[String], candidates: &[S]) -> Option<usize> {
    candidates.iter().find_map(|candidate| {
        let candidate = candidate.as_ref();
        columns.iter().position(|column| column.trim() == candidate)
    })
}

#[derive(Deserialize)]
struct RawTable {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<CellValue>>,
}

impl TryFrom<RawTable> for Table {
    type Error = BloodworkError;

    fn try_from(raw: RawTable) -> Result<Self> {
        Self::from_rows(raw.columns, raw.rows)
    }
}

/// Row-ordered table with named columns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create an empty table with the given columns
    #[must_use]
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Create a table from a header and rows, rejecting ragged rows
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row; its width must match the header
    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(BloodworkError::MalformedTable(format!(
                "row {} has {} cells but the header has {} columns",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names in order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Row at `index`
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Index of the first column with the given name
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Whether a column with the given name exists
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at (`row`, `column`)
    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[index])
    }

    /// Cells of a column in row order
    pub fn column_values(&self, column: &str) -> Option<impl Iterator<Item = &CellValue>> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().map(move |row| &row[index]))
    }

    /// Non-missing numeric values of a column in row order
    #[must_use]
    pub fn numeric_values(&self, column: &str) -> Vec<f64> {
        self.column_values(column)
            .map(|values| values.filter_map(CellValue::as_f64).collect())
            .unwrap_or_default()
    }

    /// Replace the column if it exists, otherwise append it
    pub fn set_column(&mut self, name: &str, values: Vec<CellValue>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(BloodworkError::MalformedTable(format!(
                "column '{name}' has {} values but the table has {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        match self.column_index(name) {
            Some(index) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Remove the first column with the given name; returns whether one was removed
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(index) = self.column_index(name) else {
            return false;
        };
        self.columns.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
        true
    }

    /// Deduplicate column names in place
    pub fn dedup_columns(&mut self) {
        self.columns = dedup_names(&self.columns);
    }

    /// Drop rows in which every cell is missing
    pub fn drop_empty_rows(&mut self) {
        self.rows.retain(|row| !row.iter().all(CellValue::is_null));
    }

    /// New table containing the rows at `indices`, in that order
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&index| self.rows.get(index).cloned())
                .collect(),
        }
    }

    /// New table containing the rows matching `predicate`
    #[must_use]
    pub fn filter_rows(&self, predicate: impl Fn(&[CellValue]) -> bool) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| predicate(row))
                .cloned()
                .collect(),
        }
    }

    /// Keep only rows matching `predicate`
    pub fn retain_rows(&mut self, predicate: impl Fn(&[CellValue]) -> bool) {
        self.rows.retain(|row| predicate(row));
    }
}
