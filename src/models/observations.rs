//! Prepared observation tables
//!
//! `Observations` wraps a fused table after cleaning: every row carries a
//! subject in the canonical name column and a parsed date in the canonical
//! date column. Queries return new `Observations` over the same columns.

use chrono::{Days, NaiveDate};
use itertools::Itertools;
use log::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{BloodworkError, Result};
use crate::models::table::{CellValue, Table, locate_column};
use crate::models::types::Sex;
use crate::utils::date_utils::cell_to_date;

/// Cleaned, subject-and-date addressable observation table
#[derive(Debug, Clone)]
pub struct Observations {
    table: Table,
    name_index: usize,
    date_index: usize,
    sex_index: Option<usize>,
}

impl Observations {
    /// Clean a fused table into observations
    ///
    /// Drops all-empty rows, adds the canonical name, date and date-string
    /// columns, assigns consecutive synthetic dates when no date column exists,
    /// and drops rows without a subject or a parsable date.
    pub fn prepare(mut table: Table, config: &EngineConfig) -> Result<Self> {
        table.drop_empty_rows();

        let source_name = locate_column(table.columns(), &config.name_columns)
            .ok_or_else(|| BloodworkError::missing_column("subject name", "observation table"))?;
        let names: Vec<CellValue> = table
            .rows()
            .map(|row| row[source_name].as_text().map_or(CellValue::Null, CellValue::Text))
            .collect();

        let dates: Vec<Option<NaiveDate>> =
            match locate_column(table.columns(), &config.date_columns) {
                Some(source_date) => table
                    .rows()
                    .map(|row| cell_to_date(&row[source_date], &config.date_format))
                    .collect(),
                None => {
                    info!(
                        "No date column found; assigning synthetic dates from {}",
                        config.synthetic_start_date
                    );
                    (0..table.num_rows())
                        .map(|offset| {
                            config
                                .synthetic_start_date
                                .checked_add_days(Days::new(offset as u64))
                        })
                        .collect()
                }
            };
        let date_strings: Vec<CellValue> = dates
            .iter()
            .map(|date| {
                date.map_or(CellValue::Null, |d| {
                    CellValue::Text(d.format(&config.date_format.default_format).to_string())
                })
            })
            .collect();
        let dates: Vec<CellValue> = dates.into_iter().map(CellValue::from_date).collect();

        table.set_column(&config.canonical_name_column, names)?;
        table.set_column(&config.canonical_date_column, dates)?;
        table.set_column(&config.canonical_date_str_column, date_strings)?;

        let name_index = table
            .column_index(&config.canonical_name_column)
            .ok_or_else(|| {
                BloodworkError::missing_column(&config.canonical_name_column, "prepared table")
            })?;
        let date_index = table
            .column_index(&config.canonical_date_column)
            .ok_or_else(|| {
                BloodworkError::missing_column(&config.canonical_date_column, "prepared table")
            })?;

        let before = table.num_rows();
        table.retain_rows(|row| !row[name_index].is_null() && !row[date_index].is_null());
        let dropped = before - table.num_rows();
        if dropped > 0 {
            warn!("Dropped {dropped} rows without a subject or a parsable date");
        }

        let sex_index = locate_column(table.columns(), &config.sex_columns);
        debug!(
            "Prepared {} observations over {} columns",
            table.num_rows(),
            table.num_columns()
        );

        Ok(Self {
            table,
            name_index,
            date_index,
            sex_index,
        })
    }

    fn derive(&self, table: Table) -> Self {
        Self {
            table,
            name_index: self.name_index,
            date_index: self.date_index,
            sex_index: self.sex_index,
        }
    }

    /// Underlying table
    #[must_use]
    pub const fn table(&self) -> &Table {
        &self.table
    }

    /// Consume into the underlying table
    #[must_use]
    pub fn into_table(self) -> Table {
        self.table
    }

    /// Number of observations
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.num_rows()
    }

    /// Whether there are no observations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Subject of the observation at `row`
    #[must_use]
    pub fn subject(&self, row: usize) -> Option<&str> {
        match self.table.row(row)?.get(self.name_index)? {
            CellValue::Text(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Test date of the observation at `row`
    #[must_use]
    pub fn date(&self, row: usize) -> Option<NaiveDate> {
        self.table.row(row)?.get(self.date_index)?.as_date()
    }

    /// Distinct subjects, sorted
    #[must_use]
    pub fn subjects(&self) -> Vec<String> {
        (0..self.len())
            .filter_map(|row| self.subject(row))
            .unique()
            .sorted()
            .map(str::to_string)
            .collect()
    }

    /// Sex recorded for a subject (first parsable value)
    #[must_use]
    pub fn sex_of(&self, subject: &str) -> Sex {
        let Some(sex_index) = self.sex_index else {
            return Sex::Unknown;
        };
        (0..self.len())
            .filter(|&row| self.subject(row) == Some(subject))
            .filter_map(|row| self.table.row(row)?[sex_index].as_text())
            .map(|label| Sex::from(label.as_str()))
            .find(|sex| *sex != Sex::Unknown)
            .unwrap_or(Sex::Unknown)
    }

    /// Observations of subjects of the given sex
    ///
    /// Without a sex column every observation is kept.
    #[must_use]
    pub fn filter_by_sex(&self, sex: Sex) -> Self {
        let Some(sex_index) = self.sex_index else {
            warn!("No sex column present; keeping all observations");
            return self.clone();
        };
        self.derive(self.table.filter_rows(|row| {
            row[sex_index]
                .as_text()
                .is_some_and(|label| Sex::from(label.as_str()) == sex)
        }))
    }

    fn history_indices(&self, subject: &str) -> Vec<usize> {
        (0..self.len())
            .filter(|&row| self.subject(row) == Some(subject))
            .sorted_by_key(|&row| self.date(row))
            .collect()
    }

    /// One subject's observations ordered by date
    #[must_use]
    pub fn subject_history(&self, subject: &str) -> Self {
        self.derive(self.table.select_rows(&self.history_indices(subject)))
    }

    /// The last `n` observations in current order
    #[must_use]
    pub fn latest(&self, n: usize) -> Self {
        let start = self.len().saturating_sub(n);
        let indices: Vec<usize> = (start..self.len()).collect();
        self.derive(self.table.select_rows(&indices))
    }

    /// Each listed subject's `window` most recent observations, concatenated
    #[must_use]
    pub fn baseline_cohort<S: AsRef<str>>(&self, subjects: &[S], window: usize) -> Self {
        let indices: Vec<usize> = subjects
            .iter()
            .flat_map(|subject| {
                let history = self.history_indices(subject.as_ref());
                let start = history.len().saturating_sub(window);
                history.into_iter().skip(start)
            })
            .collect();
        self.derive(self.table.select_rows(&indices))
    }

    /// Observations with dates inside the inclusive range
    #[must_use]
    pub fn within_dates(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let date_index = self.date_index;
        self.derive(self.table.filter_rows(|row| {
            row[date_index].as_date().is_some_and(|date| {
                start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
            })
        }))
    }

    /// Distinct test dates in row order
    #[must_use]
    pub fn distinct_dates(&self) -> Vec<NaiveDate> {
        (0..self.len()).filter_map(|row| self.date(row)).unique().collect()
    }

    /// First row recorded on `date`
    #[must_use]
    pub fn first_row_on(&self, date: NaiveDate) -> Option<usize> {
        (0..self.len()).find(|&row| self.date(row) == Some(date))
    }

    /// Earliest and latest test dates
    #[must_use]
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        (0..self.len())
            .filter_map(|row| self.date(row))
            .minmax()
            .into_option()
    }
}
