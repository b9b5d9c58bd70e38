//! Multi-sheet fusion
//!
//! Merges the cadence sheets of a workbook into one row-per-subject-per-date
//! table. The primary (monthly/weekly) table is the base; every secondary sheet
//! is left-joined onto it by composite `(subject, date)` key and contributes
//! only its indicator columns. A secondary that cannot be merged is skipped
//! with a warning and never affects the result.

pub mod keys;

use log::{info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::EngineConfig;
use crate::error::{BloodworkError, Result};
use crate::models::sheet::Sheet;
use crate::models::table::{CellValue, Table, locate_column};

pub use keys::composite_key;

/// Columns one secondary sheet added to the fused table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetContribution {
    /// Sheet label
    pub label: String,
    /// Names of the columns added, after collision renaming
    pub columns: Vec<String>,
    /// Primary rows that found a matching secondary row
    pub matched_rows: usize,
}

/// A secondary sheet that was not merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSheet {
    /// Sheet label
    pub label: String,
    /// Why the sheet was skipped
    pub reason: String,
}

/// What fusion did with each secondary sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FusionReport {
    /// Sheets merged, in input order
    pub merged: Vec<SheetContribution>,
    /// Sheets skipped, in input order
    pub skipped: Vec<SkippedSheet>,
}

/// Fused table plus the per-sheet report
#[derive(Debug, Clone)]
pub struct FusionOutcome {
    /// Fused table
    pub table: Table,
    /// Per-sheet report
    pub report: FusionReport,
}

/// Pick a column name not yet taken, suffixing the sheet label and then a counter
fn collision_free_name(column: &str, label: &str, taken: &FxHashSet<String>) -> String {
    if !taken.contains(column) {
        return column.to_string();
    }
    let labelled = format!("{column}_{label}");
    if !taken.contains(&labelled) {
        return labelled;
    }
    (1..)
        .map(|counter| format!("{labelled}.{counter}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(labelled)
}

/// Merge one secondary sheet onto the fused table
///
/// All new columns are computed before any is written, so a failure leaves
/// `fused` untouched.
fn merge_sheet(
    fused: &mut Table,
    primary_keys: &[Option<String>],
    sheet: &Sheet,
    config: &EngineConfig,
) -> Result<SheetContribution> {
    let context = || format!("sheet '{}'", sheet.label);

    let mut secondary = sheet.to_table()?;
    secondary.drop_empty_rows();

    let name_idx = locate_column(secondary.columns(), &config.name_columns)
        .ok_or_else(|| BloodworkError::missing_column("subject name", context()))?;
    let date_idx = locate_column(secondary.columns(), &config.date_columns)
        .ok_or_else(|| BloodworkError::missing_column("test date", context()))?;

    // Later rows overwrite earlier ones: the last duplicate key wins
    let mut by_key: FxHashMap<String, usize> = FxHashMap::default();
    for (row_idx, row) in secondary.rows().enumerate() {
        if let Some(key) = composite_key(&row[name_idx], &row[date_idx], &config.date_format) {
            by_key.insert(key, row_idx);
        }
    }

    let matches: Vec<Option<usize>> = primary_keys
        .iter()
        .map(|key| key.as_ref().and_then(|key| by_key.get(key).copied()))
        .collect();
    let matched_rows = matches.iter().flatten().count();

    let mut taken: FxHashSet<String> = fused.columns().iter().cloned().collect();
    let mut additions: Vec<(String, Vec<CellValue>)> = Vec::new();

    for (col_idx, column) in secondary.columns().iter().enumerate() {
        if col_idx == name_idx
            || col_idx == date_idx
            || config.is_excluded(column)
            || column.starts_with("Unnamed_")
        {
            continue;
        }

        let name = collision_free_name(column, &sheet.label, &taken);
        let values = matches
            .iter()
            .map(|matched| {
                matched
                    .and_then(|row_idx| secondary.row(row_idx))
                    .map_or(CellValue::Null, |row| row[col_idx].clone())
            })
            .collect();
        taken.insert(name.clone());
        additions.push((name, values));
    }

    let columns = additions.iter().map(|(name, _)| name.clone()).collect();
    for (name, values) in additions {
        fused.set_column(&name, values)?;
    }

    Ok(SheetContribution {
        label: sheet.label.clone(),
        columns,
        matched_rows,
    })
}

/// Fuse a primary table with secondary cadence sheets
///
/// The primary's columns are deduplicated first. When the primary has no
/// locatable name or date column it is returned as-is and every secondary is
/// reported as skipped.
#[must_use]
pub fn fuse(mut primary: Table, secondary: &[Sheet], config: &EngineConfig) -> FusionOutcome {
    primary.dedup_columns();
    let mut report = FusionReport::default();

    let name_idx = locate_column(primary.columns(), &config.name_columns);
    let date_idx = locate_column(primary.columns(), &config.date_columns);
    let (Some(name_idx), Some(date_idx)) = (name_idx, date_idx) else {
        if !secondary.is_empty() {
            warn!("Primary table lacks a name or date column; returning it unmerged");
        }
        report.skipped = secondary
            .iter()
            .map(|sheet| SkippedSheet {
                label: sheet.label.clone(),
                reason: "primary table has no name or date column".to_string(),
            })
            .collect();
        return FusionOutcome {
            table: primary,
            report,
        };
    };

    let primary_keys: Vec<Option<String>> = primary
        .rows()
        .map(|row| composite_key(&row[name_idx], &row[date_idx], &config.date_format))
        .collect();

    for sheet in secondary {
        match merge_sheet(&mut primary, &primary_keys, sheet, config) {
            Ok(contribution) => {
                info!(
                    "Merged sheet '{}': {} columns, {} of {} rows matched",
                    contribution.label,
                    contribution.columns.len(),
                    contribution.matched_rows,
                    primary_keys.len()
                );
                report.merged.push(contribution);
            }
            Err(e) => {
                warn!("Skipping sheet '{}': {e}", sheet.label);
                report.skipped.push(SkippedSheet {
                    label: sheet.label.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "Fused table has {} rows and {} columns",
        primary.num_rows(),
        primary.num_columns()
    );

    FusionOutcome {
        table: primary,
        report,
    }
}
