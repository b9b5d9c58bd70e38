//! JSON workbook documents
//!
//! A workbook bundles the sheets of one export: the primary monthly/weekly
//! sheet, any secondary cadence sheets, and an optional reference-range
//! override table.

use serde::Deserialize;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::sheet::Sheet;
use crate::models::table::Table;

/// Sheets of one workbook export
#[derive(Debug, Clone, Deserialize)]
pub struct Workbook {
    /// Base sheet of the fusion
    pub primary: Sheet,
    /// Quarterly, yearly and ad-hoc sheets
    #[serde(default)]
    pub secondary: Vec<Sheet>,
    /// Reference-range override table
    #[serde(default)]
    pub reference_ranges: Option<Table>,
    /// Engine settings; defaults when absent
    #[serde(default)]
    pub config: Option<EngineConfig>,
}

impl Workbook {
    /// Parse a workbook document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
