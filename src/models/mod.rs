//! Data models for observation tables and source sheets
//!
//! Everything the engine consumes is converted into a `Table` first; sheets
//! carry the cadence and header structure of a workbook export, and
//! `Observations` is the cleaned, subject-and-date addressable form.

pub mod observations;
pub mod sheet;
pub mod table;
pub mod types;
pub mod workbook;

// Re-export commonly used types
pub use observations::Observations;
pub use sheet::{Cadence, Sheet, flatten_header};
pub use table::{CellValue, Table, dedup_names, locate_column};
pub use types::{Sex, SexTag};
pub use workbook::Workbook;
