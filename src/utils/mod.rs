//! Conversion helpers for dates and Arrow record batches

pub mod arrow_utils;
pub mod date_utils;

pub use arrow_utils::{arrow_array_to_cell, record_batch_to_table, table_to_record_batch};
pub use date_utils::{cell_to_date, cell_to_date_string, parse_date_string};
