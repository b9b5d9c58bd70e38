//! Arrow utility functions for moving tables across the record-batch boundary
//!
//! Readers upstream of the engine produce Arrow record batches; the engine
//! works on `Table`. These functions convert between the two, extracting
//! individual cells from typed arrays and inferring a column type on the way
//! back out.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, Date64Array, Float32Array, Float64Array,
    Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::datatypes::{DataType, Date32Type, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::error::{BloodworkError, Result};
use crate::models::table::{CellValue, Table};

/// Extract a cell value from an Arrow array at the specified index, handling nulls
///
/// # Arguments
/// * `array` - The Arrow array
/// * `index` - The index of the value to extract
/// * `column` - Column name, for error context
///
/// # Returns
/// The cell, or an error when the array type has no cell mapping
pub fn arrow_array_to_cell(array: &ArrayRef, index: usize, column: &str) -> Result<CellValue> {
    if array.is_null(index) {
        return Ok(CellValue::Null);
    }

    let unsupported = || BloodworkError::UnsupportedDataType {
        column: column.to_string(),
        data_type: array.data_type().to_string(),
    };

    let cell = match array.data_type() {
        DataType::Null => CellValue::Null,
        DataType::Utf8 => {
            let values = array.as_any().downcast_ref::<StringArray>().ok_or_else(unsupported)?;
            CellValue::Text(values.value(index).to_string())
        }
        DataType::LargeUtf8 => {
            let values = array
                .as_any()
                .downcast_ref::<LargeStringArray>()
                .ok_or_else(unsupported)?;
            CellValue::Text(values.value(index).to_string())
        }
        DataType::Float64 => {
            let values = array.as_any().downcast_ref::<Float64Array>().ok_or_else(unsupported)?;
            CellValue::Number(values.value(index))
        }
        DataType::Float32 => {
            let values = array.as_any().downcast_ref::<Float32Array>().ok_or_else(unsupported)?;
            CellValue::Number(f64::from(values.value(index)))
        }
        DataType::Int64 => {
            let values = array.as_any().downcast_ref::<Int64Array>().ok_or_else(unsupported)?;
            CellValue::Number(values.value(index) as f64)
        }
        DataType::Int32 => {
            let values = array.as_any().downcast_ref::<Int32Array>().ok_or_else(unsupported)?;
            CellValue::Number(f64::from(values.value(index)))
        }
        DataType::Boolean => {
            let values = array.as_any().downcast_ref::<BooleanArray>().ok_or_else(unsupported)?;
            CellValue::Number(if values.value(index) { 1.0 } else { 0.0 })
        }
        DataType::Date32 => {
            let values = array.as_any().downcast_ref::<Date32Array>().ok_or_else(unsupported)?;
            CellValue::from_date(values.value_as_date(index))
        }
        DataType::Date64 => {
            let values = array.as_any().downcast_ref::<Date64Array>().ok_or_else(unsupported)?;
            CellValue::from_date(values.value_as_date(index))
        }
        _ => return Err(unsupported()),
    };

    Ok(cell)
}

/// Convert a record batch into a `Table`, preserving column and row order
pub fn record_batch_to_table(batch: &RecordBatch) -> Result<Table> {
    let schema = batch.schema();
    let columns: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    let mut table = Table::new(columns.clone());

    for row in 0..batch.num_rows() {
        let cells = batch
            .columns()
            .iter()
            .zip(&columns)
            .map(|(array, name)| arrow_array_to_cell(array, row, name))
            .collect::<Result<Vec<_>>>()?;
        table.push_row(cells)?;
    }

    Ok(table)
}

/// Storage type inferred for a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Numeric,
    Date,
    Text,
}

fn infer_kind<'a>(cells: impl Iterator<Item = &'a CellValue>) -> ColumnKind {
    let mut kind = None;
    for cell in cells.filter(|c| !c.is_null()) {
        let cell_kind = match cell {
            CellValue::Number(_) => ColumnKind::Numeric,
            CellValue::Date(_) => ColumnKind::Date,
            _ => ColumnKind::Text,
        };
        match kind {
            None => kind = Some(cell_kind),
            Some(existing) if existing != cell_kind => return ColumnKind::Text,
            Some(_) => {}
        }
    }
    // All-null columns default to numeric, the common case for sparse indicators
    kind.unwrap_or(ColumnKind::Numeric)
}

/// Convert a `Table` into a record batch
///
/// Columns whose non-missing cells are all numbers become `Float64`, all dates
/// become `Date32`, and anything mixed becomes `Utf8`.
pub fn table_to_record_batch(table: &Table) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(table.num_columns());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.num_columns());

    for (index, name) in table.columns().iter().enumerate() {
        let cells = || table.rows().map(move |row| &row[index]);
        let (data_type, array): (DataType, ArrayRef) = match infer_kind(cells()) {
            ColumnKind::Numeric => (
                DataType::Float64,
                Arc::new(cells().map(CellValue::as_f64).collect::<Float64Array>()),
            ),
            ColumnKind::Date => (
                DataType::Date32,
                Arc::new(
                    cells()
                        .map(|c| c.as_date().map(Date32Type::from_naive_date))
                        .collect::<Date32Array>(),
                ),
            ),
            ColumnKind::Text => (
                DataType::Utf8,
                Arc::new(cells().map(CellValue::as_text).collect::<StringArray>()),
            ),
        };
        fields.push(Field::new(name, data_type, true));
        arrays.push(array);
    }

    let options = RecordBatchOptions::new().with_row_count(Some(table.num_rows()));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        arrays,
        &options,
    )?)
}
