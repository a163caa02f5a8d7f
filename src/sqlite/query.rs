use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Rows, Statement};

use super::driver::classify_step_error;
use super::params::sqlite_value_to_row_value;
use crate::error::{SqlChainError, SqlResult};
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extract one column of a `SQLite` row.
///
/// # Errors
/// Returns `SqlChainError::FetchError` if the value cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row<'_>, idx: usize) -> SqlResult<RowValues> {
    let value: Value = row
        .get(idx)
        .map_err(|e| SqlChainError::FetchError(format!("column {idx}: {e}")))?;
    Ok(sqlite_value_to_row_value(value))
}

/// Column names of a prepared statement, in select-list order.
#[must_use]
pub fn column_names(stmt: &Statement<'_>) -> Arc<Vec<String>> {
    Arc::new(
        stmt.column_names()
            .iter()
            .map(std::string::ToString::to_string)
            .collect(),
    )
}

/// Step through every row and buffer it.
///
/// Stepping failures are execution errors; failures reading a value are fetch errors.
///
/// # Errors
/// Returns the classified error of the first failing row.
pub fn build_result_set(columns: Arc<Vec<String>>, mut rows: Rows<'_>) -> SqlResult<ResultSet> {
    let col_count = columns.len();
    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(columns);

    while let Some(row) = rows.next().map_err(classify_step_error)? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
