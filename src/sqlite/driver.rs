use std::collections::HashMap;

use rusqlite::types::Value;
use rusqlite::{Connection, ErrorCode};

use super::params::Params;
use super::query::{build_result_set, column_names};
use crate::connection::ConnectionConfig;
use crate::driver::{Driver, StatementId};
use crate::error::{SqlChainError, SqlResult};
use crate::results::ResultSet;
use crate::types::{RowValues, TypeTag};

const MEMORY_DATABASE: &str = ":memory:";

/// Per-id bookkeeping between prepare and close.
///
/// `rusqlite::Statement` borrows its connection, so the statement is compiled and
/// finalized on prepare to validate it, then compiled again for the one execution.
/// No compiled statement outlives the driver call that created it.
#[derive(Debug)]
struct PendingStatement {
    sql: String,
    parameter_count: usize,
    is_insert: bool,
    bound: Option<Params>,
    rows: Option<ResultSet>,
    insert_id: i64,
}

/// [`Driver`] over a single `rusqlite::Connection`.
#[derive(Debug, Default)]
pub struct SqliteDriver {
    conn: Option<Connection>,
    statements: HashMap<StatementId, PendingStatement>,
}

impl SqliteDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn connection(&self) -> SqlResult<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| SqlChainError::ConnectionError("sqlite connection is not open".into()))
    }
}

/// Map a failure while stepping a statement. Lock contention that outlived the busy
/// timeout is reported as a connection problem.
pub(crate) fn classify_step_error(err: rusqlite::Error) -> SqlChainError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if matches!(
                failure.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ) =>
        {
            SqlChainError::ConnectionError(format!("sqlite database busy: {err}"))
        }
        _ => SqlChainError::ExecutionError(err.to_string()),
    }
}

fn is_insert_statement(sql: &str) -> bool {
    let keyword: String = sql
        .trim_start()
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .collect();
    keyword.eq_ignore_ascii_case("insert") || keyword.eq_ignore_ascii_case("replace")
}

fn unknown_statement(id: StatementId) -> SqlChainError {
    SqlChainError::Other(format!("{id} is not prepared on this connection"))
}

impl Driver for SqliteDriver {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn connect(&mut self, config: &ConnectionConfig) -> SqlResult<()> {
        if self.conn.is_some() {
            return Ok(());
        }
        let conn = if config.database == MEMORY_DATABASE {
            Connection::open_in_memory()
        } else {
            Connection::open(&config.database)
        }
        .map_err(|e| SqlChainError::ConnectionError(format!("sqlite open failed: {e}")))?;

        if let Some(timeout) = config.busy_timeout() {
            conn.busy_timeout(timeout).map_err(|e| {
                SqlChainError::ConnectionError(format!("sqlite busy_timeout failed: {e}"))
            })?;
        }
        self.conn = Some(conn);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn disconnect(&mut self) -> SqlResult<()> {
        self.statements.clear();
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| {
                SqlChainError::ConnectionError(format!("sqlite close failed: {e}"))
            })?;
        }
        Ok(())
    }

    fn escape_string(&self, text: &str) -> String {
        text.replace('\'', "''")
    }

    fn prepare(&mut self, id: StatementId, sql: &str) -> SqlResult<()> {
        let stmt = self
            .connection()?
            .prepare(sql)
            .map_err(|e| SqlChainError::PreparationError(e.to_string()))?;
        let parameter_count = stmt.parameter_count();
        drop(stmt);

        self.statements.insert(
            id,
            PendingStatement {
                sql: sql.to_string(),
                parameter_count,
                is_insert: is_insert_statement(sql),
                bound: None,
                rows: None,
                insert_id: 0,
            },
        );
        Ok(())
    }

    fn bind(&mut self, id: StatementId, tags: &[TypeTag], values: &[RowValues]) -> SqlResult<()> {
        let pending = self
            .statements
            .get_mut(&id)
            .ok_or_else(|| unknown_statement(id))?;
        if tags.len() != values.len() {
            return Err(SqlChainError::BindingError(format!(
                "{} type tags for {} values",
                tags.len(),
                values.len()
            )));
        }
        if values.len() != pending.parameter_count {
            return Err(SqlChainError::BindingError(format!(
                "statement expects {} parameters, got {}",
                pending.parameter_count,
                values.len()
            )));
        }
        pending.bound = Some(Params::convert(values));
        Ok(())
    }

    fn execute(&mut self, id: StatementId) -> SqlResult<usize> {
        let conn = self
            .conn
            .as_ref()
            .ok_or_else(|| SqlChainError::ConnectionError("sqlite connection is not open".into()))?;
        let pending = self
            .statements
            .get_mut(&id)
            .ok_or_else(|| unknown_statement(id))?;

        let bound: &[Value] = pending
            .bound
            .as_ref()
            .map(Params::as_values)
            .unwrap_or_default();
        if bound.len() != pending.parameter_count {
            return Err(SqlChainError::BindingError(format!(
                "statement expects {} parameters, got {}",
                pending.parameter_count,
                bound.len()
            )));
        }

        let mut stmt = conn
            .prepare(&pending.sql)
            .map_err(|e| SqlChainError::ExecutionError(e.to_string()))?;
        for (idx, value) in bound.iter().enumerate() {
            stmt.raw_bind_parameter(idx + 1, value)
                .map_err(|e| SqlChainError::BindingError(format!("parameter {}: {e}", idx + 1)))?;
        }

        let rows_affected = if stmt.column_count() > 0 {
            let readonly = stmt.readonly();
            let columns = column_names(&stmt);
            let result_set = build_result_set(columns, stmt.raw_query())?;
            pending.rows = Some(result_set);
            if readonly {
                0
            } else {
                usize::try_from(conn.changes()).unwrap_or(usize::MAX)
            }
        } else {
            pending.rows = None;
            stmt.raw_execute().map_err(classify_step_error)?
        };
        drop(stmt);

        pending.insert_id = if pending.is_insert {
            conn.last_insert_rowid()
        } else {
            0
        };
        Ok(rows_affected)
    }

    fn last_insert_id(&self, id: StatementId) -> i64 {
        self.statements.get(&id).map_or(0, |p| p.insert_id)
    }

    fn fetch_rows(&mut self, id: StatementId) -> SqlResult<ResultSet> {
        let pending = self
            .statements
            .get_mut(&id)
            .ok_or_else(|| SqlChainError::FetchError(format!("{id} is not prepared")))?;
        Ok(pending.rows.take().unwrap_or_default())
    }

    fn close_statement(&mut self, id: StatementId) -> SqlResult<()> {
        self.statements.remove(&id);
        Ok(())
    }
}
