//! Hand-written SQL with manually supplied parameters.

use std::fmt;

use crate::binder::ParameterBinder;
use crate::connection::{ConnectionHandle, ExecOutcome};
use crate::error::{SqlChainError, SqlResult};
use crate::placeholders::count_placeholders;
use crate::results::{ResultSet, Row};
use crate::statement::FinalizedStatement;
use crate::types::RowValues;

/// A raw statement: SQL text written by the caller plus one parameter per `?`.
///
/// ```rust,no_run
/// # use sql_chain::prelude::*;
/// # async fn demo(conn: ConnectionHandle) -> SqlResult<()> {
/// let rows = conn
///     .query("SELECT name FROM users")
///     .raw(" WHERE id IN (?, ?)")
///     .with_params([1, 2])
///     .fetch()
///     .await?;
/// # let _ = rows;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Query {
    connection: ConnectionHandle,
    sql: String,
    binder: ParameterBinder,
}

impl Query {
    #[must_use]
    pub fn new(connection: ConnectionHandle, sql: impl Into<String>) -> Self {
        Self {
            connection,
            sql: sql.into(),
            binder: ParameterBinder::new(),
        }
    }

    /// Append SQL text.
    #[must_use]
    pub fn raw(mut self, sql: &str) -> Self {
        self.sql.push_str(sql);
        self
    }

    /// Replace the SQL text; parameters are kept.
    #[must_use]
    pub fn replace(mut self, sql: impl Into<String>) -> Self {
        self.sql = sql.into();
        self
    }

    #[must_use]
    pub fn with_param(mut self, value: impl Into<RowValues>) -> Self {
        self.binder.append(value);
        self
    }

    #[must_use]
    pub fn with_params<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        self.binder.extend(values);
        self
    }

    #[must_use]
    pub fn raw_query(&self) -> &str {
        &self.sql
    }

    /// The SQL text with line breaks folded into spaces.
    #[must_use]
    pub fn raw_query_single_line(&self) -> String {
        self.sql.replace("\r\n", " ").replace('\n', " ")
    }

    #[must_use]
    pub fn type_tags(&self) -> String {
        self.binder.render_type_tags()
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        self.binder.values()
    }

    /// # Errors
    /// Returns `SqlChainError::BindingError` if the placeholder count differs from the
    /// number of parameters.
    pub fn finalize(&self) -> SqlResult<FinalizedStatement> {
        let placeholders = count_placeholders(&self.sql);
        if placeholders != self.binder.len() {
            return Err(SqlChainError::BindingError(format!(
                "query has {placeholders} placeholders but {} parameters",
                self.binder.len()
            )));
        }
        Ok(FinalizedStatement {
            sql: self.sql.clone(),
            values: self.binder.values().to_vec(),
            type_tags: self.binder.render_type_tags(),
        })
    }

    /// # Errors
    /// Returns the error of the lifecycle step that failed.
    pub async fn execute(self) -> SqlResult<ExecOutcome> {
        self.run(false).await
    }

    /// # Errors
    /// Returns the error of the lifecycle step that failed.
    pub async fn fetch(self) -> SqlResult<ResultSet> {
        Ok(self.run(true).await?.into_rows())
    }

    /// # Errors
    /// Returns the error of the lifecycle step that failed.
    pub async fn fetch_first(self) -> SqlResult<Option<Row>> {
        Ok(self.fetch().await?.into_iter().next())
    }

    async fn run(self, return_rows: bool) -> SqlResult<ExecOutcome> {
        let finalized = self.finalize()?;
        self.connection
            .execute_sql(
                finalized.sql,
                finalized.values,
                finalized.type_tags,
                return_rows,
            )
            .await
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("connection", &self.connection.name())
            .field("sql", &self.sql)
            .field("params", &self.binder.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::detached_connection;

    #[test]
    fn raw_appends_and_replace_resets() {
        let query = Query::new(detached_connection(), "SELECT *\nFROM t")
            .raw("\nWHERE a = ?")
            .with_param("x");
        assert_eq!(query.raw_query(), "SELECT *\nFROM t\nWHERE a = ?");
        assert_eq!(query.raw_query_single_line(), "SELECT * FROM t WHERE a = ?");
        assert_eq!(query.type_tags(), "s");

        let query = query.replace("DELETE FROM t WHERE a = ?");
        assert_eq!(query.values(), [RowValues::Text("x".into())]);
        assert!(query.finalize().is_ok());
    }

    #[test]
    fn parameters_must_cover_placeholders() {
        let query = Query::new(detached_connection(), "SELECT ? , '?'").with_params([1, 2]);
        assert!(query.finalize().unwrap_err().is_binding_error());
    }
}
