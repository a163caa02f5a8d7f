//! Fluent SQL statement construction.
//!
//! A [`StatementBuilder`] accumulates SQL fragments in call order and records one
//! parameter in its [`ParameterBinder`] for every `?` a clause writes. Every clause
//! method takes the builder by value and returns it, so chains read top to bottom:
//!
//! ```rust,no_run
//! # use sql_chain::prelude::*;
//! # async fn demo(conn: ConnectionHandle) -> SqlResult<()> {
//! let rows = conn
//!     .table("users")
//!     .select(["id", "name"])
//!     .where_("age", ">", 18)
//!     .and("age", "<", 65)
//!     .order_by("name", SortDirection::Asc)
//!     .limit(10)
//!     .fetch()
//!     .await?;
//! # let _ = rows;
//! # Ok(())
//! # }
//! ```

mod clauses;
mod execute;
mod joins;

use std::fmt;

pub use clauses::{Columns, SortDirection, quote_identifier};
pub use joins::JoinKind;

use crate::binder::ParameterBinder;
use crate::connection::ConnectionHandle;
use crate::entity::ModelConfig;
use crate::error::{SqlChainError, SqlResult};
use crate::placeholders::count_placeholders;
use crate::types::RowValues;

/// SQL text, its parameters, and the tag string that travels with them.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedStatement {
    pub sql: String,
    pub values: Vec<RowValues>,
    pub type_tags: String,
}

/// Builder for one statement against one table on one connection.
///
/// Builders are consumed by the terminal calls (`execute`, `fetch`, `get`, ...), so a
/// statement is never executed twice.
#[derive(Clone)]
pub struct StatementBuilder {
    connection: ConnectionHandle,
    table: String,
    model: ModelConfig,
    fragments: Vec<String>,
    binder: ParameterBinder,
}

impl StatementBuilder {
    #[must_use]
    pub fn new(connection: ConnectionHandle, table: impl Into<String>) -> Self {
        Self {
            connection,
            table: table.into(),
            model: ModelConfig::default(),
            fragments: Vec::new(),
            binder: ParameterBinder::new(),
        }
    }

    /// Settings handed to records produced by [`StatementBuilder::get`].
    #[must_use]
    pub fn with_model_config(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn connection(&self) -> &ConnectionHandle {
        &self.connection
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn model_config(&self) -> &ModelConfig {
        &self.model
    }

    #[must_use]
    pub fn binder(&self) -> &ParameterBinder {
        &self.binder
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        self.binder.values()
    }

    #[must_use]
    pub fn type_tags(&self) -> String {
        self.binder.render_type_tags()
    }

    /// Replace the SQL text. Parameters bound so far are kept.
    #[must_use]
    pub fn raw(mut self, sql: impl Into<String>) -> Self {
        self.fragments.clear();
        self.fragments.push(sql.into());
        self
    }

    /// Append a fragment verbatim.
    #[must_use]
    pub fn append_raw(self, sql: impl Into<String>) -> Self {
        self.push(sql.into())
    }

    /// Bind a value for a `?` written by a raw fragment.
    #[must_use]
    pub fn bind(mut self, value: impl Into<RowValues>) -> Self {
        self.binder.append(value);
        self
    }

    /// The SQL text with fragments separated by spaces.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.fragments.join(" ")
    }

    /// The SQL text with one fragment per line.
    #[must_use]
    pub fn sql_pretty(&self) -> String {
        self.fragments.join("\n")
    }

    /// Check that every `?` has exactly one parameter and produce the executable triple.
    ///
    /// # Errors
    /// Returns `SqlChainError::BindingError` if the placeholder count differs from the
    /// number of bound parameters.
    pub fn finalize(&self) -> SqlResult<FinalizedStatement> {
        let sql = self.to_sql();
        let placeholders = count_placeholders(&sql);
        if placeholders != self.binder.len() {
            return Err(SqlChainError::BindingError(format!(
                "statement has {placeholders} placeholders but {} bound parameters",
                self.binder.len()
            )));
        }
        Ok(FinalizedStatement {
            sql,
            values: self.binder.values().to_vec(),
            type_tags: self.binder.render_type_tags(),
        })
    }

    fn push(mut self, fragment: String) -> Self {
        self.fragments.push(fragment);
        self
    }

    fn push_bound(mut self, fragment: String, value: RowValues) -> Self {
        self.fragments.push(fragment);
        self.binder.append(value);
        self
    }

    fn quoted_table(&self) -> String {
        quote_identifier(&self.table)
    }
}

impl fmt::Debug for StatementBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementBuilder")
            .field("connection", &self.connection.name())
            .field("table", &self.table)
            .field("sql", &self.to_sql())
            .field("params", &self.binder.len())
            .finish()
    }
}

impl fmt::Display for StatementBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
