//! Backend primitives consumed by [`crate::connection::ConnectionHandle`].
//!
//! A driver is synchronous and owned by exactly one connection. The connection
//! serializes access and moves every call onto the blocking pool, so implementations
//! may block on I/O freely.

use std::fmt;

use crate::connection::ConnectionConfig;
use crate::error::SqlResult;
use crate::results::ResultSet;
use crate::types::{RowValues, TypeTag};

/// Per-connection sequence number identifying one prepared statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatementId(pub u64);

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stmt#{}", self.0)
    }
}

/// Transport and protocol operations for one database session.
///
/// Errors must already be classified: `connect` yields `ConnectionError`, `prepare`
/// yields `PreparationError`, `bind` yields `BindingError`, `execute` yields
/// `ExecutionError` (or `ConnectionError` for timeouts), `fetch_rows` yields `FetchError`.
pub trait Driver: Send + 'static {
    /// Short backend name used in log events.
    fn name(&self) -> &'static str;

    /// Open the session.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConnectionError` if the database cannot be reached.
    fn connect(&mut self, config: &ConnectionConfig) -> SqlResult<()>;

    fn is_connected(&self) -> bool;

    /// Close the session. Closing a closed driver is a no-op.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConnectionError` if the backend reports a failure while closing.
    fn disconnect(&mut self) -> SqlResult<()>;

    /// Escape text for inclusion inside a single-quoted literal.
    fn escape_string(&self, text: &str) -> String;

    /// Compile `sql` and register it under `id`.
    ///
    /// # Errors
    /// Returns `SqlChainError::PreparationError` if the backend rejects the statement.
    fn prepare(&mut self, id: StatementId, sql: &str) -> SqlResult<()>;

    /// Attach `values` to the statement's placeholders, one tag per value.
    ///
    /// # Errors
    /// Returns `SqlChainError::BindingError` on any arity or conversion mismatch.
    fn bind(&mut self, id: StatementId, tags: &[TypeTag], values: &[RowValues]) -> SqlResult<()>;

    /// Run the statement and return the number of rows affected.
    ///
    /// # Errors
    /// Returns `SqlChainError::ExecutionError` for server-side failures.
    fn execute(&mut self, id: StatementId) -> SqlResult<usize>;

    /// The insert id the backend reported for the last execution of `id`, or `0`.
    fn last_insert_id(&self, id: StatementId) -> i64;

    /// Drain the rows produced by the last execution of `id`.
    ///
    /// # Errors
    /// Returns `SqlChainError::FetchError` if rows cannot be retrieved.
    fn fetch_rows(&mut self, id: StatementId) -> SqlResult<ResultSet>;

    /// Release everything held for `id`. Unknown ids are ignored.
    ///
    /// # Errors
    /// Returns an error if the backend fails to free the statement.
    fn close_statement(&mut self, id: StatementId) -> SqlResult<()>;
}
