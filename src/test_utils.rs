//! Fixtures shared by the unit tests.

use crate::connection::{ConnectionConfig, ConnectionHandle};
use crate::driver::{Driver, StatementId};
use crate::error::{SqlChainError, SqlResult};
use crate::results::ResultSet;
use crate::types::{RowValues, TypeTag};

/// Driver that refuses to connect, for tests that only build statements.
#[derive(Debug, Default)]
pub(crate) struct OfflineDriver;

impl Driver for OfflineDriver {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn connect(&mut self, _config: &ConnectionConfig) -> SqlResult<()> {
        Err(SqlChainError::ConnectionError("offline driver".into()))
    }

    fn is_connected(&self) -> bool {
        false
    }

    fn disconnect(&mut self) -> SqlResult<()> {
        Ok(())
    }

    fn escape_string(&self, text: &str) -> String {
        text.replace('\'', "''")
    }

    fn prepare(&mut self, _id: StatementId, _sql: &str) -> SqlResult<()> {
        Err(SqlChainError::ConnectionError("offline driver".into()))
    }

    fn bind(&mut self, _id: StatementId, _tags: &[TypeTag], _values: &[RowValues]) -> SqlResult<()> {
        Err(SqlChainError::ConnectionError("offline driver".into()))
    }

    fn execute(&mut self, _id: StatementId) -> SqlResult<usize> {
        Err(SqlChainError::ConnectionError("offline driver".into()))
    }

    fn last_insert_id(&self, _id: StatementId) -> i64 {
        0
    }

    fn fetch_rows(&mut self, _id: StatementId) -> SqlResult<ResultSet> {
        Err(SqlChainError::ConnectionError("offline driver".into()))
    }

    fn close_statement(&mut self, _id: StatementId) -> SqlResult<()> {
        Ok(())
    }
}

pub(crate) fn detached_connection() -> ConnectionHandle {
    ConnectionHandle::new("test", ConnectionConfig::new("test"), OfflineDriver)
}
