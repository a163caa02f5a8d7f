//! Named connections and the per-call statement lifecycle.

mod config;
pub mod executor;
pub mod registry;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

pub use config::{ConnectionConfig, ConnectionConfigBuilder};
pub use executor::{ExecOutcome, ExecPhase};
pub use registry::ConnectionRegistry;

use crate::driver::{Driver, StatementId};
use crate::entity::Record;
use crate::error::{SqlChainError, SqlResult};
use crate::query::Query;
use crate::statement::StatementBuilder;
use crate::types::RowValues;

/// Insert id reported before any statement ran on the connection.
pub const NO_INSERT_ID: i64 = -1;

/// Everything guarded by the connection mutex.
pub(crate) struct ConnectionState {
    pub(crate) config: ConnectionConfig,
    pub(crate) driver: Box<dyn Driver>,
    pub(crate) insert_id: i64,
    next_statement: u64,
    pub(crate) prepared: BTreeSet<StatementId>,
}

impl ConnectionState {
    pub(crate) fn issue_statement_id(&mut self) -> StatementId {
        self.next_statement += 1;
        StatementId(self.next_statement)
    }

    pub(crate) fn ensure_open(&mut self, name: &str) -> SqlResult<()> {
        if self.driver.is_connected() {
            return Ok(());
        }
        self.driver.connect(&self.config).map_err(|err| match err {
            SqlChainError::ConnectionError(_) => err,
            other => SqlChainError::ConnectionError(other.to_string()),
        })?;
        debug!(connection = name, driver = self.driver.name(), "connection opened");
        Ok(())
    }
}

/// Shared handle to one database session.
///
/// Clones refer to the same session. Every statement holds the session mutex from
/// the moment it is prepared until it is released, so at most one statement is in
/// flight per connection.
#[derive(Clone)]
pub struct ConnectionHandle {
    name: Arc<str>,
    state: Arc<Mutex<ConnectionState>>,
}

impl ConnectionHandle {
    /// Wrap a driver. Nothing is opened until the first statement or [`ConnectionHandle::open`].
    #[must_use]
    pub fn new(name: impl Into<String>, config: ConnectionConfig, driver: impl Driver) -> Self {
        Self::with_boxed_driver(name, config, Box::new(driver))
    }

    #[must_use]
    pub fn with_boxed_driver(
        name: impl Into<String>,
        config: ConnectionConfig,
        driver: Box<dyn Driver>,
    ) -> Self {
        let name: String = name.into();
        Self {
            name: Arc::from(name),
            state: Arc::new(Mutex::new(ConnectionState {
                config,
                driver,
                insert_id: NO_INSERT_ID,
                next_statement: 0,
                prepared: BTreeSet::new(),
            })),
        }
    }

    /// A connection backed by the bundled SQLite driver.
    #[cfg(feature = "sqlite")]
    #[must_use]
    pub fn sqlite(name: impl Into<String>, config: ConnectionConfig) -> Self {
        Self::new(name, config, crate::sqlite::SqliteDriver::new())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Open the session if it is not open yet.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConnectionError` if the driver cannot connect.
    pub async fn open(&self) -> SqlResult<()> {
        let name = Arc::clone(&self.name);
        self.run_blocking(move |state| state.ensure_open(&name)).await
    }

    /// Close the session. The next statement reopens it.
    ///
    /// # Errors
    /// Returns the driver's error if disconnecting fails.
    pub async fn close(&self) -> SqlResult<()> {
        let name = Arc::clone(&self.name);
        self.run_blocking(move |state| {
            if !state.driver.is_connected() {
                return Ok(());
            }
            state.driver.disconnect()?;
            debug!(connection = &*name, "connection closed");
            Ok(())
        })
        .await
    }

    pub async fn is_open(&self) -> bool {
        self.state.lock().await.driver.is_connected()
    }

    /// Escape `text` for a single-quoted literal. Only meant for raw fragments;
    /// bound parameters never need it.
    pub async fn escape_string(&self, text: &str) -> String {
        self.state.lock().await.driver.escape_string(text)
    }

    /// The insert id captured from the most recent statement on this connection,
    /// [`NO_INSERT_ID`] before any statement ran.
    pub async fn last_insert_id(&self) -> i64 {
        self.state.lock().await.insert_id
    }

    /// Number of statements currently registered with the driver.
    pub async fn open_statements(&self) -> usize {
        self.state.lock().await.prepared.len()
    }

    /// Run one statement through the full prepare, bind, execute, fetch, release cycle.
    ///
    /// `type_tags` carries one tag character per value.
    ///
    /// # Errors
    /// Returns the error of the first lifecycle step that failed.
    pub async fn execute_sql(
        &self,
        sql: impl Into<String>,
        values: Vec<RowValues>,
        type_tags: impl Into<String>,
        return_rows: bool,
    ) -> SqlResult<ExecOutcome> {
        let request = executor::ExecRequest {
            sql: sql.into(),
            type_tags: type_tags.into(),
            values,
            return_rows,
        };
        let name = Arc::clone(&self.name);
        self.run_blocking(move |state| executor::run(state, &name, &request))
            .await
    }

    /// Start a statement against `table`.
    #[must_use]
    pub fn table(&self, table: impl Into<String>) -> StatementBuilder {
        StatementBuilder::new(self.clone(), table)
    }

    /// A blank record for `table` using the default model settings.
    #[must_use]
    pub fn model(&self, table: impl Into<String>) -> Record {
        Record::new(self.clone(), table)
    }

    /// Start a raw statement.
    #[must_use]
    pub fn query(&self, sql: impl Into<String>) -> Query {
        Query::new(self.clone(), sql)
    }

    async fn run_blocking<F, R>(&self, func: F) -> SqlResult<R>
    where
        F: FnOnce(&mut ConnectionState) -> SqlResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let state = Arc::clone(&self.state);
        tokio::task::spawn_blocking(move || {
            let mut guard = state.blocking_lock();
            func(&mut guard)
        })
        .await?
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
