use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use super::{ConnectionConfig, ConnectionHandle};
use crate::driver::Driver;
use crate::entity::Record;
use crate::error::{SqlChainError, SqlResult};
use crate::statement::StatementBuilder;

/// Name to connection lookup, built once at startup and shared by reference.
///
/// Registration order is kept so [`ConnectionRegistry::first`] is the connection
/// registered first.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<IndexMap<String, ConnectionHandle>>,
}

impl ConnectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a SQLite-backed connection under `name`, replacing any previous one.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConfigurationError` if the configuration is invalid.
    #[cfg(feature = "sqlite")]
    pub fn register(
        &self,
        name: impl Into<String>,
        config: ConnectionConfig,
    ) -> SqlResult<ConnectionHandle> {
        self.register_with_driver(name, config, crate::sqlite::SqliteDriver::new())
    }

    /// Register a connection that uses a caller-supplied driver.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConfigurationError` if the configuration is invalid.
    pub fn register_with_driver(
        &self,
        name: impl Into<String>,
        config: ConnectionConfig,
        driver: impl Driver,
    ) -> SqlResult<ConnectionHandle> {
        config.validate()?;
        let name = name.into();
        let handle = ConnectionHandle::new(name.clone(), config, driver);
        self.write().insert(name, handle.clone());
        Ok(handle)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<ConnectionHandle> {
        self.read().get(name).cloned()
    }

    /// The connection registered first.
    #[must_use]
    pub fn first(&self) -> Option<ConnectionHandle> {
        self.read().first().map(|(_, handle)| handle.clone())
    }

    /// Like [`ConnectionRegistry::get`], failing for unknown names.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConnectionError` if no connection is registered as `name`.
    pub fn require(&self, name: &str) -> SqlResult<ConnectionHandle> {
        self.get(name).ok_or_else(|| {
            SqlChainError::ConnectionError(format!("no connection registered as \"{name}\""))
        })
    }

    /// Start a statement on the named connection.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConnectionError` if no connection is registered as `name`.
    pub fn table(&self, name: &str, table: impl Into<String>) -> SqlResult<StatementBuilder> {
        Ok(self.require(name)?.table(table))
    }

    /// A blank record on the named connection.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConnectionError` if no connection is registered as `name`.
    pub fn model(&self, name: &str, table: impl Into<String>) -> SqlResult<Record> {
        Ok(self.require(name)?.model(table))
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, ConnectionHandle>> {
        self.connections.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, ConnectionHandle>> {
        self.connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
