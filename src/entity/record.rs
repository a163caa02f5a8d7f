use std::fmt;

use indexmap::IndexMap;

use super::config::ModelConfig;
use super::value::FromRowValue;
use crate::connection::ConnectionHandle;
use crate::statement::StatementBuilder;
use crate::types::RowValues;

/// Mapping-backed row state for one table.
///
/// Field keys are stored with the column prefix already applied. Setters only buffer
/// values; nothing reaches the database until [`Record::save`].
#[derive(Clone)]
pub struct Record {
    pub(super) connection: ConnectionHandle,
    pub(super) table: String,
    pub(super) config: ModelConfig,
    pub(super) primary_key: Option<RowValues>,
    pub(super) fields: IndexMap<String, RowValues>,
    pub(super) savable: bool,
}

impl Record {
    /// A new, unsaved record with the default model settings.
    #[must_use]
    pub fn new(connection: ConnectionHandle, table: impl Into<String>) -> Self {
        Self::with_config(connection, table, ModelConfig::default())
    }

    #[must_use]
    pub fn with_config(
        connection: ConnectionHandle,
        table: impl Into<String>,
        config: ModelConfig,
    ) -> Self {
        let savable = config.savable;
        Self {
            connection,
            table: table.into(),
            config,
            primary_key: None,
            fields: IndexMap::new(),
            savable,
        }
    }

    #[must_use]
    pub fn connection(&self) -> &ConnectionHandle {
        &self.connection
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    #[must_use]
    pub fn column_prefix(&self) -> &str {
        &self.config.column_prefix
    }

    /// Primary-key column without the prefix.
    #[must_use]
    pub fn primary_key_column(&self) -> &str {
        &self.config.id_column
    }

    #[must_use]
    pub fn primary_key(&self) -> Option<&RowValues> {
        self.primary_key.as_ref()
    }

    /// True once the record corresponds to a stored row.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.primary_key.is_some()
    }

    #[must_use]
    pub fn is_savable(&self) -> bool {
        self.savable
    }

    pub fn set_savable(&mut self, savable: bool) -> &mut Self {
        self.savable = savable;
        self
    }

    /// Buffer `value` under the prefixed `column`.
    pub fn set(&mut self, column: &str, value: impl Into<RowValues>) -> &mut Self {
        self.fields.insert(self.config.prefixed(column), value.into());
        self
    }

    /// Drop a buffered field. Returns the previous value.
    pub fn unset(&mut self, column: &str) -> Option<RowValues> {
        self.fields.shift_remove(&self.config.prefixed(column))
    }

    /// Value of the prefixed `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&RowValues> {
        self.fields.get(&self.config.prefixed(column))
    }

    /// Value stored under exactly `key`.
    #[must_use]
    pub fn get_unprefixed(&self, key: &str) -> Option<&RowValues> {
        self.fields.get(key)
    }

    /// Typed read of the prefixed `column`; `None` if absent or not convertible.
    #[must_use]
    pub fn get_as<T: FromRowValue>(&self, column: &str) -> Option<T> {
        self.get(column).and_then(T::from_row_value)
    }

    /// True if the prefixed `column` holds a non-NULL value.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some_and(|v| !v.is_null())
    }

    #[must_use]
    pub fn fields(&self) -> &IndexMap<String, RowValues> {
        &self.fields
    }

    #[must_use]
    pub fn into_fields(self) -> IndexMap<String, RowValues> {
        self.fields
    }

    /// A statement builder for this record's table, sharing its model settings.
    #[must_use]
    pub fn query(&self) -> StatementBuilder {
        self.connection
            .table(self.table.clone())
            .with_model_config(self.config.clone())
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("connection", &self.connection.name())
            .field("table", &self.table)
            .field("primary_key", &self.primary_key)
            .field("fields", &self.fields)
            .field("savable", &self.savable)
            .finish()
    }
}
