use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{SqlChainError, SqlResult};

/// Per-table mapping settings for records.
///
/// Deserialized from a configuration mapping; unknown keys are rejected.
///
/// ```rust
/// use sql_chain::prelude::*;
///
/// let config = ModelConfig::from_value(serde_json::json!({
///     "id_column": "user_id",
///     "column_prefix": "u_",
/// }))?;
/// assert_eq!(config.primary_key_name(), "u_user_id");
/// # Ok::<(), SqlChainError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Primary-key column name, without the prefix.
    pub id_column: String,
    /// Prepended to every column name a record reads or writes.
    pub column_prefix: String,
    /// `false` makes every `save()` fail.
    pub savable: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            id_column: "id".to_string(),
            column_prefix: String::new(),
            savable: true,
        }
    }
}

impl ModelConfig {
    /// # Errors
    /// Returns `SqlChainError::ConfigurationError` for unknown keys or mistyped values.
    pub fn from_value(value: JsonValue) -> SqlResult<Self> {
        serde_json::from_value(value).map_err(|e| {
            SqlChainError::ConfigurationError(format!("invalid model configuration: {e}"))
        })
    }

    /// # Errors
    /// Returns `SqlChainError::ConfigurationError` for unknown keys or mistyped values.
    pub fn from_map<I, K>(entries: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = (K, JsonValue)>,
        K: Into<String>,
    {
        let map: Map<String, JsonValue> = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self::from_value(JsonValue::Object(map))
    }

    /// # Errors
    /// Returns `SqlChainError::ConfigurationError` for malformed JSON or unknown keys.
    pub fn from_json(json: &str) -> SqlResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            SqlChainError::ConfigurationError(format!("invalid model configuration: {e}"))
        })
    }

    #[must_use]
    pub fn with_id_column(mut self, id_column: impl Into<String>) -> Self {
        self.id_column = id_column.into();
        self
    }

    #[must_use]
    pub fn with_column_prefix(mut self, column_prefix: impl Into<String>) -> Self {
        self.column_prefix = column_prefix.into();
        self
    }

    #[must_use]
    pub fn with_savable(mut self, savable: bool) -> Self {
        self.savable = savable;
        self
    }

    /// `column` with the prefix applied.
    #[must_use]
    pub fn prefixed(&self, column: &str) -> String {
        format!("{}{column}", self.column_prefix)
    }

    /// The primary-key column as it appears in result rows.
    #[must_use]
    pub fn primary_key_name(&self) -> String {
        self.prefixed(&self.id_column)
    }
}
