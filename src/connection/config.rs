use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SqlChainError, SqlResult};

/// Settings for one named connection.
///
/// Network drivers use every field; the bundled SQLite driver only reads `database`
/// (a file path or `:memory:`) and `busy_timeout_ms`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub database: String,
    pub port: u16,
    pub charset: String,
    /// How long the driver may wait on a locked or unreachable server before
    /// reporting a connection error.
    pub busy_timeout_ms: Option<u64>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            username: String::new(),
            password: String::new(),
            database: String::new(),
            port: 3306,
            charset: "utf8".to_string(),
            busy_timeout_ms: None,
        }
    }
}

impl ConnectionConfig {
    #[must_use]
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn builder(database: impl Into<String>) -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::new(database)
    }

    /// Parse a JSON configuration object.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConfigurationError` for malformed JSON, unknown keys, or a
    /// configuration that fails [`ConnectionConfig::validate`].
    pub fn from_json(json: &str) -> SqlResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            SqlChainError::ConfigurationError(format!("invalid connection configuration: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `SqlChainError::ConfigurationError` if the database name is empty.
    pub fn validate(&self) -> SqlResult<()> {
        if self.database.trim().is_empty() {
            return Err(SqlChainError::ConfigurationError(
                "database is required".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn busy_timeout(&self) -> Option<Duration> {
        self.busy_timeout_ms.map(Duration::from_millis)
    }
}

// Credentials and addressing stay out of logs and panic messages.
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &"<redacted>")
            .field("username", &"<redacted>")
            .field("password", &"<redacted>")
            .field("database", &"<redacted>")
            .field("port", &"<redacted>")
            .field("charset", &self.charset)
            .field("busy_timeout_ms", &self.busy_timeout_ms)
            .finish()
    }
}

/// Fluent builder for [`ConnectionConfig`].
#[derive(Debug, Clone)]
pub struct ConnectionConfigBuilder {
    config: ConnectionConfig,
}

impl ConnectionConfigBuilder {
    #[must_use]
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            config: ConnectionConfig::new(database),
        }
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = username.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.config.charset = charset.into();
        self
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.config.busy_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// # Errors
    /// Returns `SqlChainError::ConfigurationError` if the configuration is incomplete.
    pub fn finish(self) -> SqlResult<ConnectionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_credentials() {
        let config = ConnectionConfig::builder("shop")
            .host("db.internal")
            .username("admin")
            .password("hunter2")
            .finish()
            .unwrap();
        let out = format!("{config:?}");
        assert!(!out.contains("hunter2"));
        assert!(!out.contains("admin"));
        assert!(!out.contains("db.internal"));
        assert!(!out.contains("shop"));
        assert!(out.contains("utf8"));
    }

    #[test]
    fn json_defaults_and_unknown_keys() {
        let config = ConnectionConfig::from_json(r#"{"database": ":memory:"}"#).unwrap();
        assert_eq!(config.port, 3306);
        assert_eq!(config.charset, "utf8");

        let err = ConnectionConfig::from_json(r#"{"database": "x", "colour": "red"}"#)
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn empty_database_is_rejected() {
        let err = ConnectionConfig::builder("  ").finish().unwrap_err();
        assert!(err.is_configuration_error());
    }
}
