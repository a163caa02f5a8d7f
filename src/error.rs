use thiserror::Error;

/// Result alias used throughout the crate.
pub type SqlResult<T> = Result<T, SqlChainError>;

/// Every failure surfaced by the builder, executor, and entity layers.
///
/// Driver errors are classified by the lifecycle step that produced them, so a
/// `rusqlite` failure while binding is a [`SqlChainError::BindingError`] and the
/// same failure while stepping the statement is an [`SqlChainError::ExecutionError`].
#[derive(Debug, Error)]
pub enum SqlChainError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Preparation error: {0}")]
    PreparationError(String),

    #[error("Binding error: {0}")]
    BindingError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Save state error: {0}")]
    SaveStateError(String),

    #[error("Other database error: {0}")]
    Other(String),
}

impl SqlChainError {
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }

    #[must_use]
    pub fn is_preparation_error(&self) -> bool {
        matches!(self, Self::PreparationError(_))
    }

    #[must_use]
    pub fn is_binding_error(&self) -> bool {
        matches!(self, Self::BindingError(_))
    }

    #[must_use]
    pub fn is_execution_error(&self) -> bool {
        matches!(self, Self::ExecutionError(_))
    }

    #[must_use]
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, Self::FetchError(_))
    }

    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::ConfigurationError(_))
    }

    #[must_use]
    pub fn is_save_state_error(&self) -> bool {
        matches!(self, Self::SaveStateError(_))
    }
}

impl From<tokio::task::JoinError> for SqlChainError {
    fn from(err: tokio::task::JoinError) -> Self {
        SqlChainError::Other(format!("blocking task join error: {err}"))
    }
}
