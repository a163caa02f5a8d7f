//! Convenient imports for common functionality.

pub use crate::binder::ParameterBinder;
pub use crate::connection::{
    ConnectionConfig, ConnectionConfigBuilder, ConnectionHandle, ConnectionRegistry, ExecOutcome,
};
pub use crate::driver::{Driver, StatementId};
pub use crate::entity::{Entity, EntityHydrator, FromRecord, FromRowValue, ModelConfig, Record};
pub use crate::error::{SqlChainError, SqlResult};
pub use crate::query::Query;
pub use crate::results::{ResultSet, Row};
pub use crate::statement::{Columns, FinalizedStatement, SortDirection, StatementBuilder};
pub use crate::types::{RowValues, TypeTag};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteDriver;
