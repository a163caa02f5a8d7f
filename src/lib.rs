//! Fluent SQL statement building over prepared statements, with a small
//! active-record layer.
//!
//! Statements are composed by chaining clause methods on a [`StatementBuilder`]; every
//! value goes through a [`ParameterBinder`] and reaches the database as a bound
//! parameter. Execution follows a fixed prepare, bind, execute, fetch, release cycle
//! on a [`ConnectionHandle`], and fetched rows can be hydrated into [`Record`]s that
//! know how to save themselves.
//!
//! ```rust,no_run
//! use sql_chain::prelude::*;
//!
//! # async fn demo() -> SqlResult<()> {
//! let registry = ConnectionRegistry::new();
//! let conn = registry.register("main", ConnectionConfig::new("app.db"))?;
//!
//! conn.query("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INTEGER)")
//!     .execute()
//!     .await?;
//!
//! let mut user = conn.model("users");
//! user.set("name", "Ann").set("age", 31);
//! user.save().await?;
//!
//! let adults: Vec<Record> = conn
//!     .table("users")
//!     .select_all()
//!     .where_("age", ">=", 18)
//!     .get()
//!     .await?;
//! # let _ = adults;
//! # Ok(())
//! # }
//! ```

pub mod binder;
pub mod connection;
pub mod driver;
pub mod entity;
pub mod error;
pub mod placeholders;
pub mod prelude;
pub mod query;
pub mod results;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod statement;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use binder::ParameterBinder;
pub use connection::{
    ConnectionConfig, ConnectionConfigBuilder, ConnectionHandle, ConnectionRegistry, ExecOutcome,
    ExecPhase,
};
pub use driver::{Driver, StatementId};
pub use entity::{Entity, EntityHydrator, FromRecord, FromRowValue, ModelConfig, Record};
pub use error::{SqlChainError, SqlResult};
pub use placeholders::count_placeholders;
pub use query::Query;
pub use results::{ResultSet, Row};
pub use statement::{Columns, FinalizedStatement, SortDirection, StatementBuilder};
pub use types::{RowValues, TypeTag};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDriver;
