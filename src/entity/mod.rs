//! Active-record layer: hydrated records, typed entities, and `save()`.

mod config;
mod hydrator;
mod record;
mod save;
mod value;

use async_trait::async_trait;

pub use config::ModelConfig;
pub use hydrator::EntityHydrator;
pub use record::Record;
pub use value::FromRowValue;

use crate::connection::{ConnectionRegistry, ExecOutcome};
use crate::error::SqlResult;
use crate::statement::StatementBuilder;
use crate::types::RowValues;

/// Construction from a hydrated [`Record`].
pub trait FromRecord: Sized {
    fn from_record(record: Record) -> Self;
}

impl FromRecord for Record {
    fn from_record(record: Record) -> Self {
        record
    }
}

/// A typed table shape backed by a [`Record`].
///
/// ```rust,no_run
/// use sql_chain::prelude::*;
///
/// struct User(Record);
///
/// impl FromRecord for User {
///     fn from_record(record: Record) -> Self {
///         User(record)
///     }
/// }
///
/// impl Entity for User {
///     const CONNECTION: &'static str = "main";
///     const TABLE: &'static str = "users";
///
///     fn record(&self) -> &Record {
///         &self.0
///     }
///
///     fn record_mut(&mut self) -> &mut Record {
///         &mut self.0
///     }
/// }
///
/// # async fn demo(registry: &ConnectionRegistry) -> SqlResult<()> {
/// let mut user = User::create(registry)?;
/// user.record_mut().set("name", "Ann");
/// user.save().await?;
/// let adults = User::query(registry)?
///     .select_all()
///     .where_("age", ">=", 18)
///     .get::<User>()
///     .await?;
/// # let _ = adults;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Entity: FromRecord + Send + Sync + 'static {
    /// Registry name of the connection this entity lives on.
    const CONNECTION: &'static str;
    const TABLE: &'static str;

    fn model_config() -> ModelConfig {
        ModelConfig::default()
    }

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    /// A statement on this entity's table.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConnectionError` if `CONNECTION` is not registered.
    fn query(registry: &ConnectionRegistry) -> SqlResult<StatementBuilder> {
        Ok(registry
            .require(Self::CONNECTION)?
            .table(Self::TABLE)
            .with_model_config(Self::model_config()))
    }

    /// A new, unsaved entity.
    ///
    /// # Errors
    /// Returns `SqlChainError::ConnectionError` if `CONNECTION` is not registered.
    fn create(registry: &ConnectionRegistry) -> SqlResult<Self> {
        let connection = registry.require(Self::CONNECTION)?;
        Ok(Self::from_record(Record::with_config(
            connection,
            Self::TABLE,
            Self::model_config(),
        )))
    }

    /// Every row of the table.
    ///
    /// # Errors
    /// Returns the connection or statement error.
    async fn all(registry: &ConnectionRegistry) -> SqlResult<Vec<Self>> {
        Self::query(registry)?.select_all().get::<Self>().await
    }

    /// The row whose primary key equals `id`.
    ///
    /// # Errors
    /// Returns the connection or statement error.
    async fn find(registry: &ConnectionRegistry, id: RowValues) -> SqlResult<Option<Self>> {
        let key = Self::model_config().primary_key_name();
        Self::query(registry)?
            .select_all()
            .where_(&key, "=", id)
            .limit(1)
            .first::<Self>()
            .await
    }

    /// See [`Record::save`].
    ///
    /// # Errors
    /// See [`Record::save`].
    async fn save(&mut self) -> SqlResult<ExecOutcome> {
        self.record_mut().save().await
    }

    /// See [`Record::delete`].
    ///
    /// # Errors
    /// See [`Record::delete`].
    async fn delete(&mut self) -> SqlResult<ExecOutcome> {
        self.record_mut().delete().await
    }
}
