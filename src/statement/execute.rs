use super::StatementBuilder;
use crate::connection::ExecOutcome;
use crate::entity::{EntityHydrator, FromRecord, Record};
use crate::error::SqlResult;
use crate::results::{ResultSet, Row};

impl StatementBuilder {
    /// Run the statement without fetching rows.
    ///
    /// # Errors
    /// Returns `SqlChainError::BindingError` if placeholders and parameters disagree,
    /// otherwise the error of the lifecycle step that failed.
    pub async fn execute(self) -> SqlResult<ExecOutcome> {
        self.run(false).await
    }

    /// Run the statement and return every row it produced.
    ///
    /// # Errors
    /// Same as [`StatementBuilder::execute`], plus `SqlChainError::FetchError`.
    pub async fn execute_returning(self) -> SqlResult<ResultSet> {
        Ok(self.run(true).await?.into_rows())
    }

    /// Alias for [`StatementBuilder::execute_returning`].
    ///
    /// # Errors
    /// See [`StatementBuilder::execute_returning`].
    pub async fn fetch(self) -> SqlResult<ResultSet> {
        self.execute_returning().await
    }

    /// The first row, if any.
    ///
    /// # Errors
    /// See [`StatementBuilder::execute_returning`].
    pub async fn fetch_first(self) -> SqlResult<Option<Row>> {
        Ok(self.fetch().await?.into_iter().next())
    }

    /// Fetch and hydrate every row into `E`.
    ///
    /// # Errors
    /// See [`StatementBuilder::execute_returning`].
    pub async fn get<E: FromRecord>(self) -> SqlResult<Vec<E>> {
        self.get_with(E::from_record).await
    }

    /// Fetch and hydrate every row, building each entity with `factory`.
    ///
    /// # Errors
    /// See [`StatementBuilder::execute_returning`].
    pub async fn get_with<E, F>(self, factory: F) -> SqlResult<Vec<E>>
    where
        F: FnMut(Record) -> E,
    {
        let hydrator = EntityHydrator::new(
            self.connection.clone(),
            self.table.clone(),
            self.model.clone(),
        );
        let rows = self.fetch().await?;
        Ok(hydrator.hydrate(rows, factory))
    }

    /// The first hydrated entity, if any.
    ///
    /// # Errors
    /// See [`StatementBuilder::execute_returning`].
    pub async fn first<E: FromRecord>(self) -> SqlResult<Option<E>> {
        Ok(self.get::<E>().await?.into_iter().next())
    }

    /// The connection's insert id, as [`ConnectionHandle::last_insert_id`] reports it.
    ///
    /// This is the id of the latest statement run on the connection by any handle,
    /// not by this builder: terminal calls consume the builder, so it can only be
    /// read before this statement runs.
    ///
    /// [`ConnectionHandle::last_insert_id`]: crate::connection::ConnectionHandle::last_insert_id
    pub async fn last_insert_id(&self) -> i64 {
        self.connection.last_insert_id().await
    }

    async fn run(self, return_rows: bool) -> SqlResult<ExecOutcome> {
        let finalized = self.finalize()?;
        self.connection
            .execute_sql(
                finalized.sql,
                finalized.values,
                finalized.type_tags,
                return_rows,
            )
            .await
    }
}
