use tracing::debug;

use super::record::Record;
use crate::connection::ExecOutcome;
use crate::error::{SqlChainError, SqlResult};
use crate::types::RowValues;

impl Record {
    /// Write the buffered fields.
    ///
    /// A persisted record issues `UPDATE ... WHERE <pk> = ?` over every non-key field,
    /// changed or not. The key itself is never updated: a later `set` of the key
    /// column only changes the buffered field and the row is still matched by the key
    /// it was loaded or inserted with.
    ///
    /// A new record issues an `INSERT` and takes its primary key from the reported insert
    /// id (or from the key field, when one was set). The record is only modified after
    /// the statement succeeded.
    ///
    /// # Errors
    /// Returns `SqlChainError::SaveStateError` if the record is not savable or the new
    /// row's key cannot be determined, otherwise the statement's error.
    pub async fn save(&mut self) -> SqlResult<ExecOutcome> {
        if !self.savable {
            return Err(SqlChainError::SaveStateError(format!(
                "cannot save record of `{}`: identity unknown or saving disabled",
                self.table
            )));
        }
        match self.primary_key.clone() {
            Some(key) => self.save_existing(key).await,
            None => self.save_new().await,
        }
    }

    /// Delete the stored row and mark the record as new.
    ///
    /// # Errors
    /// Returns `SqlChainError::SaveStateError` if the record was never persisted,
    /// otherwise the statement's error.
    pub async fn delete(&mut self) -> SqlResult<ExecOutcome> {
        let Some(key) = self.primary_key.clone() else {
            return Err(SqlChainError::SaveStateError(format!(
                "cannot delete unsaved record of `{}`",
                self.table
            )));
        };
        let outcome = self
            .query()
            .delete()
            .where_(&self.config.primary_key_name(), "=", key)
            .execute()
            .await?;
        self.primary_key = None;
        Ok(outcome)
    }

    async fn save_existing(&mut self, key: RowValues) -> SqlResult<ExecOutcome> {
        let key_name = self.config.primary_key_name();
        let changes: Vec<(String, RowValues)> = self
            .fields
            .iter()
            .filter(|(column, _)| **column != key_name)
            .map(|(column, value)| (column.clone(), value.clone()))
            .collect();
        if changes.is_empty() {
            return Ok(ExecOutcome::default());
        }

        let outcome = self
            .query()
            .update(changes)
            .where_(&key_name, "=", key)
            .execute()
            .await?;
        debug!(table = %self.table, rows_affected = outcome.rows_affected, "record updated");
        Ok(outcome)
    }

    async fn save_new(&mut self) -> SqlResult<ExecOutcome> {
        let key_name = self.config.primary_key_name();
        let data: Vec<(String, RowValues)> = self
            .fields
            .iter()
            .map(|(column, value)| (column.clone(), value.clone()))
            .collect();

        let outcome = self.query().insert(data).execute().await?;

        let key = match self.fields.get(&key_name) {
            Some(value) if !value.is_null() => value.clone(),
            _ if outcome.last_insert_id > 0 => RowValues::Int(outcome.last_insert_id),
            _ => {
                return Err(SqlChainError::SaveStateError(format!(
                    "row inserted into `{}` but no insert id was reported",
                    self.table
                )));
            }
        };
        self.fields.insert(key_name, key.clone());
        self.primary_key = Some(key);
        debug!(table = %self.table, "record inserted");
        Ok(outcome)
    }
}
