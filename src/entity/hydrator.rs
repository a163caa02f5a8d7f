use indexmap::IndexMap;

use super::config::ModelConfig;
use super::record::Record;
use crate::connection::ConnectionHandle;
use crate::results::{ResultSet, Row};

/// Turns fetched rows into records bound to one table.
///
/// Hydration performs no I/O. A row whose prefixed primary-key column holds a
/// non-NULL value yields a persisted record; any other row yields a record that
/// refuses to save, since its identity is unknown.
#[derive(Debug, Clone)]
pub struct EntityHydrator {
    connection: ConnectionHandle,
    table: String,
    config: ModelConfig,
}

impl EntityHydrator {
    #[must_use]
    pub fn new(connection: ConnectionHandle, table: impl Into<String>, config: ModelConfig) -> Self {
        Self {
            connection,
            table: table.into(),
            config,
        }
    }

    #[must_use]
    pub fn column_prefix(mut self, column_prefix: impl Into<String>) -> Self {
        self.config.column_prefix = column_prefix.into();
        self
    }

    #[must_use]
    pub fn primary_key_column(mut self, id_column: impl Into<String>) -> Self {
        self.config.id_column = id_column.into();
        self
    }

    /// Build one entity per row, in row order.
    pub fn hydrate<E, F>(&self, rows: ResultSet, mut factory: F) -> Vec<E>
    where
        F: FnMut(Record) -> E,
    {
        rows.into_iter()
            .map(|row| factory(self.hydrate_row(&row)))
            .collect()
    }

    #[must_use]
    pub fn hydrate_row(&self, row: &Row) -> Record {
        let mut fields = IndexMap::with_capacity(row.len());
        for (column, value) in row.iter() {
            // Duplicate column names keep the first value, matching `Row::get`.
            fields
                .entry(column.to_string())
                .or_insert_with(|| value.clone());
        }

        let primary_key = fields
            .get(&self.config.primary_key_name())
            .filter(|v| !v.is_null())
            .cloned();
        let savable = self.config.savable && primary_key.is_some();

        Record {
            connection: self.connection.clone(),
            table: self.table.clone(),
            config: self.config.clone(),
            primary_key,
            fields,
            savable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::detached_connection;
    use crate::types::RowValues;

    fn hydrator() -> EntityHydrator {
        EntityHydrator::new(detached_connection(), "users", ModelConfig::default())
    }

    #[test]
    fn rows_with_id_are_persisted() {
        let record = hydrator().hydrate_row(&Row::from_pairs([
            ("id", RowValues::Int(5)),
            ("name", RowValues::Text("Ann".into())),
        ]));
        assert!(record.is_persisted());
        assert!(record.is_savable());
        assert_eq!(record.primary_key(), Some(&RowValues::Int(5)));
        assert_eq!(record.get_as::<String>("name").as_deref(), Some("Ann"));
    }

    #[test]
    fn rows_without_id_cannot_be_saved() {
        let record = hydrator().hydrate_row(&Row::from_pairs([("name", "Bob")]));
        assert!(!record.is_persisted());
        assert!(!record.is_savable());

        let record = hydrator().hydrate_row(&Row::from_pairs([("id", RowValues::Null)]));
        assert!(!record.is_persisted());
    }

    #[test]
    fn prefix_and_custom_key_column() {
        let hydrator = hydrator().column_prefix("u_").primary_key_column("uid");
        let record = hydrator.hydrate_row(&Row::from_pairs([
            ("u_uid", RowValues::Int(9)),
            ("u_name", RowValues::Text("Cy".into())),
        ]));
        assert_eq!(record.primary_key(), Some(&RowValues::Int(9)));
        assert_eq!(record.get("name").and_then(RowValues::as_text), Some("Cy"));
    }

    #[test]
    fn factory_runs_per_row_in_order() {
        let mut rows = ResultSet::default();
        rows.add_row(Row::from_pairs([("id", 1), ("n", 10)]));
        rows.add_row(Row::from_pairs([("id", 2), ("n", 20)]));
        let ids: Vec<Option<i64>> = hydrator().hydrate(rows, |r| r.get_as::<i64>("id"));
        assert_eq!(ids, [Some(1), Some(2)]);
    }

    #[test]
    fn unsavable_config_wins() {
        let hydrator = EntityHydrator::new(
            detached_connection(),
            "users",
            ModelConfig::default().with_savable(false),
        );
        let record = hydrator.hydrate_row(&Row::from_pairs([("id", 1)]));
        assert!(record.is_persisted());
        assert!(!record.is_savable());
    }
}
