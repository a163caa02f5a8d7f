use std::fmt;

use super::StatementBuilder;
use crate::types::RowValues;

/// Select-list specification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Columns {
    /// `*`
    #[default]
    All,
    /// Inserted verbatim, e.g. `COUNT(*) AS total`.
    Raw(String),
    /// Rendered as a quoted, comma separated list.
    List(Vec<String>),
}

impl Columns {
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Columns::All => "*".to_string(),
            Columns::Raw(raw) => raw.clone(),
            Columns::List(columns) => columns
                .iter()
                .map(|c| quote_identifier(c))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<&str> for Columns {
    fn from(value: &str) -> Self {
        if value.trim() == "*" {
            Columns::All
        } else {
            Columns::Raw(value.to_string())
        }
    }
}

impl From<String> for Columns {
    fn from(value: String) -> Self {
        Columns::from(value.as_str())
    }
}

impl From<Vec<String>> for Columns {
    fn from(value: Vec<String>) -> Self {
        Columns::List(value)
    }
}

impl From<Vec<&str>> for Columns {
    fn from(value: Vec<&str>) -> Self {
        Columns::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Columns {
    fn from(value: &[&str]) -> Self {
        Columns::List(value.iter().map(|c| (*c).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Columns {
    fn from(value: [&str; N]) -> Self {
        Columns::List(value.iter().map(|c| (*c).to_string()).collect())
    }
}

/// `ORDER BY` direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        })
    }
}

/// Backtick-quote an identifier, one segment per `.`; `*` segments stay bare.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    name.split('.')
        .map(|part| {
            if part == "*" {
                part.to_string()
            } else {
                format!("`{}`", part.replace('`', "``"))
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

impl StatementBuilder {
    /// `SELECT <columns> FROM <table>`
    #[must_use]
    pub fn select(self, columns: impl Into<Columns>) -> Self {
        let fragment = format!("SELECT {} FROM {}", columns.into().render(), self.quoted_table());
        self.push(fragment)
    }

    #[must_use]
    pub fn select_all(self) -> Self {
        self.select(Columns::All)
    }

    /// `INSERT INTO <table> (a,b) VALUES (?,?)`, one parameter per pair in order.
    ///
    /// An empty iterator inserts `DEFAULT VALUES`.
    #[must_use]
    pub fn insert<I, K, V>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RowValues>,
    {
        let mut columns = Vec::new();
        for (column, value) in data {
            columns.push(column.into());
            self.binder.append(value);
        }
        let fragment = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.quoted_table())
        } else {
            let placeholders = vec!["?"; columns.len()].join(",");
            format!(
                "INSERT INTO {} ({}) VALUES ({placeholders})",
                self.quoted_table(),
                columns.join(",")
            )
        };
        self.push(fragment)
    }

    /// `UPDATE <table> SET a = ?, b = ?`, one parameter per pair in order.
    #[must_use]
    pub fn update<I, K, V>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RowValues>,
    {
        let mut assignments = Vec::new();
        for (column, value) in data {
            assignments.push(format!("{} = ?", column.into()));
            self.binder.append(value);
        }
        let fragment = format!("UPDATE {} SET {}", self.quoted_table(), assignments.join(", "));
        self.push(fragment)
    }

    /// `DELETE FROM <table>`
    #[must_use]
    pub fn delete(self) -> Self {
        let fragment = format!("DELETE FROM {}", self.quoted_table());
        self.push(fragment)
    }

    /// `WHERE <column> <operator> ?`. The operator is written as given.
    #[must_use]
    pub fn where_(self, column: &str, operator: &str, value: impl Into<RowValues>) -> Self {
        self.condition("WHERE", column, operator, value.into())
    }

    /// `AND <column> <operator> ?`
    #[must_use]
    pub fn and(self, column: &str, operator: &str, value: impl Into<RowValues>) -> Self {
        self.condition("AND", column, operator, value.into())
    }

    /// `OR <column> <operator> ?`
    #[must_use]
    pub fn or(self, column: &str, operator: &str, value: impl Into<RowValues>) -> Self {
        self.condition("OR", column, operator, value.into())
    }

    /// `WHERE <fragment>`, unescaped.
    #[must_use]
    pub fn where_raw(self, fragment: &str) -> Self {
        self.push(format!("WHERE {fragment}"))
    }

    /// `AND <fragment>`, unescaped.
    #[must_use]
    pub fn and_raw(self, fragment: &str) -> Self {
        self.push(format!("AND {fragment}"))
    }

    /// `OR <fragment>`, unescaped.
    #[must_use]
    pub fn or_raw(self, fragment: &str) -> Self {
        self.push(format!("OR {fragment}"))
    }

    /// `WHERE EXISTS ( ... )` around whatever `build` appends.
    #[must_use]
    pub fn where_exists<F>(self, build: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        build(self.push("WHERE EXISTS (".to_string())).push(")".to_string())
    }

    /// `ORDER BY <column> <direction>`
    #[must_use]
    pub fn order_by(self, column: &str, direction: SortDirection) -> Self {
        self.push(format!("ORDER BY {column} {direction}"))
    }

    #[must_use]
    pub fn limit(self, limit: u64) -> Self {
        self.push(format!("LIMIT {limit}"))
    }

    /// Alias for [`StatementBuilder::limit`].
    #[must_use]
    pub fn take(self, limit: u64) -> Self {
        self.limit(limit)
    }

    #[must_use]
    pub fn offset(self, offset: u64) -> Self {
        self.push(format!("OFFSET {offset}"))
    }

    /// Alias for [`StatementBuilder::offset`].
    #[must_use]
    pub fn skip(self, offset: u64) -> Self {
        self.offset(offset)
    }

    /// Apply `then` only if `condition` holds.
    #[must_use]
    pub fn when<F>(self, condition: bool, then: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition { then(self) } else { self }
    }

    /// Apply `then` if `condition` holds, `otherwise` if it does not.
    #[must_use]
    pub fn when_else<F, G>(self, condition: bool, then: F, otherwise: G) -> Self
    where
        F: FnOnce(Self) -> Self,
        G: FnOnce(Self) -> Self,
    {
        if condition { then(self) } else { otherwise(self) }
    }

    fn condition(self, keyword: &str, column: &str, operator: &str, value: RowValues) -> Self {
        self.push_bound(format!("{keyword} {column} {operator} ?"), value)
    }
}
