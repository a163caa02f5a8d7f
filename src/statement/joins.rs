use std::fmt;

use super::{StatementBuilder, quote_identifier};

/// Join flavours accepted by [`StatementBuilder::join_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Join,
    Inner,
    Left,
    LeftOuter,
    Right,
    RightOuter,
    Outer,
    Cross,
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinKind::Join => "JOIN",
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::LeftOuter => "LEFT OUTER JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::RightOuter => "RIGHT OUTER JOIN",
            JoinKind::Outer => "OUTER JOIN",
            JoinKind::Cross => "CROSS JOIN",
        })
    }
}

impl StatementBuilder {
    /// Append `<kind> <table>` and run `on` immediately so its fragments follow the join.
    #[must_use]
    pub fn join_kind<F>(self, kind: JoinKind, table: &str, on: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        on(self.push(format!("{kind} {}", quote_identifier(table))))
    }

    #[must_use]
    pub fn join<F>(self, table: &str, on: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.join_kind(JoinKind::Join, table, on)
    }

    #[must_use]
    pub fn inner_join<F>(self, table: &str, on: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.join_kind(JoinKind::Inner, table, on)
    }

    #[must_use]
    pub fn left_join<F>(self, table: &str, on: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.join_kind(JoinKind::Left, table, on)
    }

    #[must_use]
    pub fn left_outer_join<F>(self, table: &str, on: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.join_kind(JoinKind::LeftOuter, table, on)
    }

    #[must_use]
    pub fn right_join<F>(self, table: &str, on: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.join_kind(JoinKind::Right, table, on)
    }

    #[must_use]
    pub fn right_outer_join<F>(self, table: &str, on: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.join_kind(JoinKind::RightOuter, table, on)
    }

    #[must_use]
    pub fn outer_join<F>(self, table: &str, on: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.join_kind(JoinKind::Outer, table, on)
    }

    /// `CROSS JOIN <table>`; takes no condition.
    #[must_use]
    pub fn cross_join(self, table: &str) -> Self {
        self.push(format!("{} {}", JoinKind::Cross, quote_identifier(table)))
    }

    /// `ON <column> <operator> <value>` with `value` written into the SQL as-is.
    ///
    /// Unlike [`StatementBuilder::where_`] nothing is bound, which is what lets the
    /// right-hand side name another column. Never pass untrusted input here.
    #[must_use]
    pub fn on(self, column: &str, operator: &str, value: impl fmt::Display) -> Self {
        self.push(format!("ON {column} {operator} {value}"))
    }

    /// `ON <fragment>`, unescaped.
    #[must_use]
    pub fn on_raw(self, fragment: &str) -> Self {
        self.push(format!("ON {fragment}"))
    }
}
