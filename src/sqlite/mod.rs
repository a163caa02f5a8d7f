//! Bundled `SQLite` backend.
//!
//! `SQLite` natively uses `?` positional placeholders, so finalized statements are
//! passed to `rusqlite` unchanged.

mod driver;
pub mod params;
pub mod query;

pub use driver::SqliteDriver;
pub use params::{Params, row_value_to_sqlite_value, sqlite_value_to_row_value};
