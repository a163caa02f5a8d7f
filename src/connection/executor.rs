//! The prepared-statement lifecycle run for every [`super::ConnectionHandle::execute_sql`].
//!
//! ```text
//! Closed -> Open -> Preparing -> Prepared -> Bound -> Executed -> [FetchingRows] -> Released
//! ```
//!
//! The statement id is released on every path once it has been issued, so no
//! prepared statement outlives the call that created it.

use std::fmt;

use tracing::{debug, trace, warn};

use super::ConnectionState;
use crate::driver::StatementId;
use crate::error::{SqlChainError, SqlResult};
use crate::results::ResultSet;
use crate::types::{RowValues, TypeTag};

/// Lifecycle position of a statement inside the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExecPhase {
    Closed,
    Open,
    Preparing,
    Prepared,
    Bound,
    Executed,
    FetchingRows,
    Released,
}

impl fmt::Display for ExecPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecPhase::Closed => "closed",
            ExecPhase::Open => "open",
            ExecPhase::Preparing => "preparing",
            ExecPhase::Prepared => "prepared",
            ExecPhase::Bound => "bound",
            ExecPhase::Executed => "executed",
            ExecPhase::FetchingRows => "fetching_rows",
            ExecPhase::Released => "released",
        };
        f.write_str(name)
    }
}

/// What a finished statement reports back.
#[derive(Debug, Clone, Default)]
pub struct ExecOutcome {
    pub rows_affected: usize,
    /// Insert id reported for this statement, `0` when it inserted nothing.
    pub last_insert_id: i64,
    /// Present only when rows were requested.
    pub rows: Option<ResultSet>,
}

impl ExecOutcome {
    /// The fetched rows, or an empty set when none were requested.
    #[must_use]
    pub fn into_rows(self) -> ResultSet {
        self.rows.unwrap_or_default()
    }
}

pub(crate) struct ExecRequest {
    pub(crate) sql: String,
    pub(crate) type_tags: String,
    pub(crate) values: Vec<RowValues>,
    pub(crate) return_rows: bool,
}

/// Parse a tag string and check it against the values it describes.
///
/// # Errors
/// Returns `SqlChainError::BindingError` for an unknown tag character or when the
/// number of tags differs from the number of values.
pub fn parse_type_tags(type_tags: &str, values: &[RowValues]) -> SqlResult<Vec<TypeTag>> {
    let tags = type_tags
        .chars()
        .map(|c| {
            TypeTag::from_char(c).ok_or_else(|| {
                SqlChainError::BindingError(format!("unknown type tag '{c}' in \"{type_tags}\""))
            })
        })
        .collect::<SqlResult<Vec<_>>>()?;
    if tags.len() != values.len() {
        return Err(SqlChainError::BindingError(format!(
            "{} type tags for {} values",
            tags.len(),
            values.len()
        )));
    }
    Ok(tags)
}

pub(crate) fn run(
    state: &mut ConnectionState,
    connection: &str,
    request: &ExecRequest,
) -> SqlResult<ExecOutcome> {
    state.ensure_open(connection)?;

    let id = state.issue_statement_id();
    state.prepared.insert(id);
    trace!(connection, statement = %id, sql = %request.sql, "preparing statement");

    let mut phase = ExecPhase::Open;
    let result = drive(state, id, request, &mut phase);
    let released = release(state, id);

    match (result, released) {
        (Ok(outcome), Ok(())) => {
            debug!(
                connection,
                statement = %id,
                params = request.values.len(),
                rows_affected = outcome.rows_affected,
                "statement executed"
            );
            Ok(outcome)
        }
        (Ok(_), Err(release_err)) => Err(release_err),
        (Err(err), Ok(())) => {
            debug!(connection, statement = %id, %phase, "statement failed");
            Err(err)
        }
        (Err(err), Err(release_err)) => {
            warn!(
                connection,
                statement = %id,
                %phase,
                error = %release_err,
                "failed to release statement after error"
            );
            Err(err)
        }
    }
}

fn drive(
    state: &mut ConnectionState,
    id: StatementId,
    request: &ExecRequest,
    phase: &mut ExecPhase,
) -> SqlResult<ExecOutcome> {
    *phase = ExecPhase::Preparing;
    state.driver.prepare(id, &request.sql)?;
    *phase = ExecPhase::Prepared;

    // Arity is checked here so a malformed request never reaches the driver's bind.
    let tags = parse_type_tags(&request.type_tags, &request.values)?;
    if !request.values.is_empty() {
        state.driver.bind(id, &tags, &request.values)?;
    }
    *phase = ExecPhase::Bound;

    let rows_affected = state.driver.execute(id)?;
    *phase = ExecPhase::Executed;

    let last_insert_id = state.driver.last_insert_id(id);
    state.insert_id = last_insert_id;

    let rows = if request.return_rows {
        *phase = ExecPhase::FetchingRows;
        let mut rows = state.driver.fetch_rows(id)?;
        rows.rows_affected = rows_affected;
        Some(rows)
    } else {
        None
    };

    Ok(ExecOutcome {
        rows_affected,
        last_insert_id,
        rows,
    })
}

fn release(state: &mut ConnectionState, id: StatementId) -> SqlResult<()> {
    state.prepared.remove(&id);
    state.driver.close_statement(id)?;
    trace!(statement = %id, phase = %ExecPhase::Released, "statement released");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_must_match_values() {
        let values = vec![RowValues::Int(1), RowValues::Text("a".into())];
        let tags = parse_type_tags("is", &values).unwrap();
        assert_eq!(tags, [TypeTag::Integer, TypeTag::String]);

        assert!(parse_type_tags("i", &values).unwrap_err().is_binding_error());
        assert!(parse_type_tags("ix", &values).unwrap_err().is_binding_error());
        assert!(parse_type_tags("", &[]).unwrap().is_empty());
    }

    #[test]
    fn phases_are_ordered() {
        assert!(ExecPhase::Closed < ExecPhase::Preparing);
        assert!(ExecPhase::Bound < ExecPhase::Executed);
        assert_eq!(ExecPhase::FetchingRows.to_string(), "fetching_rows");
    }

    #[test]
    fn outcome_without_rows_is_empty() {
        let outcome = ExecOutcome {
            rows_affected: 3,
            ..ExecOutcome::default()
        };
        assert!(outcome.into_rows().is_empty());
    }
}
