#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sql_chain::prelude::*;

/// One call observed by [`RecordingDriver`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Connect,
    Disconnect,
    Prepare(StatementId, String),
    Bind(StatementId, String, Vec<RowValues>),
    Execute(StatementId),
    FetchRows(StatementId),
    Close(StatementId),
}

/// Which step the driver should fail at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailAt {
    #[default]
    Nothing,
    Connect,
    Prepare,
    Bind,
    Execute,
    Fetch,
    Close,
}

#[derive(Debug, Default)]
struct Script {
    calls: Vec<Call>,
    fail_at: Vec<FailAt>,
    insert_id: i64,
    rows: Option<ResultSet>,
    rows_affected: usize,
}

/// Shared view of a [`RecordingDriver`] that stays with the test after the driver
/// moves into a connection.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    script: Arc<Mutex<Script>>,
}

impl Recorder {
    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Add a step to fail at; may be called more than once.
    pub fn fail_at(&self, step: FailAt) {
        self.lock().fail_at.push(step);
    }

    pub fn report_insert_id(&self, id: i64) {
        self.lock().insert_id = id;
    }

    pub fn report_rows_affected(&self, n: usize) {
        self.lock().rows_affected = n;
    }

    pub fn respond_with(&self, rows: ResultSet) {
        self.lock().rows = Some(rows);
    }

    pub fn clear(&self) {
        self.lock().calls.clear();
    }

    pub fn executed(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Execute(_)))
            .count()
    }

    pub fn prepared_sql(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Prepare(_, sql) => Some(sql),
                _ => None,
            })
            .collect()
    }
}

/// Driver that records every call and fails on demand.
#[derive(Debug)]
pub struct RecordingDriver {
    recorder: Recorder,
    connected: bool,
}

impl RecordingDriver {
    pub fn new() -> (Self, Recorder) {
        let recorder = Recorder::default();
        (
            Self {
                recorder: recorder.clone(),
                connected: false,
            },
            recorder,
        )
    }

    fn step(&self, call: Call, step: FailAt, err: fn(String) -> SqlChainError) -> SqlResult<()> {
        let mut script = self.recorder.lock();
        script.calls.push(call);
        if script.fail_at.contains(&step) {
            return Err(err(format!("scripted failure at {step:?}")));
        }
        Ok(())
    }
}

impl Driver for RecordingDriver {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn connect(&mut self, _config: &ConnectionConfig) -> SqlResult<()> {
        self.step(Call::Connect, FailAt::Connect, SqlChainError::ConnectionError)?;
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn disconnect(&mut self) -> SqlResult<()> {
        self.connected = false;
        self.step(Call::Disconnect, FailAt::Nothing, SqlChainError::Other)
    }

    fn escape_string(&self, text: &str) -> String {
        text.replace('\'', "\\'")
    }

    fn prepare(&mut self, id: StatementId, sql: &str) -> SqlResult<()> {
        self.step(
            Call::Prepare(id, sql.to_string()),
            FailAt::Prepare,
            SqlChainError::PreparationError,
        )
    }

    fn bind(&mut self, id: StatementId, tags: &[TypeTag], values: &[RowValues]) -> SqlResult<()> {
        let tags: String = tags.iter().map(|t| t.as_char()).collect();
        self.step(
            Call::Bind(id, tags, values.to_vec()),
            FailAt::Bind,
            SqlChainError::BindingError,
        )
    }

    fn execute(&mut self, id: StatementId) -> SqlResult<usize> {
        self.step(Call::Execute(id), FailAt::Execute, SqlChainError::ExecutionError)?;
        Ok(self.recorder.lock().rows_affected)
    }

    fn last_insert_id(&self, _id: StatementId) -> i64 {
        self.recorder.lock().insert_id
    }

    fn fetch_rows(&mut self, id: StatementId) -> SqlResult<ResultSet> {
        self.step(Call::FetchRows(id), FailAt::Fetch, SqlChainError::FetchError)?;
        Ok(self.recorder.lock().rows.clone().unwrap_or_default())
    }

    fn close_statement(&mut self, id: StatementId) -> SqlResult<()> {
        self.step(Call::Close(id), FailAt::Close, SqlChainError::Other)
    }
}

/// A connection over a fresh [`RecordingDriver`].
pub fn recorded_connection(name: &str) -> (ConnectionHandle, Recorder) {
    let (driver, recorder) = RecordingDriver::new();
    let handle = ConnectionHandle::new(name, ConnectionConfig::new("recorded"), driver);
    (handle, recorder)
}

/// A connection to a private in-memory SQLite database.
#[cfg(feature = "sqlite")]
pub fn memory_connection(name: &str) -> ConnectionHandle {
    ConnectionHandle::sqlite(name, ConnectionConfig::new(":memory:"))
}
