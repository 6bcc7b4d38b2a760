//! In-memory connector used by unit tests.
//!
//! Each environment name maps to a fake database holding tables of rows.
//! Every call made through the fake is recorded so tests can assert on
//! opens, transactions and closes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::EnvironmentProfile;
use crate::core::snapshot::{Row, TableSnapshot};
use crate::core::traits::{Connection, Connector};
use crate::core::value::SqlValue;
use crate::drivers::common::SslMode;
use crate::error::{DriverError, DriverResult};
use crate::events::{CopyEvent, CopyReporter};

/// A call observed by the fake.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open(String),
    Query(String, String),
    Describe(String, String),
    Begin(String),
    Execute(String, usize),
    Commit(String),
    Rollback(String),
    Close(String),
}

#[derive(Debug, Default, Clone)]
pub struct FakeTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Failure switches for one fake database.
#[derive(Debug, Default, Clone)]
pub struct Faults {
    pub open: Option<String>,
    pub query: Option<String>,
    pub execute: Option<String>,
    pub commit: Option<String>,
    pub rollback: Option<String>,
    pub close: Option<String>,
}

#[derive(Debug, Default)]
struct FakeDatabase {
    tables: HashMap<String, FakeTable>,
    faults: Faults,
}

#[derive(Debug, Default)]
struct State {
    databases: HashMap<String, FakeDatabase>,
    calls: Vec<Call>,
}

/// Connector whose databases live in memory.
#[derive(Debug, Clone, Default)]
pub struct FakeConnector {
    state: Arc<Mutex<State>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a table in an environment's database.
    pub fn with_table(self, environment: &str, table: &str, columns: &[&str], rows: Vec<Row>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let db = state.databases.entry(environment.to_string()).or_default();
            db.tables.insert(
                table.to_string(),
                FakeTable {
                    columns: columns.iter().map(|c| c.to_string()).collect(),
                    rows,
                },
            );
        }
        self
    }

    /// Set failure switches for an environment.
    pub fn with_faults(self, environment: &str, faults: Faults) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state
                .databases
                .entry(environment.to_string())
                .or_default()
                .faults = faults;
        }
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn rows(&self, environment: &str, table: &str) -> Vec<Row> {
        let state = self.state.lock().unwrap();
        state
            .databases
            .get(environment)
            .and_then(|db| db.tables.get(table))
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    /// Open a connection directly, bypassing a profile.
    pub fn connect(&self, environment: &str) -> Box<dyn Connection> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(Call::Open(environment.to_string()));
        Box::new(FakeConnection {
            environment: environment.to_string(),
            state: self.state.clone(),
            staged: None,
        })
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn open(&self, profile: &EnvironmentProfile) -> DriverResult<Box<dyn Connection>> {
        let fault = {
            let state = self.state.lock().unwrap();
            state
                .databases
                .get(&profile.environment)
                .and_then(|db| db.faults.open.clone())
        };
        if let Some(message) = fault {
            self.state
                .lock()
                .unwrap()
                .calls
                .push(Call::Open(profile.environment.clone()));
            return Err(DriverError::message(message));
        }
        Ok(self.connect(&profile.environment))
    }
}

/// Pending inserts for an open transaction: (table, rows).
type Staged = Vec<(String, Vec<Row>)>;

struct FakeConnection {
    environment: String,
    state: Arc<Mutex<State>>,
    staged: Option<Staged>,
}

impl FakeConnection {
    fn fault(&self, state: &State, pick: impl Fn(&Faults) -> Option<String>) -> Option<DriverError> {
        state
            .databases
            .get(&self.environment)
            .and_then(|db| pick(&db.faults))
            .map(DriverError::message)
    }

    fn table<'a>(&self, state: &'a State, name: &str) -> DriverResult<&'a FakeTable> {
        state
            .databases
            .get(&self.environment)
            .and_then(|db| db.tables.get(name))
            .ok_or_else(|| DriverError::message(format!("relation \"{}\" does not exist", name)))
    }
}

/// Last identifier after `keyword`, with quotes and schema prefix stripped.
fn table_after(sql: &str, keyword: &str) -> String {
    let rest = sql.split(keyword).nth(1).unwrap_or_default();
    let ident = rest.split_whitespace().next().unwrap_or_default();
    ident
        .rsplit("\".\"")
        .next()
        .unwrap_or_default()
        .trim_matches('"')
        .to_string()
}

#[async_trait]
impl Connection for FakeConnection {
    async fn query(&mut self, sql: &str) -> DriverResult<TableSnapshot> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Query(self.environment.clone(), sql.to_string()));
        if let Some(err) = self.fault(&state, |f| f.query.clone()) {
            return Err(err);
        }
        let table = self.table(&state, &table_after(sql, "FROM "))?;
        Ok(TableSnapshot::new(table.columns.clone(), table.rows.clone()))
    }

    async fn describe(&mut self, sql: &str) -> DriverResult<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Describe(self.environment.clone(), sql.to_string()));
        if let Some(err) = self.fault(&state, |f| f.query.clone()) {
            return Err(err);
        }
        Ok(self.table(&state, &table_after(sql, "FROM "))?.columns.clone())
    }

    async fn begin(&mut self) -> DriverResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Begin(self.environment.clone()));
        self.staged = Some(Vec::new());
        Ok(())
    }

    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> DriverResult<u64> {
        let mut state = self.state.lock().unwrap();
        let name = table_after(sql, "INSERT INTO ");
        let width = self.table(&state, &name)?.columns.len().max(1);
        let rows: Vec<Row> = params.chunks(width).map(|c| c.to_vec()).collect();
        state.calls.push(Call::Execute(self.environment.clone(), rows.len()));
        if let Some(err) = self.fault(&state, |f| f.execute.clone()) {
            return Err(err);
        }
        let count = rows.len() as u64;
        match self.staged.as_mut() {
            Some(staged) => staged.push((name, rows)),
            None => {
                if let Some(db) = state.databases.get_mut(&self.environment) {
                    if let Some(table) = db.tables.get_mut(&name) {
                        table.rows.extend(rows);
                    }
                }
            }
        }
        Ok(count)
    }

    async fn commit(&mut self) -> DriverResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Commit(self.environment.clone()));
        if let Some(err) = self.fault(&state, |f| f.commit.clone()) {
            return Err(err);
        }
        let staged = self.staged.take().unwrap_or_default();
        if let Some(db) = state.databases.get_mut(&self.environment) {
            for (name, rows) in staged {
                if let Some(table) = db.tables.get_mut(&name) {
                    table.rows.extend(rows);
                }
            }
        }
        Ok(())
    }

    async fn rollback(&mut self) -> DriverResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Rollback(self.environment.clone()));
        self.staged = None;
        if let Some(err) = self.fault(&state, |f| f.rollback.clone()) {
            return Err(err);
        }
        Ok(())
    }

    async fn close(self: Box<Self>) -> DriverResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Close(self.environment.clone()));
        match self.fault(&state, |f| f.close.clone()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Build a profile without going through the config store.
pub fn profile(environment: &str, host: &str, database: &str, table: &str) -> EnvironmentProfile {
    EnvironmentProfile {
        environment: environment.to_string(),
        host: host.to_string(),
        port: 5432,
        database: database.to_string(),
        user: "u".to_string(),
        password: "p".to_string(),
        schema: None,
        table: table.to_string(),
        ssl_mode: SslMode::Require,
    }
}

/// The two-row `orders` fixture: `(1, 9.99), (2, 4.50)`.
pub fn orders_rows() -> Vec<Row> {
    vec![
        vec![SqlValue::I32(1), SqlValue::F64(9.99)],
        vec![SqlValue::I32(2), SqlValue::F64(4.50)],
    ]
}

/// Reporter that keeps every event it receives.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<CopyEvent>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<CopyEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl CopyReporter for RecordingReporter {
    fn report(&self, event: &CopyEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
