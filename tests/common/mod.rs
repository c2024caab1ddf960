//! Scripted connection provider for exercising the invoker and actions
//! without a database.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use campus_records::db::value::{ResultRow, SpParam};
use campus_records::db::{ConnectionProvider, ProcedureClient};
use campus_records::error::{DbError, DbResult};

/// Shared script and observation log for one test.
#[derive(Default)]
pub struct FakeState {
    /// Rows returned by every query.
    pub rows: Vec<ResultRow>,
    /// Affected-row count returned by every execute.
    pub affected: u64,
    pub fail_acquire: bool,
    pub fail_query: bool,
    pub fail_execute: bool,
    pub fail_commit: bool,
    pub fail_rollback: bool,

    pub acquired: usize,
    pub closed: usize,
    pub begins: usize,
    pub commits: usize,
    pub rollbacks: usize,
    /// Every statement text handed to query or execute, in order.
    pub statements: Vec<String>,
}

/// Connection provider backed by a [`FakeState`] script.
#[derive(Clone)]
pub struct FakeProvider {
    state: Arc<Mutex<FakeState>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::with_state(FakeState::default())
    }

    pub fn with_state(state: FakeState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn returning_rows(rows: Vec<ResultRow>) -> Self {
        Self::with_state(FakeState {
            rows,
            ..FakeState::default()
        })
    }

    pub fn state(&self) -> Arc<Mutex<FakeState>> {
        self.state.clone()
    }
}

#[async_trait]
impl ConnectionProvider for FakeProvider {
    async fn acquire(&self) -> DbResult<Box<dyn ProcedureClient>> {
        let mut state = self.state.lock().unwrap();
        if state.fail_acquire {
            return Err(DbError::connection("scripted acquire failure"));
        }
        state.acquired += 1;
        Ok(Box::new(FakeClient {
            state: self.state.clone(),
        }))
    }
}

struct FakeClient {
    state: Arc<Mutex<FakeState>>,
}

#[async_trait]
impl ProcedureClient for FakeClient {
    async fn query(&mut self, sql: &str, _params: &[SpParam]) -> DbResult<Vec<ResultRow>> {
        let mut state = self.state.lock().unwrap();
        state.statements.push(sql.to_string());
        if state.fail_query {
            return Err(DbError::query("scripted query failure", None));
        }
        Ok(state.rows.clone())
    }

    async fn execute(&mut self, sql: &str, _params: &[SpParam]) -> DbResult<u64> {
        let mut state = self.state.lock().unwrap();
        state.statements.push(sql.to_string());
        if state.fail_execute {
            return Err(DbError::non_query("scripted execute failure", None));
        }
        Ok(state.affected)
    }

    async fn begin(&mut self) -> DbResult<()> {
        self.state.lock().unwrap().begins += 1;
        Ok(())
    }

    async fn commit(&mut self) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_commit {
            return Err(DbError::non_query("scripted commit failure", None));
        }
        state.commits += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        state.rollbacks += 1;
        if state.fail_rollback {
            return Err(DbError::non_query("scripted rollback failure", None));
        }
        Ok(())
    }

    async fn close(self: Box<Self>) -> DbResult<()> {
        self.state.lock().unwrap().closed += 1;
        Ok(())
    }
}
