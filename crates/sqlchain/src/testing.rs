//! In-memory connection used by unit tests.

use crate::connection::{Connection, PreparedStatement};
use crate::error::{QueryError, QueryResult};
use crate::row::Row;
use crate::value::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// What the fake saw, in call order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Prepare(String),
    Execute(Vec<Value>),
}

#[derive(Default)]
pub(crate) struct FakeConnection {
    calls: Mutex<Vec<Call>>,
    rows: Vec<Row>,
    affected: u64,
    fail_execute: Option<String>,
}

impl FakeConnection {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    pub(crate) fn with_affected(mut self, affected: u64) -> Self {
        self.affected = affected;
        self
    }

    pub(crate) fn failing(mut self, message: &str) -> Self {
        self.fail_execute = Some(message.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Connection for FakeConnection {
    type Statement<'c> = FakeStatement<'c>;

    async fn prepare<'c>(&'c self, sql: &str) -> QueryResult<FakeStatement<'c>> {
        self.record(Call::Prepare(sql.to_string()));
        Ok(FakeStatement {
            conn: self,
            rows: VecDeque::new(),
        })
    }
}

pub(crate) struct FakeStatement<'c> {
    conn: &'c FakeConnection,
    rows: VecDeque<Row>,
}

impl PreparedStatement for FakeStatement<'_> {
    async fn execute(&mut self, params: &[Value]) -> QueryResult<u64> {
        self.conn.record(Call::Execute(params.to_vec()));
        if let Some(message) = &self.conn.fail_execute {
            return Err(QueryError::Other(message.clone()));
        }
        self.rows = self.conn.rows.iter().cloned().collect();
        if self.rows.is_empty() {
            Ok(self.conn.affected)
        } else {
            Ok(self.rows.len() as u64)
        }
    }

    async fn fetch_one(&mut self) -> QueryResult<Option<Row>> {
        Ok(self.rows.pop_front())
    }

    async fn fetch_all(&mut self) -> QueryResult<Vec<Row>> {
        Ok(self.rows.drain(..).collect())
    }
}
