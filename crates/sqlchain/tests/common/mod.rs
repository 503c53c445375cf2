#![allow(dead_code)]

use sqlchain::{Connection, PreparedStatement, QueryError, QueryResult, Row, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Recording connection: remembers every prepared statement and the values
/// it was executed with, and serves canned rows.
#[derive(Default)]
pub struct RecordingConnection {
    pub executed: Mutex<Vec<(String, Vec<Value>)>>,
    pub rows: Vec<Row>,
    pub fail_on: Option<&'static str>,
}

impl RecordingConnection {
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Fail any statement whose text contains `needle`.
    pub fn failing_on(needle: &'static str) -> Self {
        Self {
            fail_on: Some(needle),
            ..Self::default()
        }
    }

    pub fn executed(&self) -> Vec<(String, Vec<Value>)> {
        self.executed.lock().unwrap().clone()
    }
}

impl Connection for RecordingConnection {
    type Statement<'c> = RecordingStatement<'c>;

    async fn prepare<'c>(&'c self, sql: &str) -> QueryResult<RecordingStatement<'c>> {
        if self.fail_on.is_some_and(|needle| sql.contains(needle)) {
            return Err(QueryError::Other(format!("syntax error near {sql:?}")));
        }
        Ok(RecordingStatement {
            conn: self,
            sql: sql.to_string(),
            rows: VecDeque::new(),
        })
    }
}

pub struct RecordingStatement<'c> {
    conn: &'c RecordingConnection,
    sql: String,
    rows: VecDeque<Row>,
}

impl PreparedStatement for RecordingStatement<'_> {
    async fn execute(&mut self, params: &[Value]) -> QueryResult<u64> {
        self.conn
            .executed
            .lock()
            .unwrap()
            .push((self.sql.clone(), params.to_vec()));
        if self.sql.starts_with("SELECT") {
            self.rows = self.conn.rows.iter().cloned().collect();
            Ok(self.rows.len() as u64)
        } else {
            Ok(params.len() as u64)
        }
    }

    async fn fetch_one(&mut self) -> QueryResult<Option<Row>> {
        Ok(self.rows.pop_front())
    }

    async fn fetch_all(&mut self) -> QueryResult<Vec<Row>> {
        Ok(self.rows.drain(..).collect())
    }
}
