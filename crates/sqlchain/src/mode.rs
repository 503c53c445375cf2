//! Statement mode state machine.
//!
//! A statement starts `Empty`. The first opening clause classifies it as a
//! read (`SELECT ...`) or a write (`UPDATE`, `INSERT`, `DELETE`, `TRUNCATE`);
//! the classification sticks until [`BuilderState::reset`].

use crate::error::{QueryError, QueryResult};
use crate::value::Value;

/// Classification of the statement being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Nothing assembled yet.
    #[default]
    Empty,
    /// A row-producing statement.
    Read,
    /// A data-mutating statement.
    Write,
}

impl Mode {
    pub fn is_empty(self) -> bool {
        self == Mode::Empty
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Empty => "empty",
            Mode::Read => "read",
            Mode::Write => "write",
        }
    }
}

/// Accumulated statement text, bound values and mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuilderState {
    pub(crate) text: String,
    pub(crate) values: Vec<Value>,
    pub(crate) mode: Mode,
}

impl BuilderState {
    /// A fresh state in [`Mode::Empty`].
    pub fn new() -> Self {
        Self {
            text: String::new(),
            values: Vec::new(),
            mode: Mode::Empty,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Classify the statement if nothing has classified it yet.
    pub(crate) fn open(&mut self, mode: Mode) {
        if self.mode.is_empty() {
            self.mode = mode;
        }
    }

    /// Clause-continuations need a preceding opening clause.
    pub(crate) fn require_opened(&self, clause: &str) -> QueryResult<()> {
        if self.mode.is_empty() {
            return Err(QueryError::invalid_sequence(format!(
                "{clause} clause cannot be at the beginning of the query"
            )));
        }
        Ok(())
    }

    /// `DELETE` and `TRUNCATE` must start a fresh statement.
    pub(crate) fn require_empty(&self, clause: &str) -> QueryResult<()> {
        if !self.mode.is_empty() {
            return Err(QueryError::invalid_sequence(format!(
                "{clause} must be the first clause of a statement (current mode: {})",
                self.mode.as_str()
            )));
        }
        Ok(())
    }

    pub(crate) fn push_str(&mut self, sql: &str) {
        self.text.push_str(sql);
    }

    pub(crate) fn extend_values(&mut self, values: impl IntoIterator<Item = Value>) {
        self.values.extend(values);
    }

    /// Move the accumulated statement out, leaving an `Empty` state behind.
    pub(crate) fn take(&mut self) -> BuilderState {
        std::mem::take(self)
    }

    /// Return to [`Mode::Empty`] with no text and no values.
    pub fn reset(&mut self) {
        self.text.clear();
        self.values.clear();
        self.mode = Mode::Empty;
    }
}
