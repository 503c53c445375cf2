//! Fetch strategies and terminal results.

use crate::connection::PreparedStatement;
use crate::error::{QueryError, QueryResult};
use crate::row::Row;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// How rows of a read statement are materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStrategy {
    /// The first row, if any.
    #[default]
    One,
    /// Every row.
    All,
    /// The first column of the first row, if any.
    Column,
}

impl FetchStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchStrategy::One => "one",
            FetchStrategy::All => "all",
            FetchStrategy::Column => "column",
        }
    }

    /// Materialize the rows of an executed statement.
    pub(crate) async fn fetch<S: PreparedStatement>(self, stmt: &mut S) -> QueryResult<QueryOutput> {
        match self {
            FetchStrategy::One => fetch_one(stmt).await,
            FetchStrategy::All => fetch_all(stmt).await,
            FetchStrategy::Column => fetch_column(stmt).await,
        }
    }
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FetchStrategy {
    type Err = QueryError;

    /// Accepts `one`/`fetch`, `all`/`fetchAll`/`fetch_all` and
    /// `column`/`fetchColumn`/`fetch_column`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one" | "fetch" | "fetch_one" | "fetchOne" => Ok(FetchStrategy::One),
            "all" | "fetchAll" | "fetch_all" => Ok(FetchStrategy::All),
            "column" | "fetchColumn" | "fetch_column" => Ok(FetchStrategy::Column),
            other => Err(QueryError::UnsupportedFetchStrategy(other.to_string())),
        }
    }
}

async fn fetch_one<S: PreparedStatement>(stmt: &mut S) -> QueryResult<QueryOutput> {
    Ok(QueryOutput::Row(stmt.fetch_one().await?))
}

async fn fetch_all<S: PreparedStatement>(stmt: &mut S) -> QueryResult<QueryOutput> {
    Ok(QueryOutput::Rows(stmt.fetch_all().await?))
}

async fn fetch_column<S: PreparedStatement>(stmt: &mut S) -> QueryResult<QueryOutput> {
    let row = stmt.fetch_one().await?;
    Ok(QueryOutput::Column(row.and_then(Row::into_first)))
}

/// Result of a terminal `result` call.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    /// No statement was assembled.
    Empty,
    /// [`FetchStrategy::One`] result.
    Row(Option<Row>),
    /// [`FetchStrategy::All`] result.
    Rows(Vec<Row>),
    /// [`FetchStrategy::Column`] result.
    Column(Option<Value>),
    /// Rows affected by a write statement.
    Affected(u64),
}

impl QueryOutput {
    pub fn is_empty(&self) -> bool {
        matches!(self, QueryOutput::Empty)
    }

    /// Rows of the output: all rows, the single row (if any), or none.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            QueryOutput::Rows(rows) => rows,
            QueryOutput::Row(row) => row.into_iter().collect(),
            _ => Vec::new(),
        }
    }

    /// The single row of a [`FetchStrategy::One`] result.
    pub fn into_row(self) -> Option<Row> {
        match self {
            QueryOutput::Row(row) => row,
            QueryOutput::Rows(rows) => rows.into_iter().next(),
            _ => None,
        }
    }

    /// The scalar of a [`FetchStrategy::Column`] result.
    pub fn into_value(self) -> Option<Value> {
        match self {
            QueryOutput::Column(value) => value,
            QueryOutput::Row(row) => row.and_then(Row::into_first),
            _ => None,
        }
    }

    /// Affected-row count of a write statement.
    pub fn affected(&self) -> Option<u64> {
        match self {
            QueryOutput::Affected(n) => Some(*n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!("fetch".parse::<FetchStrategy>().unwrap(), FetchStrategy::One);
        assert_eq!("fetchAll".parse::<FetchStrategy>().unwrap(), FetchStrategy::All);
        assert_eq!("column".parse::<FetchStrategy>().unwrap(), FetchStrategy::Column);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "fetchObject".parse::<FetchStrategy>().unwrap_err();
        assert!(err.is_unsupported_fetch_strategy());
        assert!(err.to_string().contains("fetchObject"));
    }

    #[test]
    fn output_accessors() {
        let row = Row::new().with("n", 3);
        assert_eq!(QueryOutput::Row(Some(row.clone())).into_rows(), vec![row.clone()]);
        assert_eq!(QueryOutput::Row(Some(row)).into_value(), Some(Value::Int(3)));
        assert_eq!(QueryOutput::Affected(2).affected(), Some(2));
        assert!(QueryOutput::Empty.into_rows().is_empty());
    }
}
