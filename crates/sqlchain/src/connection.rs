//! Connection capability consumed by the executor.
//!
//! The builder never talks to a driver directly. Anything that can prepare a
//! statement, execute it with positional values and hand back rows can be
//! plugged in: [`PgConnection`](crate::PgConnection) for Postgres, or an
//! in-memory fake in tests.

use crate::error::QueryResult;
use crate::row::Row;
use crate::value::Value;
use std::future::Future;

/// A database connection able to prepare statements.
///
/// Statement text uses `?` positional placeholders; implementations that
/// need another marker style rewrite it in [`Connection::prepare`].
pub trait Connection: Send + Sync {
    /// Prepared statement handle borrowing the connection.
    type Statement<'c>: PreparedStatement + Send
    where
        Self: 'c;

    /// Prepare `sql` for execution.
    fn prepare<'c>(
        &'c self,
        sql: &str,
    ) -> impl Future<Output = QueryResult<Self::Statement<'c>>> + Send;
}

/// A prepared statement.
///
/// [`PreparedStatement::execute`] must be called before fetching.
pub trait PreparedStatement {
    /// Bind `params` positionally and execute.
    ///
    /// Returns the number of rows affected (for writes) or produced (for
    /// reads), as reported by the driver.
    fn execute(&mut self, params: &[Value]) -> impl Future<Output = QueryResult<u64>> + Send;

    /// Next row of the result set, or `None` once exhausted.
    fn fetch_one(&mut self) -> impl Future<Output = QueryResult<Option<Row>>> + Send;

    /// Every remaining row of the result set.
    fn fetch_all(&mut self) -> impl Future<Output = QueryResult<Vec<Row>>> + Send;
}
