//! Fluent statement builder.
//!
//! [`QueryBuilder`] accumulates SQL text and positional values over a chain
//! of clause calls and executes the result against its [`Connection`]. One
//! builder assembles one statement at a time; [`QueryBuilder::result`]
//! executes it and leaves the builder empty for the next one.
//!
//! ```ignore
//! use sqlchain::{FetchStrategy, QueryBuilder, Value};
//!
//! let mut db = QueryBuilder::connect(&opts).await?;
//!
//! let users = db
//!     .select(["id", "name"], "users")
//!     .where_([("status =", "active")])?
//!     .order_by("name")?
//!     .limit(10, None)
//!     .result(FetchStrategy::All)
//!     .await?
//!     .into_rows();
//!
//! db.insert_into("users", &["name", "status"], ["ada", "active"])?
//!     .result(FetchStrategy::One)
//!     .await?;
//! ```

mod columns;


pub use columns::IntoColumns;

use crate::condition::{self, Conditions};
use crate::config::ConnectOptions;
use crate::connection::Connection;
use crate::error::{QueryError, QueryResult};
use crate::executor;
use crate::fetch::{FetchStrategy, QueryOutput};
use crate::mode::{BuilderState, Mode};
use crate::postgres::PgConnection;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Statement builder bound to a shared connection.
///
/// Not meant to be shared between tasks: every clause takes `&mut self`.
pub struct QueryBuilder<C> {
    conn: Arc<C>,
    state: BuilderState,
    default_fetch: FetchStrategy,
}

impl<C> fmt::Debug for QueryBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("conn", &"<connection>")
            .field("state", &self.state)
            .field("default_fetch", &self.default_fetch)
            .finish()
    }
}

impl QueryBuilder<PgConnection> {
    /// Connect to Postgres and create a builder on the new connection.
    pub async fn connect(opts: &ConnectOptions) -> QueryResult<Self> {
        let conn = PgConnection::connect(opts).await?;
        Ok(Self::new(Arc::new(conn)).with_default_fetch(opts.default_fetch))
    }
}

impl<C: Connection> QueryBuilder<C> {
    /// Create a builder on an existing connection.
    pub fn new(conn: Arc<C>) -> Self {
        Self {
            conn,
            state: BuilderState::new(),
            default_fetch: FetchStrategy::default(),
        }
    }

    /// Set the strategy used by [`QueryBuilder::run`].
    pub fn with_default_fetch(mut self, strategy: FetchStrategy) -> Self {
        self.default_fetch = strategy;
        self
    }

    pub fn connection(&self) -> &Arc<C> {
        &self.conn
    }

    /// Statement text assembled so far.
    pub fn sql(&self) -> &str {
        self.state.text()
    }

    /// Values bound so far, in placeholder order.
    pub fn values(&self) -> &[Value] {
        self.state.values()
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    /// `SELECT <columns> FROM <table>`
    pub fn select(&mut self, columns: impl IntoColumns, table: &str) -> &mut Self {
        self.state.open(Mode::Read);
        self.push_select(columns, table);
        self
    }

    /// ` WHERE ...` with conditions joined by `AND`.
    pub fn where_(&mut self, conditions: impl Into<Conditions>) -> QueryResult<&mut Self> {
        self.where_with(conditions, condition::AND)
    }

    /// ` WHERE ...` with conditions joined by `logic`.
    pub fn where_with(
        &mut self,
        conditions: impl Into<Conditions>,
        logic: &str,
    ) -> QueryResult<&mut Self> {
        self.state.require_opened("WHERE")?;
        let fragment = condition::render_where(&conditions.into(), logic)?;
        self.state.push_str(&fragment.sql);
        self.state.extend_values(fragment.values);
        Ok(self)
    }

    /// ` GROUP BY <columns>`
    pub fn group_by(&mut self, columns: impl IntoColumns) -> QueryResult<&mut Self> {
        self.state.require_opened("GROUP BY")?;
        self.state.push_str(" GROUP BY ");
        self.state.push_str(&columns.into_columns());
        Ok(self)
    }

    /// ` ORDER BY <columns>`
    pub fn order_by(&mut self, columns: impl IntoColumns) -> QueryResult<&mut Self> {
        self.state.require_opened("ORDER BY")?;
        self.state.push_str(" ORDER BY ");
        self.state.push_str(&columns.into_columns());
        Ok(self)
    }

    /// ` UPDATE <table> SET <col> = ?, ...`, one bound value per column.
    pub fn update<K, V>(
        &mut self,
        table: &str,
        assignments: impl IntoIterator<Item = (K, V)>,
    ) -> QueryResult<&mut Self>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut sql = format!(" UPDATE {table} SET");
        let mut values = Vec::new();
        for (i, (column, value)) in assignments.into_iter().enumerate() {
            if i > 0 {
                sql.push(',');
            }
            sql.push(' ');
            sql.push_str(column.as_ref());
            sql.push_str(" = ?");
            values.push(value.into());
        }
        if values.is_empty() {
            return Err(QueryError::invalid_clause(format!(
                "UPDATE {table} requires at least one column"
            )));
        }

        self.state.open(Mode::Write);
        self.state.push_str(&sql);
        self.state.extend_values(values);
        Ok(self)
    }

    /// ` UNION SELECT <columns> FROM <table>`
    pub fn union_select(&mut self, columns: impl IntoColumns, table: &str) -> QueryResult<&mut Self> {
        self.state.require_opened("UNION")?;
        self.state.push_str(" UNION ");
        self.push_select(columns, table);
        Ok(self)
    }

    /// ` UNION ALL SELECT <columns> FROM <table>`
    pub fn union_all_select(
        &mut self,
        columns: impl IntoColumns,
        table: &str,
    ) -> QueryResult<&mut Self> {
        self.state.require_opened("UNION ALL")?;
        self.state.push_str(" UNION ALL ");
        self.push_select(columns, table);
        Ok(self)
    }

    /// `INSERT INTO <table>[(<columns>)] VALUES (?,...)`
    ///
    /// An empty `columns` slice omits the column list; otherwise it must name
    /// one column per value.
    pub fn insert_into<V: Into<Value>>(
        &mut self,
        table: &str,
        columns: &[&str],
        values: impl IntoIterator<Item = V>,
    ) -> QueryResult<&mut Self> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(QueryError::invalid_clause(format!(
                "INSERT INTO {table} requires at least one value"
            )));
        }
        if !columns.is_empty() && columns.len() != values.len() {
            return Err(QueryError::invalid_clause(format!(
                "INSERT INTO {table} names {} column(s) but has {} value(s)",
                columns.len(),
                values.len()
            )));
        }

        self.state.open(Mode::Write);
        self.state.push_str("INSERT INTO ");
        self.state.push_str(table);
        if !columns.is_empty() {
            self.state.push_str("(");
            self.state.push_str(&columns.join(","));
            self.state.push_str(")");
        }
        self.state.push_str(" VALUES ");
        let mut group = String::new();
        condition::push_placeholder_group(&mut group, values.len());
        self.state.push_str(&group);
        self.state.extend_values(values);
        Ok(self)
    }

    /// `DELETE FROM <table>`; must be the first clause of the statement.
    pub fn delete(&mut self, table: &str) -> QueryResult<&mut Self> {
        self.state.require_empty("DELETE")?;
        self.state.open(Mode::Write);
        self.state.push_str("DELETE FROM ");
        self.state.push_str(table);
        Ok(self)
    }

    /// `TRUNCATE <table>`; must be the first clause of the statement.
    pub fn truncate(&mut self, table: &str) -> QueryResult<&mut Self> {
        self.state.require_empty("TRUNCATE")?;
        self.state.open(Mode::Write);
        self.state.push_str("TRUNCATE ");
        self.state.push_str(table);
        Ok(self)
    }

    /// ` LIMIT <count>[, <offset>]`
    ///
    /// The two-argument form is emitted verbatim; Postgres does not accept it.
    pub fn limit(&mut self, count: u64, offset: Option<u64>) -> &mut Self {
        self.state.push_str(&format!(" LIMIT {count}"));
        if let Some(offset) = offset {
            self.state.push_str(&format!(", {offset}"));
        }
        self
    }

    /// Execute the assembled statement.
    ///
    /// Reads are materialized per `strategy`; writes return
    /// [`QueryOutput::Affected`]; an empty builder returns
    /// [`QueryOutput::Empty`] without touching the connection. The builder
    /// is empty again afterwards, whether or not execution succeeded.
    pub async fn result(&mut self, strategy: FetchStrategy) -> QueryResult<QueryOutput> {
        let statement = self.state.take();
        match statement.mode() {
            Mode::Empty => Ok(QueryOutput::Empty),
            Mode::Read => {
                executor::extract(&*self.conn, statement.text(), statement.values(), strategy)
                    .await
            }
            Mode::Write => {
                executor::mutate(&*self.conn, statement.text(), statement.values()).await
            }
        }
    }

    /// [`QueryBuilder::result`] with a strategy given by name (`"fetch"`,
    /// `"fetchAll"`, `"fetchColumn"`, ...).
    ///
    /// An unknown name fails with [`QueryError::UnsupportedFetchStrategy`];
    /// the builder is reset either way.
    pub async fn result_named(&mut self, strategy: &str) -> QueryResult<QueryOutput> {
        match strategy.parse() {
            Ok(strategy) => self.result(strategy).await,
            Err(e) => {
                self.state.reset();
                Err(e)
            }
        }
    }

    /// [`QueryBuilder::result`] with the default fetch strategy.
    pub async fn run(&mut self) -> QueryResult<QueryOutput> {
        self.result(self.default_fetch).await
    }

    /// Discard the statement assembled so far.
    pub fn reset(&mut self) {
        if !self.state.mode().is_empty() {
            tracing::debug!(
                target: "sqlchain.sql",
                mode = self.state.mode().as_str(),
                sql = %self.state.text(),
                "discarding statement"
            );
        }
        self.state.reset();
    }

    fn push_select(&mut self, columns: impl IntoColumns, table: &str) {
        self.state.push_str("SELECT ");
        self.state.push_str(&columns.into_columns());
        self.state.push_str(" FROM ");
        self.state.push_str(table);
    }
}
