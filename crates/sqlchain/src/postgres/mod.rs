//! Postgres implementation of [`Connection`] on top of `tokio-postgres`.
//!
//! Statement text arrives with `?` placeholders and is renumbered to
//! `$1, $2, ...` before preparing. Note that this makes Postgres's own `?`
//! operators (jsonb key existence) unavailable outside string literals.
//!
//! [`QueryBuilder::limit`](crate::QueryBuilder::limit) with an offset emits
//! `LIMIT n, m`, which Postgres rejects as a syntax error. Use the
//! single-argument form and add the offset as a raw `OFFSET` fragment
//! instead.

mod types;

use crate::config::ConnectOptions;
use crate::connection::{Connection, PreparedStatement};
use crate::error::{QueryError, QueryResult};
use crate::placeholder;
use crate::row::Row;
use crate::value::Value;
use std::collections::VecDeque;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls};

/// A Postgres connection.
///
/// The socket is driven by a background task spawned on the current tokio
/// runtime; it ends when the `PgConnection` is dropped.
pub struct PgConnection {
    client: Client,
}

impl PgConnection {
    /// Connect with `NoTls` and apply the session settings in `opts`.
    ///
    /// Any failure, during connect or session setup, is a
    /// [`QueryError::Connection`].
    pub async fn connect(opts: &ConnectOptions) -> QueryResult<Self> {
        let (client, connection) = opts
            .to_pg_config()
            .connect(NoTls)
            .await
            .map_err(|e| QueryError::connection_from("failed to connect", e))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(target: "sqlchain.connection", error = %e, "connection closed with error");
            }
        });

        let conn = Self { client };
        conn.configure_session(opts).await?;
        tracing::info!(
            target: "sqlchain.connection",
            host = %opts.host,
            port = opts.port,
            dbname = %opts.dbname,
            "connected"
        );
        Ok(conn)
    }

    /// Wrap an already connected client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// The underlying `tokio-postgres` client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn configure_session(&self, opts: &ConnectOptions) -> QueryResult<()> {
        if let Some(path) = &opts.search_path {
            self.client
                .batch_execute(&format!("SET search_path TO {path}"))
                .await
                .map_err(|e| QueryError::connection_from("failed to set search_path", e))?;
        }
        Ok(())
    }
}

impl Connection for PgConnection {
    type Statement<'c> = PgStatement<'c>;

    async fn prepare<'c>(&'c self, sql: &str) -> QueryResult<PgStatement<'c>> {
        let numbered = placeholder::to_numbered(sql);
        let statement = self
            .client
            .prepare(&numbered)
            .await
            .map_err(QueryError::from_db_error)?;
        Ok(PgStatement {
            client: &self.client,
            statement,
            rows: VecDeque::new(),
        })
    }
}

/// A prepared Postgres statement.
///
/// Result rows are buffered on execute and handed out by the fetch calls.
pub struct PgStatement<'c> {
    client: &'c Client,
    statement: tokio_postgres::Statement,
    rows: VecDeque<Row>,
}

impl PreparedStatement for PgStatement<'_> {
    async fn execute(&mut self, params: &[Value]) -> QueryResult<u64> {
        let params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|v| v as &(dyn ToSql + Sync)).collect();

        if self.statement.columns().is_empty() {
            self.rows.clear();
            return self
                .client
                .execute(&self.statement, &params)
                .await
                .map_err(QueryError::from_db_error);
        }

        let rows = self
            .client
            .query(&self.statement, &params)
            .await
            .map_err(QueryError::from_db_error)?;
        self.rows = rows
            .iter()
            .map(types::decode_row)
            .collect::<QueryResult<_>>()?;
        Ok(self.rows.len() as u64)
    }

    async fn fetch_one(&mut self) -> QueryResult<Option<Row>> {
        Ok(self.rows.pop_front())
    }

    async fn fetch_all(&mut self) -> QueryResult<Vec<Row>> {
        Ok(self.rows.drain(..).collect())
    }
}
