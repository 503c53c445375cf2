//! # sqlchain
//!
//! A fluent SQL statement builder with an attached executor.
//!
//! ## Features
//!
//! - **Fluent clauses**: `select`, `where_`, `group_by`, `order_by`, `update`,
//!   `insert_into`, `delete`, `truncate`, `union_select`, `limit`
//! - **Positional binding**: every value goes through a `?` placeholder, in order
//! - **Mode checking**: a statement is a read or a write from its first clause on;
//!   clauses that make no sense at that point fail with `InvalidSequence`
//! - **Reusable builder**: `result()` executes and resets, success or failure
//! - **Pluggable driver**: anything implementing [`Connection`]; Postgres included
//!
//! ## Example
//!
//! ```ignore
//! use sqlchain::{ConnectOptions, FetchStrategy, QueryBuilder, Value};
//!
//! let opts = ConnectOptions::new("shop", "localhost").credentials("app", "secret");
//! let mut db = QueryBuilder::connect(&opts).await?;
//!
//! // SELECT id,total FROM orders WHERE customer_id = ? AND (placed_at BETWEEN ? AND ?)
//! let orders = db
//!     .select(["id", "total"], "orders")
//!     .where_(
//!         sqlchain::Conditions::new()
//!             .with("customer_id =", 42)
//!             .with("placed_at BETWEEN", [from, to]),
//!     )?
//!     .result(FetchStrategy::All)
//!     .await?
//!     .into_rows();
//!
//! // DELETE FROM orders WHERE archived_at IS NOT NULL
//! db.delete("orders")?
//!     .where_([("archived_at IS NOT", Value::Null)])?
//!     .result(FetchStrategy::One)
//!     .await?;
//! ```

pub mod builder;
pub mod condition;
pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod fetch;
pub mod mode;
pub mod placeholder;
pub mod postgres;
pub mod row;
pub mod value;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{IntoColumns, QueryBuilder};
pub use condition::{Condition, ConditionValue, Conditions};
pub use config::ConnectOptions;
pub use connection::{Connection, PreparedStatement};
pub use error::{QueryError, QueryResult};
pub use fetch::{FetchStrategy, QueryOutput};
pub use mode::{BuilderState, Mode};
pub use postgres::{PgConnection, PgStatement};
pub use row::Row;
pub use value::{FromValue, Value};
