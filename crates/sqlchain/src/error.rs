//! Error types for sqlchain

use thiserror::Error;

/// Result type alias for sqlchain operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Error types for building and executing statements
#[derive(Debug, Error)]
pub enum QueryError {
    /// Connecting to the database or applying session settings failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<tokio_postgres::Error>,
    },

    /// A clause was called in a state that forbids it
    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),

    /// The requested fetch strategy does not exist
    #[error("Unsupported fetch strategy: {0}")]
    UnsupportedFetchStrategy(String),

    /// Clause arguments that cannot produce a valid fragment
    #[error("Invalid clause: {0}")]
    InvalidClause(String),

    /// Placeholder count in the statement text differs from the bound values
    #[error("Parameter mismatch: statement has {placeholders} placeholder(s) but {values} value(s) are bound")]
    ParameterMismatch { placeholders: usize, values: usize },

    /// Driver error while preparing, binding, executing or fetching
    #[error("Driver error: {0}")]
    Driver(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Errors raised by non-Postgres connection implementations
    #[error("{0}")]
    Other(String),
}

impl QueryError {
    /// Create a connection error without an underlying driver error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection error that keeps the driver error as its source
    pub fn connection_from(message: impl Into<String>, source: tokio_postgres::Error) -> Self {
        Self::Connection {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create an invalid sequence error
    pub fn invalid_sequence(message: impl Into<String>) -> Self {
        Self::InvalidSequence(message.into())
    }

    /// Create an invalid clause error
    pub fn invalid_clause(message: impl Into<String>) -> Self {
        Self::InvalidClause(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a connection error
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Check if this is an invalid sequence error
    pub fn is_invalid_sequence(&self) -> bool {
        matches!(self, Self::InvalidSequence(_))
    }

    /// Check if this is an unsupported fetch strategy error
    pub fn is_unsupported_fetch_strategy(&self) -> bool {
        matches!(self, Self::UnsupportedFetchStrategy(_))
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Check if this error came from the database driver
    pub fn is_driver_error(&self) -> bool {
        matches!(
            self,
            Self::Driver(_)
                | Self::UniqueViolation(_)
                | Self::ForeignKeyViolation(_)
                | Self::CheckViolation(_)
        )
    }

    /// Parse a tokio_postgres error into a more specific QueryError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Driver(err)
    }
}
