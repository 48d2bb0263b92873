//! Error types for the CRUD data-access layer.
//!
//! All failures surface to callers as a single [`CrudError`] carrying the
//! original cause where one exists. Argument and transaction-state errors
//! are raised before any I/O; driver failures are classified into pool,
//! connection, and operation errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrudError {
    /// Malformed caller input (column/value arity mismatch, empty column
    /// list, unsupported target). Raised before any I/O; not retryable.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// `begin` was called while a transaction is already in flight.
    #[error("a transaction is already in progress")]
    AlreadyInTransaction,

    /// `commit` was called with no transaction in flight.
    #[error("no active transaction to commit")]
    NoActiveTransaction,

    /// The pool could not hand out a connection within its acquire timeout.
    /// Callers may retry with backoff.
    #[error("connection pool exhausted: {message}")]
    PoolExhausted { message: String },

    /// The pool or the underlying connection is unusable (closed pool,
    /// network, TLS, protocol, bad configuration).
    #[error("connection unavailable: {message}")]
    ConnectionUnavailable { message: String },

    /// A statement failed during execution. When a transaction was active
    /// it has already been rolled back by the time this reaches the caller.
    #[error("{operation} failed: {source}")]
    OperationFailure {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// Failure while rolling back or releasing a connection. Logged by the
    /// executor and never returned in place of the primary failure.
    #[error("cleanup failed: {message}")]
    CleanupFailure { message: String },
}

impl CrudError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a cleanup failure.
    pub fn cleanup(message: impl Into<String>) -> Self {
        Self::CleanupFailure {
            message: message.into(),
        }
    }

    /// Classify a driver error raised while running `operation`.
    ///
    /// Pool and connection-level failures keep their own categories so
    /// callers can apply retry policy; everything else is an operation
    /// failure wrapping the sqlx cause.
    pub fn from_driver(operation: &'static str, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => Self::PoolExhausted {
                message: "timed out waiting for a pooled connection".to_string(),
            },
            sqlx::Error::PoolClosed => Self::ConnectionUnavailable {
                message: "connection pool is closed".to_string(),
            },
            sqlx::Error::Configuration(msg) => Self::ConnectionUnavailable {
                message: msg.to_string(),
            },
            sqlx::Error::Io(io_err) => Self::ConnectionUnavailable {
                message: format!("I/O error: {}", io_err),
            },
            sqlx::Error::Tls(tls_err) => Self::ConnectionUnavailable {
                message: format!("TLS error: {}", tls_err),
            },
            sqlx::Error::Protocol(msg) => Self::ConnectionUnavailable {
                message: format!("protocol error: {}", msg),
            },
            other => Self::OperationFailure {
                operation,
                source: other,
            },
        }
    }

    /// Check if this error is worth retrying (pool pressure or transient
    /// connection trouble, as opposed to a caller bug or a SQL error).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::PoolExhausted { .. } | Self::ConnectionUnavailable { .. }
        )
    }

    /// The driver error code for an operation failure, when the backend
    /// reported one (e.g. a SQLSTATE).
    pub fn driver_code(&self) -> Option<String> {
        match self {
            Self::OperationFailure {
                source: sqlx::Error::Database(db_err),
                ..
            } => db_err.code().map(|c| c.to_string()),
            _ => None,
        }
    }
}

/// Result type alias for CRUD operations.
pub type CrudResult<T> = Result<T, CrudError>;
