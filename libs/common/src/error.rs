//! Custom error types for the common library
//!
//! This module defines the storage error taxonomy shared by every service.
//! Driver errors are classified here once so callers never inspect vendor
//! specific error codes.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred while establishing or probing a connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A statement was rejected by a uniqueness constraint
    #[error("Unique constraint violated{}", .constraint.as_deref().map(|c| format!(": {c}")).unwrap_or_default())]
    UniqueViolation { constraint: Option<String> },

    /// Every connection stayed checked out for the whole acquire window
    #[error("Timed out waiting for a pooled connection")]
    PoolTimedOut,

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Classify a driver error.
    ///
    /// Unique violations are detected through the driver's own abstract
    /// classification, which covers PostgreSQL, SQLite and MySQL alike.
    pub fn classify(err: SqlxError) -> Self {
        match err {
            SqlxError::Database(db_err) if db_err.is_unique_violation() => {
                DatabaseError::UniqueViolation {
                    constraint: db_err.constraint().map(str::to_owned),
                }
            }
            SqlxError::PoolTimedOut => DatabaseError::PoolTimedOut,
            err if is_connection_fault(&err) => DatabaseError::Connection(err),
            err => DatabaseError::Query(err),
        }
    }

    /// True when the error was a uniqueness conflict
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation { .. })
    }
}

/// Returns true when the error means the connection itself is unusable.
///
/// Such connections must be discarded rather than returned to the pool.
pub fn is_connection_fault(err: &SqlxError) -> bool {
    matches!(
        err,
        SqlxError::Io(_)
            | SqlxError::Tls(_)
            | SqlxError::Protocol(_)
            | SqlxError::WorkerCrashed
            | SqlxError::PoolClosed
    )
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
