//! Database error types
//!
//! This module classifies failures coming out of SQLx and translates them
//! into the access layer's [`AccessError`] kinds.

use core_kernel::AccessError;
use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check or not-null constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The statement ran past `statement_timeout` or was cancelled
    #[error("Query cancelled: {0}")]
    QueryCancelled(String),

    /// A row could not be decoded into its entity
    #[error("Decode error: {0}")]
    Decode(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error means the store could not be reached in time
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_)
                | DatabaseError::PoolExhausted
                | DatabaseError::QueryCancelled(_)
        )
    }

    /// Translates into an access error for an operation on `entity`
    pub fn into_access_error(self, entity: &'static str, relation: Option<&'static str>) -> AccessError {
        match self {
            DatabaseError::ForeignKeyViolation(message) => AccessError::UnknownReference {
                entity,
                relation: relation.unwrap_or("related entity"),
                message,
            },
            error if error.is_connection_error() => AccessError::unavailable(error.to_string()),
            error => AccessError::store(error.to_string()),
        }
    }
}

/// Maps SQLx errors to the matching variant by SQLSTATE code
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_) => DatabaseError::Decode(error.to_string()),
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                let message = db_err.message().to_string();
                match db_err.code().as_deref() {
                    Some("23505") => DatabaseError::DuplicateEntry(message),
                    Some("23503") => DatabaseError::ForeignKeyViolation(message),
                    Some("23502") | Some("23514") => DatabaseError::ConstraintViolation(message),
                    Some("57014") => DatabaseError::QueryCancelled(message),
                    Some(code) if code.starts_with("08") => DatabaseError::ConnectionFailed(message),
                    _ => DatabaseError::QueryFailed(message),
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}
