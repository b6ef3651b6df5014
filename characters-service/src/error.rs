//! Service-level error types
//!
//! [`Error`] covers startup and infrastructure failures (configuration,
//! store connection, I/O). Request-scoped failures are expressed as
//! [`crate::repository::RepositoryError`] and [`crate::handlers::ApiError`].

use std::fmt;
use thiserror::Error;

use crate::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};

// ============================================================================
// Structured Database Errors
// ============================================================================

/// Database operation being performed when the error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseOperation {
    /// Establishing a connection, signing in, selecting namespace/database
    Connect,
    /// Executing a query
    Query,
    /// Creating records
    Insert,
    /// Updating records
    Update,
    /// Deleting records
    Delete,
    /// Defining tables and fields
    Migration,
}

impl fmt::Display for DatabaseOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connect"),
            Self::Query => write!(f, "query"),
            Self::Insert => write!(f, "insert"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::Migration => write!(f, "migration"),
        }
    }
}

/// Category of database error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseErrorKind {
    /// Failed to establish connection or authenticate
    ConnectionFailed,
    /// Constraint violation (duplicate record id, field type assertion)
    ConstraintViolation,
    /// Query parsing or execution failed
    QueryFailed,
    /// Operation timed out
    Timeout,
    /// Permission denied
    PermissionDenied,
    /// Other/unknown error
    Other,
}

impl fmt::Display for DatabaseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::ConstraintViolation => write!(f, "constraint_violation"),
            Self::QueryFailed => write!(f, "query_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::PermissionDenied => write!(f, "permission_denied"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured database error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseError {
    /// The operation being performed when the error occurred
    pub operation: DatabaseOperation,
    /// The category of error
    pub kind: DatabaseErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Additional context (e.g., table name, sanitized URL)
    pub context: Option<String>,
}

impl DatabaseError {
    /// Create a new database error
    pub fn new(
        operation: DatabaseOperation,
        kind: DatabaseErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            context: None,
        }
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::new(
            DatabaseOperation::Connect,
            DatabaseErrorKind::ConnectionFailed,
            message,
        )
    }

    /// Check if this error is retriable
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            DatabaseErrorKind::ConnectionFailed | DatabaseErrorKind::Timeout
        )
    }

    /// Attach context to the error
    #[must_use]
    pub fn add_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Override the operation inferred from the driver message
    #[must_use]
    pub fn with_operation(mut self, operation: DatabaseOperation) -> Self {
        self.operation = operation;
        self
    }
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Database {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(ref ctx) = self.context {
            write!(f, " ({})", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for DatabaseError {}

/// Main error type for the service
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Structured database error with operation context
    #[error("{0}")]
    Database(DatabaseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using the service error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<DatabaseError> for Error {
    fn from(err: DatabaseError) -> Self {
        Error::Database(err)
    }
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        Error::Internal(err.to_string())
    }
}

// Classifies by message text; the driver does not expose a stable error code.
impl From<surrealdb::Error> for DatabaseError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        let lower = msg.to_lowercase();

        let (kind, operation) = if lower.contains("already exists")
            || lower.contains("unique")
            || lower.contains("duplicate")
            || lower.contains("expected a")
        {
            (
                DatabaseErrorKind::ConstraintViolation,
                DatabaseOperation::Insert,
            )
        } else if lower.contains("timeout") || lower.contains("timed out") {
            (DatabaseErrorKind::Timeout, DatabaseOperation::Query)
        } else if lower.contains("permission")
            || lower.contains("not allowed")
            || lower.contains("denied")
        {
            (DatabaseErrorKind::PermissionDenied, DatabaseOperation::Query)
        } else if lower.contains("connect")
            || lower.contains("auth")
            || lower.contains("signin")
            || lower.contains("credentials")
        {
            (
                DatabaseErrorKind::ConnectionFailed,
                DatabaseOperation::Connect,
            )
        } else if lower.contains("parse") || lower.contains("syntax") {
            (DatabaseErrorKind::QueryFailed, DatabaseOperation::Query)
        } else {
            (DatabaseErrorKind::Other, DatabaseOperation::Query)
        };

        Self::new(operation, kind, msg)
    }
}

impl From<surrealdb::Error> for Error {
    fn from(err: surrealdb::Error) -> Self {
        Error::Database(DatabaseError::from(err))
    }
}

impl From<RepositoryOperation> for DatabaseOperation {
    fn from(op: RepositoryOperation) -> Self {
        match op {
            RepositoryOperation::FindPage | RepositoryOperation::FindById => Self::Query,
            RepositoryOperation::Insert => Self::Insert,
            RepositoryOperation::Update => Self::Update,
            RepositoryOperation::Delete => Self::Delete,
            RepositoryOperation::DefineSchema => Self::Migration,
        }
    }
}

impl From<DatabaseError> for RepositoryError {
    fn from(err: DatabaseError) -> Self {
        let kind = match err.kind {
            DatabaseErrorKind::ConstraintViolation => RepositoryErrorKind::ConstraintViolation,
            DatabaseErrorKind::ConnectionFailed => RepositoryErrorKind::ConnectionFailed,
            DatabaseErrorKind::Timeout => RepositoryErrorKind::Timeout,
            _ => RepositoryErrorKind::DatabaseError,
        };

        let operation = match err.operation {
            DatabaseOperation::Insert => RepositoryOperation::Insert,
            DatabaseOperation::Update => RepositoryOperation::Update,
            DatabaseOperation::Delete => RepositoryOperation::Delete,
            DatabaseOperation::Migration => RepositoryOperation::DefineSchema,
            DatabaseOperation::Query | DatabaseOperation::Connect => RepositoryOperation::FindById,
        };

        RepositoryError::new(operation, kind, err.message)
    }
}
