//! Error types for the campus records data-access layer.
//!
//! All database failures surface as a single [`DbError`] carrying a phase tag.
//! No driver-native error ever escapes this layer: every failure is caught at
//! the failing operation and re-wrapped with the original message (and the
//! SQL Server error number, when the server reported one) preserved for
//! diagnostics.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// The connection could not be acquired at all.
    #[error("database connection failed: {message}")]
    Connection { message: String },

    /// Execute or fetch raised during a read-only call.
    #[error("query failed: {message}")]
    Query {
        message: String,
        /// SQL Server error number, e.g. "2627" for a unique-key violation.
        sql_state: Option<String>,
    },

    /// Execute raised during a mutating call; a rollback was attempted.
    #[error("non-query failed: {message}")]
    NonQuery {
        message: String,
        sql_state: Option<String>,
    },

    /// The caller supplied input the layer rejects before touching the server.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// A contract violation inside the layer itself.
    #[error("internal error: {message}")]
    Internal { message: String },
}

/// Phase in which a [`DbError`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPhase {
    Connection,
    Query,
    NonQuery,
    InvalidInput,
    Internal,
}

impl ErrorPhase {
    /// Stable machine-readable code for this phase.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Query => "query",
            Self::NonQuery => "non_query",
            Self::InvalidInput => "invalid_input",
            Self::Internal => "internal",
        }
    }
}

/// Structured error payload for presentation layers.
///
/// Screens render `message` directly instead of slicing driver text.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_state: Option<String>,
}

impl DbError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a read-path error with an optional SQL Server error number.
    pub fn query(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Query {
            message: message.into(),
            sql_state,
        }
    }

    /// Create a write-path error with an optional SQL Server error number.
    pub fn non_query(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::NonQuery {
            message: message.into(),
            sql_state,
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Wrap a driver error raised while connecting.
    pub fn connection_from(err: tiberius::error::Error) -> Self {
        Self::connection(err.to_string())
    }

    /// Wrap a driver error raised on the read path.
    pub fn query_from(err: tiberius::error::Error) -> Self {
        let sql_state = server_error_number(&err);
        Self::query(err.to_string(), sql_state)
    }

    /// Wrap a driver error raised on the write path.
    pub fn non_query_from(err: tiberius::error::Error) -> Self {
        let sql_state = server_error_number(&err);
        Self::non_query(err.to_string(), sql_state)
    }

    /// Phase tag for this error.
    pub fn phase(&self) -> ErrorPhase {
        match self {
            Self::Connection { .. } => ErrorPhase::Connection,
            Self::Query { .. } => ErrorPhase::Query,
            Self::NonQuery { .. } => ErrorPhase::NonQuery,
            Self::InvalidInput { .. } => ErrorPhase::InvalidInput,
            Self::Internal { .. } => ErrorPhase::Internal,
        }
    }

    /// SQL Server error number, if the server reported one.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Query { sql_state, .. } | Self::NonQuery { sql_state, .. } => {
                sql_state.as_deref()
            }
            _ => None,
        }
    }

    /// Structured payload for display, replacing ad-hoc message surgery.
    pub fn report(&self) -> ErrorReport {
        let message = match self {
            Self::Connection { message }
            | Self::Query { message, .. }
            | Self::NonQuery { message, .. }
            | Self::InvalidInput { message }
            | Self::Internal { message } => message.clone(),
        };
        ErrorReport {
            code: self.phase().code(),
            message,
            sql_state: self.sql_state().map(String::from),
        }
    }
}

/// Extract the error number from a server-reported failure.
fn server_error_number(err: &tiberius::error::Error) -> Option<String> {
    match err {
        tiberius::error::Error::Server(token) => Some(token.code().to_string()),
        _ => None,
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;
