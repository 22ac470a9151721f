//! Error types for conquery

use thiserror::Error;

/// Result type alias for conquery operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for database operations
///
/// A lookup that finds no row is not an error: single-entity reads return
/// `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum OrmError {
    /// Prepare/execute/scan failure reported by a connection implementation
    #[error("Connection error: {0}")]
    Connection(String),

    /// Failure reported by the SQLite driver, passed through unchanged
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from the underlying store
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => true,
            _ => false,
        }
    }
}
