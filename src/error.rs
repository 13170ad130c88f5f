//! Error types for fileshelf.

use thiserror::Error;

/// Common error type for fileshelf.
#[derive(Error, Debug)]
pub enum ShelfError {
    /// Missing or malformed input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A sibling folder with the same name already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Blob store put/get/delete failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Database error.
    ///
    /// Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ShelfError {
    /// Check if a sqlx error is a unique constraint violation.
    pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
        e.as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false)
    }
}

// Conversion from sqlx errors
impl From<sqlx::Error> for ShelfError {
    fn from(e: sqlx::Error) -> Self {
        ShelfError::Database(e.to_string())
    }
}

/// Result type alias for fileshelf operations.
pub type Result<T> = std::result::Result<T, ShelfError>;
