//! Error types shared across the taskdeck crates.

use thiserror::Error;

/// Result type alias used throughout the core and storage crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for domain and persistence operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying store rejected a read or write.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Sync cursor was not a parseable non-negative integer.
    #[error("Invalid sync cursor: {0}")]
    InvalidCursor(String),

    /// Entity lookup found no row for the requesting user.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence-level failures, wrapped by [`Error::Database`].
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Could not obtain a connection from the pool.
    #[error("Failed to get database connection: {0}")]
    Connection(String),

    /// A query or statement failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Anything else the store reports (migrations, writer loss, corruption).
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid-cursor error.
    pub fn invalid_cursor(message: impl Into<String>) -> Self {
        Self::InvalidCursor(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}
