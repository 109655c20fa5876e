//! Storage-level error type and its mapping into the core taxonomy.

use thiserror::Error;

use diesel::result::Error as DieselError;
use taskdeck_core::errors::{DatabaseError, Error};

/// Errors raised by the SQLite layer before conversion into core errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Diesel(#[from] DieselError),

    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Migration failed: {0}")]
    Migration(String),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Diesel(DieselError::NotFound) => {
                Error::NotFound("Record not found".to_string())
            }
            StorageError::Diesel(inner) => {
                Error::Database(DatabaseError::QueryFailed(inner.to_string()))
            }
            StorageError::Pool(inner) => {
                Error::Database(DatabaseError::Connection(inner.to_string()))
            }
            StorageError::Migration(message) => Error::Database(DatabaseError::Internal(message)),
        }
    }
}
