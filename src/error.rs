//! Error types for the review pipeline

use std::time::Duration;
use thiserror::Error;

/// Failure of the durable review store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Timed out after {0:?} waiting for the database")]
    Timeout(Duration),

    #[error("Review {id} has unrecognized sentiment '{value}'")]
    InvalidSentiment { id: i64, value: String },
}

/// Error returned by `ReviewService`.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
