use thiserror::Error;

use vitalog_domain::ValidationError;

/// Error type for measurement store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The record failed validation before it reached the database
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An update was attempted on a record that was never persisted
    #[error("A measurement id is required for update")]
    MissingId,

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Filesystem error while preparing the database location
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
