//! Datastore error types

use thiserror::Error;

/// Result type for datastore operations
pub type DatastoreResult<T> = Result<T, DatastoreError>;

/// Datastore errors
#[derive(Debug, Error)]
pub enum DatastoreError {
    /// Error reported by SQLite (syntax, constraint violation, I/O)
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A statement parameter has no SQL equivalent
    #[error("Unsupported parameter at position {position}: {kind}")]
    UnsupportedParam { position: usize, kind: &'static str },

    /// A result column has no JSON equivalent
    #[error("Unsupported value in column '{column}'")]
    UnsupportedColumn { column: String },

    /// A previous holder of the connection panicked
    #[error("Datastore connection is poisoned")]
    Poisoned,

    /// The blocking task running the statement did not complete
    #[error("Datastore task failed: {0}")]
    Join(String),
}
