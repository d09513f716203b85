//! Error types for the PostgreSQL backend.

use reelvault_storage::StorageError;

/// Errors local to pool creation and migrations.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx_core::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

impl PostgresError {
    #[must_use]
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }
}

/// Convenience result type for backend-internal operations.
pub type Result<T> = std::result::Result<T, PostgresError>;

/// Maps a driver error onto the repository contract's error taxonomy.
///
/// Pool and I/O faults are connection errors; everything else surfaces as
/// a query error carrying the driver message.
pub fn to_storage_error(err: sqlx_core::Error) -> StorageError {
    match err {
        sqlx_core::Error::PoolTimedOut
        | sqlx_core::Error::PoolClosed
        | sqlx_core::Error::Io(_) => StorageError::connection(err.to_string()),
        other => StorageError::query(other.to_string()),
    }
}

impl From<PostgresError> for StorageError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Sqlx(e) => to_storage_error(e),
            PostgresError::Migration(m) => StorageError::internal(m),
        }
    }
}
