//! Storage error types for the repository contract.

/// Errors that can occur during storage operations.
///
/// Missing rows are not errors: lookup methods return `Option` and write
/// methods return `false` when the target is absent. These variants cover
/// infrastructure faults only.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to connect to the storage backend.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// A query failed to execute.
    #[error("Query error: {message}")]
    Query {
        /// Description of the query error.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Query` error.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convenience result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::connection("pool exhausted");
        assert_eq!(err.to_string(), "Connection error: pool exhausted");

        let err = StorageError::query("syntax error near FROM");
        assert_eq!(err.to_string(), "Query error: syntax error near FROM");
    }
}
