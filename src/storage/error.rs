//! Storage layer error types.
//!
//! All errors that can occur during storage operations are defined here.
//! We use `thiserror` for ergonomic error definition and better error
//! messages. Note that most of these never reach a caller: the store
//! façade catches and logs them, because the in-memory model is
//! authoritative and file persistence is best-effort.

use std::path::PathBuf;

use thiserror::Error;

/// the main error type for storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error (filesystem level)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// a record file's content disagrees with its location
    #[error("corrupted record at {path}: {reason}")]
    CorruptedRecord { path: PathBuf, reason: String },
}

impl StorageError {
    /// check if this error indicates a missing file or directory
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::Io(e) if e.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let missing: StorageError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(missing.is_not_found());

        let denied: StorageError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no").into();
        assert!(!denied.is_not_found());
    }
}
