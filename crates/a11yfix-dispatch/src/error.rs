use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while packaging or delivering work.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Object-storage failure. SDK errors are generic over the operation,
    /// so the full error context is carried as a message.
    #[error("object storage error: {0}")]
    Store(String),

    #[error("queue error: {0}")]
    Queue(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("repo path does not exist: {0}")]
    MissingRepoPath(PathBuf),

    #[error("archive '{key}' not found in bucket '{bucket}'")]
    ArchiveNotFound { bucket: String, key: String },
}
