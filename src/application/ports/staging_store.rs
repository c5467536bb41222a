use std::io;

use bytes::Bytes;

use crate::domain::StoragePath;

/// Short-lived storage for downloaded media, keyed per run.
#[async_trait::async_trait]
pub trait StagingStore: Send + Sync {
    /// Returns the number of bytes written.
    async fn store(&self, path: &StoragePath, data: Bytes) -> Result<u64, StagingStoreError>;

    async fn fetch(&self, path: &StoragePath) -> Result<Bytes, StagingStoreError>;

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StagingStoreError {
    #[error("write failed for {path}: {reason}")]
    WriteFailed { path: String, reason: String },
    #[error("staged object not found: {0}")]
    NotFound(String),
    #[error("read failed for {path}: {reason}")]
    ReadFailed { path: String, reason: String },
    #[error("delete failed for {path}: {reason}")]
    DeleteFailed { path: String, reason: String },
    #[error("staging directory unavailable: {0}")]
    Io(#[from] io::Error),
}
