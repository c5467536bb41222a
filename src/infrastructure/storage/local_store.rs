use std::path::PathBuf;

use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::StoragePath;

/// One flat file per run under `base_path`.
pub struct LocalStagingStore {
    fs: LocalFileSystem,
}

impl LocalStagingStore {
    pub fn new(base_path: PathBuf) -> Result<Self, StagingStoreError> {
        std::fs::create_dir_all(&base_path)?;
        let fs = LocalFileSystem::new_with_prefix(&base_path).map_err(|e| {
            StagingStoreError::WriteFailed {
                path: base_path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self { fs })
    }
}

fn object_path(path: &StoragePath) -> ObjectPath {
    ObjectPath::from(path.as_str())
}

#[async_trait::async_trait]
impl StagingStore for LocalStagingStore {
    async fn store(&self, path: &StoragePath, data: Bytes) -> Result<u64, StagingStoreError> {
        let size = data.len() as u64;
        self.fs
            .put(&object_path(path), PutPayload::from(data))
            .await
            .map_err(|e| StagingStoreError::WriteFailed {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Ok(size)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Bytes, StagingStoreError> {
        let object = self.fs.get(&object_path(path)).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StagingStoreError::NotFound(path.to_string()),
            other => StagingStoreError::ReadFailed {
                path: path.to_string(),
                reason: other.to_string(),
            },
        })?;

        object.bytes().await.map_err(|e| StagingStoreError::ReadFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError> {
        self.fs
            .delete(&object_path(path))
            .await
            .map_err(|e| StagingStoreError::DeleteFailed {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }
}
