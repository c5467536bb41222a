use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::StoragePath;

/// In-memory staging; `failing()` rejects every write.
#[derive(Default)]
pub struct MockStagingStore {
    objects: Mutex<HashMap<String, Bytes>>,
    fail_on_store: bool,
    deletes: AtomicUsize,
}

impl MockStagingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_on_store: true,
            ..Self::default()
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().map(|o| o.len()).unwrap_or(0)
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl StagingStore for MockStagingStore {
    async fn store(&self, path: &StoragePath, data: Bytes) -> Result<u64, StagingStoreError> {
        if self.fail_on_store {
            return Err(StagingStoreError::WriteFailed {
                path: path.to_string(),
                reason: "mock store rejects writes".into(),
            });
        }
        let size = data.len() as u64;
        self.objects
            .lock()
            .map_err(|_| poisoned(path))?
            .insert(path.as_str().to_string(), data);
        Ok(size)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Bytes, StagingStoreError> {
        self.objects
            .lock()
            .map_err(|_| poisoned(path))?
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| StagingStoreError::NotFound(path.to_string()))
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .map_err(|_| poisoned(path))?
            .remove(path.as_str());
        Ok(())
    }
}

fn poisoned(path: &StoragePath) -> StagingStoreError {
    StagingStoreError::ReadFailed {
        path: path.to_string(),
        reason: "lock poisoned".into(),
    }
}
