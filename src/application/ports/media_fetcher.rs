use async_trait::async_trait;

use crate::domain::{MediaReference, RawMediaBytes};

#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, reference: &MediaReference) -> Result<RawMediaBytes, FetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("media unavailable: status {status}")]
    MediaUnavailable { status: u16 },
    #[error("network error: {0}")]
    Network(String),
    #[error("media too large: {actual} bytes exceeds limit of {limit}")]
    TooLarge { limit: u64, actual: u64 },
}
