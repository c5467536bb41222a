use std::sync::Arc;

use crate::application::services::TranscriptionPipeline;
use crate::domain::MediaCredentials;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TranscriptionPipeline>,
    /// Basic-auth credentials attached to every media download.
    pub media_credentials: Option<MediaCredentials>,
}

impl AppState {
    pub fn new(pipeline: Arc<TranscriptionPipeline>) -> Self {
        Self {
            pipeline,
            media_credentials: None,
        }
    }

    pub fn with_media_credentials(mut self, credentials: Option<MediaCredentials>) -> Self {
        self.media_credentials = credentials;
        self
    }
}
