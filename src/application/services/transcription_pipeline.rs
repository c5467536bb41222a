use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time::{Instant, timeout_at};
use tracing::Instrument;

use crate::application::ports::{
    AudioNormalizer, FetchError, MediaFetcher, StagingStore, TranscriptionEngine,
    TranscriptionError,
};
use crate::domain::{
    AudioSignal, FailureKind, MediaReference, PipelineResult, PipelineStage, RawMediaBytes, RunId,
    StoragePath, Transcript,
};

const STAGED_MEDIA_FILENAME: &str = "media";

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Overall budget for one run, shared by all stages.
    pub request_deadline: Duration,
    pub empty_audio_is_failure: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            request_deadline: Duration::from_secs(300),
            empty_audio_is_failure: false,
        }
    }
}

/// Fetch → normalize → transcribe for a single media reference.
///
/// `run` is infallible: every stage error is mapped onto a [`FailureKind`]
/// and a user-facing message. The engine is shared by all runs; nothing else
/// outlives a run.
pub struct TranscriptionPipeline {
    fetcher: Arc<dyn MediaFetcher>,
    normalizer: Arc<dyn AudioNormalizer>,
    engine: Arc<dyn TranscriptionEngine>,
    staging_store: Option<Arc<dyn StagingStore>>,
    options: PipelineOptions,
}

impl TranscriptionPipeline {
    pub fn new(
        fetcher: Arc<dyn MediaFetcher>,
        normalizer: Arc<dyn AudioNormalizer>,
        engine: Arc<dyn TranscriptionEngine>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            fetcher,
            normalizer,
            engine,
            staging_store: None,
            options,
        }
    }

    pub fn with_staging_store(mut self, staging_store: Arc<dyn StagingStore>) -> Self {
        self.staging_store = Some(staging_store);
        self
    }

    pub fn model_id(&self) -> &str {
        self.engine.model_id()
    }

    pub async fn run(&self, reference: &MediaReference) -> PipelineResult {
        let run_id = RunId::new();
        let span = tracing::info_span!("pipeline_run", run_id = %run_id);
        self.run_stages(run_id, reference).instrument(span).await
    }

    async fn run_stages(&self, run_id: RunId, reference: &MediaReference) -> PipelineResult {
        let deadline = Instant::now() + self.options.request_deadline;

        let stage = enter_stage(PipelineStage::Start);
        let stage = enter_stage(stage.next());
        let media = match self.fetch(reference, deadline).await {
            Ok(media) => media,
            Err(kind) => return fail(stage, kind),
        };

        let Some(store) = &self.staging_store else {
            return self.decode_and_transcribe(stage, media, deadline).await;
        };

        let path = StoragePath::for_run(&run_id, STAGED_MEDIA_FILENAME);
        let staged = match write_staged(store.as_ref(), &path, media).await {
            Ok(staged) => staged,
            Err(kind) => return fail(stage, kind),
        };

        let result = match read_staged(store.as_ref(), &path, staged).await {
            Ok(media) => self.decode_and_transcribe(stage, media, deadline).await,
            Err(kind) => fail(stage, kind),
        };

        if let Err(e) = store.delete(&path).await {
            tracing::warn!(error = %e, path = %path, "Failed to delete staged media");
        }

        result
    }

    async fn decode_and_transcribe(
        &self,
        stage: PipelineStage,
        media: RawMediaBytes,
        deadline: Instant,
    ) -> PipelineResult {
        let stage = enter_stage(stage.next());
        let signal = match self.normalize(media, deadline).await {
            Ok(signal) => signal,
            Err(kind) => return fail(stage, kind),
        };

        let stage = enter_stage(stage.next());
        let transcript = match self.transcribe(&signal, deadline).await {
            Ok(transcript) => transcript,
            Err(kind) => return fail(stage, kind),
        };

        enter_stage(stage.next());
        tracing::info!(
            chars = transcript.text.len(),
            outcome = %transcript.outcome,
            audio_secs = signal.duration_secs(),
            "Pipeline run completed"
        );

        PipelineResult::Success(transcript)
    }

    async fn fetch(
        &self,
        reference: &MediaReference,
        deadline: Instant,
    ) -> Result<RawMediaBytes, FailureKind> {
        match timeout_at(deadline, self.fetcher.fetch(reference)).await {
            Ok(Ok(media)) => {
                tracing::debug!(
                    bytes = media.len(),
                    status = media.status(),
                    content_type = ?media.content_type(),
                    "Media fetched"
                );
                Ok(media)
            }
            Ok(Err(e)) => {
                let kind = match e {
                    FetchError::MediaUnavailable { .. } => FailureKind::MediaUnavailable,
                    FetchError::Network(_) => FailureKind::NetworkError,
                    FetchError::TooLarge { .. } => FailureKind::MediaTooLarge,
                };
                tracing::warn!(error = %e, kind = %kind, "Media fetch failed");
                Err(kind)
            }
            Err(_) => {
                tracing::warn!("Media fetch exceeded request deadline");
                Err(FailureKind::NetworkError)
            }
        }
    }

    async fn normalize(
        &self,
        media: RawMediaBytes,
        deadline: Instant,
    ) -> Result<AudioSignal, FailureKind> {
        let normalizer = Arc::clone(&self.normalizer);
        let task = tokio::task::spawn_blocking(move || normalizer.normalize(&media));

        match timeout_at(deadline, task).await {
            Ok(Ok(Ok(signal))) => {
                tracing::debug!(
                    samples = signal.len(),
                    duration_secs = signal.duration_secs(),
                    "Audio normalized"
                );
                Ok(signal)
            }
            Ok(Ok(Err(e))) => {
                tracing::warn!(error = %e, "Audio normalization failed");
                Err(FailureKind::DecodeError)
            }
            Ok(Err(join_error)) => {
                tracing::error!(error = %join_error, "Audio normalizer panicked");
                Err(FailureKind::DecodeError)
            }
            Err(_) => {
                tracing::warn!("Audio normalization exceeded request deadline");
                Err(FailureKind::DecodeError)
            }
        }
    }

    async fn transcribe(
        &self,
        signal: &AudioSignal,
        deadline: Instant,
    ) -> Result<Transcript, FailureKind> {
        let inference = AssertUnwindSafe(self.engine.transcribe(signal)).catch_unwind();

        match timeout_at(deadline, inference).await {
            Ok(Ok(Ok(transcript))) => Ok(transcript),
            Ok(Ok(Err(TranscriptionError::EmptyAudio))) => {
                if self.options.empty_audio_is_failure {
                    tracing::warn!("No speech detected in audio");
                    Err(FailureKind::EmptyAudio)
                } else {
                    tracing::debug!("No speech detected, returning empty transcript");
                    Ok(Transcript::empty())
                }
            }
            Ok(Ok(Err(e @ TranscriptionError::Timeout(_)))) => {
                tracing::warn!(error = %e, "Transcription timed out");
                Err(FailureKind::InferenceTimeout)
            }
            Ok(Ok(Err(e))) => {
                tracing::error!(error = %e, "Transcription failed");
                Err(FailureKind::InferenceError)
            }
            Ok(Err(_)) => {
                tracing::error!("Transcription engine panicked");
                Err(FailureKind::InferenceError)
            }
            Err(_) => {
                tracing::warn!("Transcription exceeded request deadline");
                Err(FailureKind::InferenceTimeout)
            }
        }
    }
}

/// Metadata kept aside while the payload sits in the staging store.
struct StagedMedia {
    status: u16,
    content_type: Option<String>,
}

async fn write_staged(
    store: &dyn StagingStore,
    path: &StoragePath,
    media: RawMediaBytes,
) -> Result<StagedMedia, FailureKind> {
    let staged = StagedMedia {
        status: media.status(),
        content_type: media.content_type().map(String::from),
    };

    let written = store.store(path, media.into_bytes()).await.map_err(|e| {
        tracing::error!(error = %e, path = %path, "Failed to stage media");
        FailureKind::StagingFailed
    })?;
    tracing::debug!(bytes = written, path = %path, "Media staged");

    Ok(staged)
}

async fn read_staged(
    store: &dyn StagingStore,
    path: &StoragePath,
    staged: StagedMedia,
) -> Result<RawMediaBytes, FailureKind> {
    let data = store.fetch(path).await.map_err(|e| {
        tracing::error!(error = %e, path = %path, "Failed to read staged media");
        FailureKind::StagingFailed
    })?;

    Ok(RawMediaBytes::new(data, staged.status, staged.content_type))
}

fn enter_stage(stage: PipelineStage) -> PipelineStage {
    tracing::debug!(stage = %stage, "Pipeline stage transition");
    stage
}

fn fail(stage: PipelineStage, kind: FailureKind) -> PipelineResult {
    tracing::warn!(stage = %stage, kind = %kind, "Pipeline run failed");
    PipelineResult::failure(kind)
}
