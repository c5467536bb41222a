use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use murmur::application::services::TranscriptionPipeline;
use murmur::infrastructure::audio::{AudioNormalizerFactory, CandleWhisperEngine};
use murmur::infrastructure::media::HttpMediaFetcher;
use murmur::infrastructure::observability::{TracingConfig, init_tracing};
use murmur::infrastructure::storage::LocalStagingStore;
use murmur::presentation::{AppState, Environment, create_router, load_settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = load_settings(environment).context("Failed to load settings")?;

    let mut tracing_config = TracingConfig::default();
    tracing_config.environment = environment.to_string();
    tracing_config.json_format |= settings.logging.enable_json;
    if let Some(level) = &settings.logging.level {
        tracing_config.filter = level.clone();
    }
    init_tracing(&tracing_config);

    let normalizer =
        AudioNormalizerFactory::create(settings.audio.decoder.into(), &settings.audio.ffmpeg_path)
            .context("Audio decoder unavailable")?;
    tracing::info!(decoder = ?settings.audio.decoder, "Audio decoder ready");

    let whisper_options = settings.model.to_whisper_options();
    tracing::info!(model = %whisper_options.model_id, "Loading transcription model");
    let engine = tokio::task::spawn_blocking(move || CandleWhisperEngine::load(whisper_options))
        .await
        .context("Model loading task failed")?
        .context("Failed to load transcription model")?;
    tracing::info!(model = %settings.model.model_id, "Transcription model loaded");

    let fetcher = HttpMediaFetcher::new(settings.fetch.to_fetch_options())
        .context("Failed to build media fetcher")?;

    let mut pipeline = TranscriptionPipeline::new(
        Arc::new(fetcher),
        normalizer,
        Arc::new(engine),
        settings.pipeline.to_pipeline_options(),
    );
    if settings.staging.enabled {
        let store = LocalStagingStore::new(settings.staging.local_path.clone())
            .context("Failed to prepare staging directory")?;
        tracing::info!(path = %settings.staging.local_path.display(), "Disk staging enabled");
        pipeline = pipeline.with_staging_store(Arc::new(store));
    }

    let media_credentials = settings.twilio.media_credentials();
    if media_credentials.is_none() {
        tracing::warn!("No media credentials configured, downloads will be anonymous");
    }

    let state = AppState::new(Arc::new(pipeline)).with_media_credentials(media_credentials);
    let router = create_router(state);

    let ip = settings
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server host: {}", settings.server.host))?;
    let addr = SocketAddr::new(ip, settings.server.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
