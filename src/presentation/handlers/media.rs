use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::domain::{MediaReference, PipelineResult};
use crate::infrastructure::observability::sanitize_for_log;
use crate::presentation::state::AppState;
use crate::presentation::twiml::MessagingResponse;

pub const NO_AUDIO_MESSAGE: &str = "No audio file received";

/// Fields of an inbound messaging webhook that carry media.
#[derive(Debug, Default, Deserialize)]
pub struct MediaWebhookForm {
    #[serde(rename = "MediaUrl0")]
    pub media_url: Option<String>,
    #[serde(rename = "MediaContentType0")]
    pub media_content_type: Option<String>,
    #[serde(rename = "From")]
    pub from: Option<String>,
}

#[tracing::instrument(skip_all)]
pub async fn media_handler(
    State(state): State<AppState>,
    Form(form): Form<MediaWebhookForm>,
) -> Response {
    transcribe_media(&state, form).await
}

pub(crate) async fn transcribe_media(state: &AppState, form: MediaWebhookForm) -> Response {
    let Some(media_url) = form.media_url.filter(|url| !url.trim().is_empty()) else {
        tracing::warn!("Media webhook without a media URL");
        return (StatusCode::BAD_REQUEST, NO_AUDIO_MESSAGE).into_response();
    };

    tracing::info!(
        from = ?form.from,
        url = %sanitize_for_log(&media_url),
        content_type = ?form.media_content_type,
        "Received voice note"
    );

    let mut reference = MediaReference::new(media_url);
    if let Some(credentials) = &state.media_credentials {
        reference = reference.with_credentials(credentials.clone());
    }
    if let Some(content_type) = form.media_content_type {
        reference = reference.with_declared_content_type(content_type);
    }

    let result = state.pipeline.run(&reference).await;
    match &result {
        PipelineResult::Success(transcript) => tracing::info!(
            outcome = %transcript.outcome,
            preview = %sanitize_for_log(&transcript.text),
            "Replying with transcription"
        ),
        PipelineResult::Failure { kind, .. } => {
            tracing::warn!(kind = %kind, "Replying with failure message")
        }
    }

    MessagingResponse::new()
        .message(result.reply_text())
        .into_response()
}
