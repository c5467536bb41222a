use axum::Form;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::media::{MediaWebhookForm, transcribe_media};
use crate::presentation::state::AppState;
use crate::presentation::twiml::MessagingResponse;

pub const ASK_FOR_AUDIO_MESSAGE: &str = "Please send an audio file for transcription.";
pub const GREETING_MESSAGE: &str = "Send an audio message, and I will transcribe it for you.";

#[derive(Debug, Default, Deserialize)]
pub struct SmsWebhookForm {
    #[serde(rename = "Body")]
    pub body: Option<String>,
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "NumMedia")]
    pub num_media: Option<String>,
    #[serde(rename = "MediaUrl0")]
    pub media_url: Option<String>,
    #[serde(rename = "MediaContentType0")]
    pub media_content_type: Option<String>,
}

impl SmsWebhookForm {
    fn media_count(&self) -> u32 {
        self.num_media
            .as_deref()
            .and_then(|n| n.trim().parse().ok())
            .unwrap_or(0)
    }
}

#[tracing::instrument(skip_all)]
pub async fn sms_handler(
    State(state): State<AppState>,
    Form(form): Form<SmsWebhookForm>,
) -> Response {
    if form.media_count() > 0 {
        tracing::debug!("Text webhook carries media, routing to transcription");
        let media_form = MediaWebhookForm {
            media_url: form.media_url,
            media_content_type: form.media_content_type,
            from: form.from,
        };
        return transcribe_media(&state, media_form).await;
    }

    let body = form.body.unwrap_or_default();
    let reply = if body.to_lowercase().contains("audio") {
        ASK_FOR_AUDIO_MESSAGE
    } else {
        GREETING_MESSAGE
    };

    MessagingResponse::new().message(reply).into_response()
}
