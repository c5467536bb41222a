mod health;
mod media;
mod sms;

pub use health::{HealthResponse, health_handler};
pub use media::{MediaWebhookForm, NO_AUDIO_MESSAGE, media_handler};
pub use sms::{ASK_FOR_AUDIO_MESSAGE, GREETING_MESSAGE, SmsWebhookForm, sms_handler};
