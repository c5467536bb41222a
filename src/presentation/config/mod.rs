mod environment;
mod loader;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use loader::{ENV_PREFIX, load_settings};
pub use settings::{
    AudioSettings, DecoderSetting, DeviceSetting, FetchSettings, LoggingSettings, ModelSettings,
    PipelineSettings, ServerSettings, Settings, StagingSettings, TwilioSettings,
};
