use config::{Config, ConfigError, Environment as EnvironmentSource, File};

use super::{Environment, Settings};

pub const ENV_PREFIX: &str = "APP";

/// Layer `appsettings.{env}.toml` (optional) under `APP_*` variables.
///
/// Nested keys use a double underscore: `APP_MODEL__MODEL_ID`.
pub fn load_settings(environment: Environment) -> Result<Settings, ConfigError> {
    let configuration = Config::builder()
        .add_source(
            File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
        )
        .add_source(
            EnvironmentSource::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let mut settings: Settings = configuration.try_deserialize()?;
    settings.twilio = settings.twilio.with_env_fallbacks();
    Ok(settings)
}
