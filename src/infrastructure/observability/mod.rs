mod init_tracing;
mod log_sanitizer;
mod request_id;
mod tracing_config;

pub use init_tracing::init_tracing;
pub use log_sanitizer::sanitize_for_log;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use tracing_config::TracingConfig;
