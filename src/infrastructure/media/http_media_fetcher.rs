use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use reqwest::header::CONTENT_TYPE;

use crate::application::ports::{FetchError, MediaFetcher};
use crate::domain::{MediaReference, RawMediaBytes};

/// Twilio's own per-message media limit.
pub const DEFAULT_MAX_MEDIA_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_media_bytes: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(60),
            max_media_bytes: DEFAULT_MAX_MEDIA_BYTES,
        }
    }
}

pub struct HttpMediaFetcher {
    client: reqwest::Client,
    max_media_bytes: u64,
}

impl HttpMediaFetcher {
    pub fn new(options: FetchOptions) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("client: {}", e)))?;

        Ok(Self {
            client,
            max_media_bytes: options.max_media_bytes,
        })
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, reference: &MediaReference) -> Result<RawMediaBytes, FetchError> {
        let url = reqwest::Url::parse(reference.url())
            .map_err(|e| FetchError::Network(format!("invalid url: {}", e)))?;

        let mut request = self.client.get(url);
        if let Some(credentials) = reference.credentials() {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let mut response = request.send().await.map_err(describe_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::MediaUnavailable {
                status: status.as_u16(),
            });
        }

        if let Some(declared) = response.content_length() {
            if declared > self.max_media_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_media_bytes,
                    actual: declared,
                });
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .or_else(|| reference.declared_content_type().map(String::from));

        let initial_capacity = response
            .content_length()
            .unwrap_or(0)
            .min(self.max_media_bytes) as usize;
        let mut body = BytesMut::with_capacity(initial_capacity);

        while let Some(chunk) = response.chunk().await.map_err(describe_transport_error)? {
            let received = (body.len() + chunk.len()) as u64;
            if received > self.max_media_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_media_bytes,
                    actual: received,
                });
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(
            status = status.as_u16(),
            bytes = body.len(),
            content_type = ?content_type,
            "Media download completed"
        );

        Ok(RawMediaBytes::new(
            body.freeze(),
            status.as_u16(),
            content_type,
        ))
    }
}

fn describe_transport_error(e: reqwest::Error) -> FetchError {
    let cause = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_body() || e.is_decode() {
        "body"
    } else {
        "request"
    };
    FetchError::Network(format!("{}: {}", cause, e.without_url()))
}
