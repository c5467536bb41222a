use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug)]
struct RequestId(String);

impl RequestId {
    /// Reuse the caller's id when it sent a usable one.
    fn from_request(request: &Request) -> Self {
        let id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Self(id)
    }
}

/// Runs each webhook call inside a `webhook` span keyed by its request id and
/// echoes the id back on the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = RequestId::from_request(&request);
    let span = tracing::info_span!(
        "webhook",
        request_id = %request_id.0,
        method = %request.method(),
        path = %request.uri().path()
    );

    let started = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::debug!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Webhook handled"
        );
    });

    match HeaderValue::from_str(&request_id.0) {
        Ok(value) => {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(_) => tracing::warn!(request_id = %request_id.0, "Request id is not a valid header value"),
    }

    response
}
