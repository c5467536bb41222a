use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware;
use axum::routing::get;
use tower::ServiceExt;

use murmur::infrastructure::observability::{
    REQUEST_ID_HEADER, request_id_middleware,
};

fn echo_app() -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .layer(middleware::from_fn(request_id_middleware))
}

#[tokio::test]
async fn given_incoming_request_id_when_handled_then_it_is_echoed() {
    let request = Request::builder()
        .uri("/")
        .header(REQUEST_ID_HEADER, "req-42")
        .body(Body::empty())
        .unwrap();

    let response = echo_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "req-42");
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn given_no_request_id_when_handled_then_a_uuid_is_generated() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let response = echo_app().oneshot(request).await.unwrap();

    let id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}
