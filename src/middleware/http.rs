//! HTTP-level middleware (cross-cutting concerns).
//!
//! Outer → inner:
//! 1. errors from the stack → status (408 for the global deadline)
//! 2. `x-request-id`: reuse the client's or mint one, echo it on the response
//! 3. one `request` span per request, tagged with that id
//! 4. 1 MiB body limit
//! 5. global deadline; the token check runs inside it, so it is cut off too

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::{Request, StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::api::v1::extractors::request_ctx::REQUEST_ID_HEADER;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

pub fn apply(router: Router, request_timeout: Duration) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_stack_error))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TimeoutLayer::new(request_timeout));

    router.layer(layers)
}

async fn handle_stack_error(err: BoxError) -> StatusCode {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("request deadline exceeded");
        StatusCode::REQUEST_TIMEOUT
    } else {
        tracing::error!(error = %err, "unhandled middleware error");
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

// Span fields never include headers other than the request id (no credentials)
fn request_span(req: &Request<Body>) -> Span {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        request_id = %request_id,
    )
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    fn app(request_timeout: Duration) -> Router {
        let router = Router::new()
            .route("/fast", get(|| async { "ok" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(10)).await;
                    "late"
                }),
            );

        apply(router, request_timeout)
    }

    fn get_request(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn slow_request_hits_configured_deadline() {
        let resp = app(Duration::from_millis(20))
            .oneshot(get_request("/slow"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn request_id_is_minted_when_missing() {
        let resp = app(Duration::from_secs(1))
            .oneshot(get_request("/fast"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let id = resp.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(!id.is_empty());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let resp = app(Duration::from_secs(1))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/fast")
                    .header("content-length", (BODY_LIMIT_BYTES + 1).to_string())
                    .body(Body::from(vec![0u8; BODY_LIMIT_BYTES + 1]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
