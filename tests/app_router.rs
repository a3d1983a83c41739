//! End-to-end tests through `app::build_router` (http layers + v1 routes).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use bearer_gate::api::v1::dto::me::MeResponse;
use bearer_gate::app::build_router;
use bearer_gate::config::Config;
use bearer_gate::services::auth::{AuthService, User, store::StaticTokenChecker};
use bearer_gate::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

fn app() -> Router {
    let config = Config::from_lookup(|key| match key {
        "STATIC_TOKENS_PATH" => Some("unused.json".to_string()),
        _ => None,
    })
    .unwrap();

    let checker = StaticTokenChecker::new(HashMap::from([(
        "token0".to_string(),
        User::new("Fedor", "dartslon@gmail.com"),
    )]));
    let auth = AuthService::new(Arc::new(checker), Duration::from_secs(1));

    build_router(AppState::new(Arc::new(auth)), &config)
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn me_without_token_returns_error_body() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn me_returns_current_user_and_request_id() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/me")
                .header(header::AUTHORIZATION, "Bearer token0")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-request-id"], "req-42");

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let me: MeResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        me,
        MeResponse {
            name: "Fedor".into(),
            email: "dartslon@gmail.com".into(),
            request_id: Some("req-42".into()),
        }
    );
}

#[tokio::test]
async fn me_with_unknown_token_is_unauthorized() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/me")
                .header(header::AUTHORIZATION, "Bearer token2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
