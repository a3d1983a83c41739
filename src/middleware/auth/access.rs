//! Bearer token → `User` → RequestCtx を extensions に入れる
//!
//! 1. `Authorization: Bearer <token>` を取り出す（無い・形式違いは 401）
//! 2. TokenChecker で User を解決する（RequestCtx を渡す）
//! 3. 成功: `ctx.with_user(user)` で差し替えて次へ
//!    InvalidToken: 401 / それ以外の失敗: 500

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::RequestCtx;
use crate::error::AppError;
use crate::services::auth::CheckFailure;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// 保護したいルートに認証を掛ける。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/me", get(me));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer: unmatched paths keep returning 404 instead of 401
    router.route_layer(middleware::from_fn_with_state(state, check_auth))
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// Header missing, not visible ASCII, or a different scheme → `None`.
/// The token is whatever follows the prefix, possibly empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
}

async fn check_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<RequestCtx>()
        .cloned()
        .unwrap_or_else(|| RequestCtx::from_headers(req.headers()));

    let Some(token) = bearer_token(req.headers()) else {
        tracing::warn!(request_id = ?ctx.request_id(), "missing or malformed bearer credential");
        return Err(AppError::Unauthorized);
    };

    let user = match state.auth.authenticate(&ctx, token).await {
        Ok(user) => user,
        Err(err @ CheckFailure::InvalidToken(_)) => {
            tracing::warn!(request_id = ?ctx.request_id(), error = %err, "bearer token rejected");
            return Err(err.into());
        }
        Err(err) => {
            tracing::error!(request_id = ?ctx.request_id(), error = %err, "token check failed");
            return Err(err.into());
        }
    };

    tracing::debug!(request_id = ?ctx.request_id(), "authenticated");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(ctx.with_user(user));

    Ok(next.run(req).await)
}
