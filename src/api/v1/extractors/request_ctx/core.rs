use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::User;

use super::{RequestCtx, current_user};

/// Handler で RequestCtx を受け取るための extractor
/// middleware が未適用のルートでは、ヘッダから新しく作る（User なし）
pub struct Ctx(pub RequestCtx);

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<RequestCtx>()
            .cloned()
            .unwrap_or_else(|| RequestCtx::from_headers(&parts.headers));

        Ok(Ctx(ctx))
    }
}

/// Handler で、認証済み User を受け取るための extractor
/// middleware が RequestCtx.with_user(..) を extensions に insert 済みである前提
/// 見つからない場合は 401 を返す（ミドルウェア未設定）
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestCtx>()
            .and_then(current_user)
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}
