/*
 * Responsibility
 * - GET /me (認証必須)
 * - middleware が載せた User をそのまま返す
 */
use axum::Json;

use crate::api::v1::{
    dto::me::MeResponse,
    extractors::{Ctx, CurrentUser},
};

pub async fn me(CurrentUser(user): CurrentUser, Ctx(ctx): Ctx) -> Json<MeResponse> {
    Json(MeResponse::new(user, ctx.request_id()))
}
