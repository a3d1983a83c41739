/*!
 * Request context extractor
 *
 * Responsibility:
 * - リクエスト単位のコンテキスト（RequestCtx）と認証済み User を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - RequestCtx, current_user
 * - Ctx, CurrentUser
 */

mod core;
mod types;

pub use self::core::{Ctx, CurrentUser};
pub use self::types::{REQUEST_ID_HEADER, RequestCtx, current_user};
