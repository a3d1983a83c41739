pub mod request_ctx;

pub use request_ctx::{Ctx, CurrentUser, RequestCtx, current_user};
