/*
 * Responsibility
 * - リクエスト単位の「コンテキスト」の型 (request id + deadline + 認証済み User)
 * - middleware が作って request extensions に格納し、handler は読むだけ
 *
 * Notes
 * - 値は不変。User / deadline を載せるときは `with_*` で新しい値を作る
 */
use std::time::Duration;

use axum::http::HeaderMap;
use tokio::time::Instant;

use crate::services::auth::User;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request-scoped context passed explicitly to the token checker and handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCtx {
    request_id: Option<String>,
    // Point after which downstream I/O (token lookup) should give up
    deadline: Option<Instant>,
    user: Option<User>,
}

impl RequestCtx {
    pub fn new(request_id: Option<String>) -> Self {
        Self {
            request_id,
            deadline: None,
            user: None,
        }
    }

    /// Build a fresh context from the inbound headers (`x-request-id` if present).
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let request_id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        Self::new(request_id)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline; `None` if there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Derive a new context whose deadline is `deadline`, or the existing one if earlier.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        };

        Self {
            deadline: Some(deadline),
            ..self.clone()
        }
    }

    /// Derive a new context carrying `user`. `self` is left as is.
    pub fn with_user(&self, user: User) -> Self {
        Self {
            user: Some(user),
            ..self.clone()
        }
    }
}

/// The authenticated user stored in `ctx`, if any.
pub fn current_user(ctx: &RequestCtx) -> Option<&User> {
    ctx.user.as_ref()
}
