use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tokio::time::Instant;

use crate::api::v1::extractors::RequestCtx;
use crate::services::auth::{
    User,
    checker::{CheckErrorKind, TokenChecker},
};

/// Why a bearer token could not be turned into a `User`.
#[derive(Debug, Error)]
pub enum CheckFailure {
    #[error("token rejected: {0:#}")]
    InvalidToken(anyhow::Error),

    #[error("token checker failed: {0:#}")]
    Checker(anyhow::Error),

    #[error("token check timed out after {0:?}")]
    TimedOut(Duration),
}

impl CheckFailure {
    pub fn kind(&self) -> CheckErrorKind {
        match self {
            Self::InvalidToken(_) => CheckErrorKind::InvalidToken,
            Self::Checker(_) | Self::TimedOut(_) => CheckErrorKind::Other,
        }
    }
}

/// Wraps the configured `TokenChecker` with the per-call time budget.
///
/// - No retries: one call, one classification.
/// - The call runs inside the request future, so dropping the request
///   (client disconnect, global timeout) drops the check as well.
/// - The checker sees the budget as `ctx.deadline()` and can bound its own I/O.
#[derive(Clone)]
pub struct AuthService {
    checker: Arc<dyn TokenChecker>,
    check_timeout: Duration,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("check_timeout", &self.check_timeout)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(checker: Arc<dyn TokenChecker>, check_timeout: Duration) -> Self {
        Self {
            checker,
            check_timeout,
        }
    }

    pub async fn authenticate(&self, ctx: &RequestCtx, token: &str) -> Result<User, CheckFailure> {
        let ctx = ctx.with_deadline(Instant::now() + self.check_timeout);
        let deadline = ctx.deadline().unwrap_or_else(Instant::now);

        let outcome = tokio::time::timeout_at(deadline, self.checker.check_token(&ctx, token))
            .await
            .map_err(|_| CheckFailure::TimedOut(self.check_timeout))?;

        outcome.map_err(|err| match CheckErrorKind::classify(&err) {
            CheckErrorKind::InvalidToken => CheckFailure::InvalidToken(err),
            CheckErrorKind::Other => CheckFailure::Checker(err),
        })
    }
}
