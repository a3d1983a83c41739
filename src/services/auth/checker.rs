//! Token checker interface used by the bearer-auth middleware.
use std::{error::Error as StdError, fmt};

use async_trait::async_trait;

use crate::api::v1::extractors::RequestCtx;
use crate::services::auth::User;

/// Sentinel error for "the credential itself is not acceptable".
///
/// Checkers may wrap it with any amount of context: `anyhow::Context`, a
/// thiserror `#[source]` / `#[from]` field, or an `#[error(transparent)]`
/// variant. The middleware finds it by walking the error chain, so the
/// wrapping message is irrelevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidToken;

impl fmt::Display for InvalidToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid token")
    }
}

impl StdError for InvalidToken {
    // `#[error(transparent)]` wrappers hide this type but forward `source()`,
    // so the marker is what `classify` sees in that case.
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&RejectedCredential)
    }
}

#[derive(Debug)]
struct RejectedCredential;

impl fmt::Display for RejectedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("credential rejected")
    }
}

impl StdError for RejectedCredential {}

/// Resolves a bearer token to a `User`.
///
/// Implementations must be cheap to share (`Arc<dyn TokenChecker>`).
/// Returns:
/// - `Ok(user)` if the token is valid
/// - `Err(e)` where `e` wraps `InvalidToken` if the token is rejected
/// - any other `Err(e)` for backend failures (db offline, cache down, ...)
#[async_trait]
pub trait TokenChecker: Send + Sync + 'static {
    async fn check_token(&self, ctx: &RequestCtx, token: &str) -> anyhow::Result<User>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckErrorKind {
    InvalidToken,
    Other,
}

impl CheckErrorKind {
    /// Classify a checker error by looking for `InvalidToken` anywhere in its chain.
    pub fn classify(err: &anyhow::Error) -> Self {
        if err
            .chain()
            .any(|cause| cause.is::<InvalidToken>() || cause.is::<RejectedCredential>())
        {
            Self::InvalidToken
        } else {
            Self::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Context, anyhow};
    use thiserror::Error;

    use super::*;

    #[derive(Debug, Error)]
    #[error("token expired")]
    struct Expired(#[source] InvalidToken);

    #[derive(Debug, Error)]
    #[error("session lookup failed")]
    struct Lookup(#[source] Expired);

    #[test]
    fn bare_sentinel_is_invalid_token() {
        let err = anyhow::Error::new(InvalidToken);
        assert_eq!(CheckErrorKind::classify(&err), CheckErrorKind::InvalidToken);
    }

    #[test]
    fn sentinel_wrapped_with_context_is_invalid_token() {
        let err = Err::<(), _>(InvalidToken)
            .context("token expired")
            .context("checking session")
            .unwrap_err();
        assert_eq!(CheckErrorKind::classify(&err), CheckErrorKind::InvalidToken);
    }

    #[test]
    fn sentinel_behind_source_chain_is_invalid_token() {
        let err = anyhow::Error::new(Lookup(Expired(InvalidToken)));
        assert_eq!(CheckErrorKind::classify(&err), CheckErrorKind::InvalidToken);
    }

    #[derive(Debug, Error)]
    enum SessionError {
        #[error(transparent)]
        Invalid(#[from] InvalidToken),
        #[error("session store unavailable")]
        Unavailable,
    }

    #[test]
    fn sentinel_behind_transparent_wrapper_is_invalid_token() {
        let err = anyhow::Error::new(SessionError::from(InvalidToken));
        assert_eq!(CheckErrorKind::classify(&err), CheckErrorKind::InvalidToken);

        let err =
            anyhow::Error::new(SessionError::Invalid(InvalidToken)).context("checking session");
        assert_eq!(CheckErrorKind::classify(&err), CheckErrorKind::InvalidToken);
    }

    #[test]
    fn non_transparent_sibling_variant_is_other() {
        let err = anyhow::Error::new(SessionError::Unavailable);
        assert_eq!(CheckErrorKind::classify(&err), CheckErrorKind::Other);
    }

    #[test]
    fn message_mentioning_invalid_token_is_not_the_sentinel() {
        let err = anyhow!("invalid token");
        assert_eq!(CheckErrorKind::classify(&err), CheckErrorKind::Other);
    }

    #[test]
    fn backend_failure_is_other() {
        let err = anyhow!("database offline").context("checking token");
        assert_eq!(CheckErrorKind::classify(&err), CheckErrorKind::Other);
    }
}
