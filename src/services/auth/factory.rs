/// Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use anyhow::Context;

use crate::config::{Config, TokenBackend};
use crate::services::auth::{
    AuthService,
    checker::TokenChecker,
    store::{CachedTokenChecker, StaticTokenChecker},
};

pub async fn build_auth_service(config: &Config) -> anyhow::Result<Arc<AuthService>> {
    let checker: Arc<dyn TokenChecker> = match &config.token_backend {
        TokenBackend::Static { path } => {
            let checker = StaticTokenChecker::load(path)
                .await
                .context("loading static token table")?;
            tracing::info!(path = %path.display(), tokens = checker.len(), "static token table loaded");
            Arc::new(checker)
        }
        TokenBackend::Valkey { url, key_prefix } => {
            let checker = CachedTokenChecker::connect(url, key_prefix.clone())
                .await
                .context("connecting to valkey token store")?;
            tracing::info!(key_prefix = %key_prefix, "valkey token store connected");
            Arc::new(checker)
        }
    };

    Ok(Arc::new(AuthService::new(
        checker,
        config.auth_check_timeout,
    )))
}
