//! Concrete `TokenChecker` backends.
//!
//! - `StaticTokenChecker`: fixed token table loaded from a JSON file (dev / tests)
//! - `CachedTokenChecker`: `<prefix><sha256(token)>` → JSON `User` in Valkey
use std::{collections::HashMap, path::Path, path::PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::api::v1::extractors::RequestCtx;
use crate::services::auth::{
    User,
    checker::{InvalidToken, TokenChecker},
};
use crate::services::cache::{CacheClient, CacheError, ValkeyClient};

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("failed to read token table {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode user record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("token lookup deadline exceeded")]
    DeadlineExceeded,
}

/// In-memory token table.
///
/// The JSON file is an object mapping token → user:
/// ```json
/// { "token0": { "name": "Fedor", "email": "dartslon@gmail.com" } }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticTokenChecker {
    users: HashMap<String, User>,
}

impl StaticTokenChecker {
    pub fn new(users: HashMap<String, User>) -> Self {
        Self { users }
    }

    pub fn from_json(raw: &str) -> Result<Self, TokenStoreError> {
        let users: HashMap<String, User> = serde_json::from_str(raw)?;
        Ok(Self::new(users))
    }

    pub async fn load(path: &Path) -> Result<Self, TokenStoreError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| TokenStoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_json(&raw)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl TokenChecker for StaticTokenChecker {
    async fn check_token(&self, _ctx: &RequestCtx, token: &str) -> anyhow::Result<User> {
        self.users
            .get(token)
            .cloned()
            .ok_or(InvalidToken)
            .context("unknown token")
    }
}

/// Cache-backed token lookup.
///
/// Only the sha256 digest of a token is used as key material, so the
/// raw credential never reaches the cache backend.
#[derive(Clone, Debug)]
pub struct CachedTokenChecker<C: CacheClient> {
    cache: C,
    // Key prefix to avoid collisions across environments
    prefix: String,
}

impl CachedTokenChecker<ValkeyClient> {
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, TokenStoreError> {
        let client = ValkeyClient::new(url).await?;
        Ok(Self::new(client, prefix))
    }
}

impl<C: CacheClient> CachedTokenChecker<C> {
    pub fn new(cache: C, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    pub fn key_for(&self, token: &str) -> String {
        format!("{}{}", self.prefix, token_digest(token))
    }
}

#[async_trait]
impl<C: CacheClient> TokenChecker for CachedTokenChecker<C> {
    async fn check_token(&self, ctx: &RequestCtx, token: &str) -> anyhow::Result<User> {
        let key = self.key_for(token);

        // Stay inside the caller's budget when one is set
        let lookup = self.cache.get_string(&key);
        let raw = match ctx.deadline() {
            Some(deadline) => match tokio::time::timeout_at(deadline, lookup).await {
                Ok(res) => res.map_err(TokenStoreError::from),
                Err(_) => Err(TokenStoreError::DeadlineExceeded),
            },
            None => lookup.await.map_err(TokenStoreError::from),
        };
        let raw = raw.context("token lookup failed")?;

        let Some(raw) = raw else {
            return Err(InvalidToken).context("token not found");
        };

        // A record we cannot decode is our fault, not the client's
        let user: User = serde_json::from_str(&raw)
            .map_err(TokenStoreError::from)
            .context("stored user record is malformed")?;

        tracing::debug!(
            backend = self.cache.backend_name(),
            request_id = ?ctx.request_id(),
            "token resolved from cache"
        );

        Ok(user)
    }
}

// sha256(token) -> lowercase hex
fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
