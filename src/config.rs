/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, token backend, timeouts)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Where bearer tokens are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenBackend {
    Static { path: PathBuf },
    Valkey { url: String, key_prefix: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Global per-request deadline (tower TimeoutLayer)
    pub request_timeout: Duration,
    // Budget for a single TokenChecker call
    pub auth_check_timeout: Duration,

    pub token_backend: TokenBackend,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV").as_deref());

        let request_timeout = match var("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?,
            None => Duration::from_secs(30),
        };

        let auth_check_timeout = match var("AUTH_CHECK_TIMEOUT_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or(ConfigError::Invalid("AUTH_CHECK_TIMEOUT_MS"))?,
            None => Duration::from_millis(2000),
        };

        let token_backend = match var("TOKEN_BACKEND")
            .unwrap_or_else(|| "static".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "static" => TokenBackend::Static {
                path: var("STATIC_TOKENS_PATH")
                    .map(PathBuf::from)
                    .ok_or(ConfigError::Missing("STATIC_TOKENS_PATH"))?,
            },
            "valkey" => TokenBackend::Valkey {
                url: var("VALKEY_URL").ok_or(ConfigError::Missing("VALKEY_URL"))?,
                key_prefix: var("TOKEN_KEY_PREFIX").unwrap_or_else(|| "auth:token:".to_string()),
            },
            _ => return Err(ConfigError::Invalid("TOKEN_BACKEND")),
        };

        Ok(Self {
            addr,
            app_env,
            request_timeout,
            auth_check_timeout,
            token_backend,
        })
    }
}
