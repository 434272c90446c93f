/*
 * Responsibility
 * - Load environment configuration (content API, session keys, gate settings)
 * - Validate at startup (missing/invalid keys fail the boot, not the first request)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
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

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // Headless content/document store (holds all portal data)
    pub content_api_base_url: Url,
    pub content_api_dataset: String,
    pub content_api_token: SecretString,
    pub content_api_timeout: Duration,

    // Identity provider session verification
    pub session_jwt_public_key_pem: String,
    pub session_issuer: String,
    pub session_audience: String,
    pub session_leeway_seconds: u64,

    // RBAC gate
    pub protected_prefixes: Vec<String>,
    pub role_lookup_timeout: Duration,

    // Provisioning webhook (identity provider -> user document upsert)
    pub webhook_secret: SecretString,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let content_api_base_url = std::env::var("CONTENT_API_BASE_URL")
            .map_err(|_| ConfigError::Missing("CONTENT_API_BASE_URL"))
            .and_then(|s| Url::parse(&s).map_err(|_| ConfigError::Invalid("CONTENT_API_BASE_URL")))?;

        let content_api_dataset = std::env::var("CONTENT_API_DATASET")
            .map_err(|_| ConfigError::Missing("CONTENT_API_DATASET"))?;

        let content_api_token = std::env::var("CONTENT_API_TOKEN")
            .map_err(|_| ConfigError::Missing("CONTENT_API_TOKEN"))?
            .into();

        let content_api_timeout = Duration::from_millis(
            std::env::var("CONTENT_API_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10_000),
        );

        let session_jwt_public_key_pem = std::env::var("SESSION_JWT_PUBLIC_KEY_PEM")
            .map_err(|_| ConfigError::Missing("SESSION_JWT_PUBLIC_KEY_PEM"))?
            .replace("\\n", "\n");

        let session_issuer =
            std::env::var("SESSION_ISSUER").map_err(|_| ConfigError::Missing("SESSION_ISSUER"))?;

        let session_audience = std::env::var("SESSION_AUDIENCE")
            .map_err(|_| ConfigError::Missing("SESSION_AUDIENCE"))?;

        let session_leeway_seconds = std::env::var("SESSION_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        // Comma-separated; defaults to the dashboard area.
        let protected_prefixes = std::env::var("PROTECTED_PREFIXES")
            .unwrap_or_else(|_| "/dashboard".to_string())
            .split(',')
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| s.starts_with('/'))
            .collect::<Vec<_>>();

        if protected_prefixes.is_empty() {
            return Err(ConfigError::Invalid("PROTECTED_PREFIXES"));
        }

        let role_lookup_timeout = Duration::from_millis(
            std::env::var("ROLE_LOOKUP_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(3_000),
        );

        let webhook_secret = std::env::var("IDENTITY_WEBHOOK_SECRET")
            .map_err(|_| ConfigError::Missing("IDENTITY_WEBHOOK_SECRET"))?
            .into();

        let request_timeout = Duration::from_secs(
            std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        );

        let request_body_limit_bytes = std::env::var("REQUEST_BODY_LIMIT_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(8 * 1024 * 1024);

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            content_api_base_url,
            content_api_dataset,
            content_api_token,
            content_api_timeout,
            session_jwt_public_key_pem,
            session_issuer,
            session_audience,
            session_leeway_seconds,
            protected_prefixes,
            role_lookup_timeout,
            webhook_secret,
            request_timeout,
            request_body_limit_bytes,
        })
    }
}
