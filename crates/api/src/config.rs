use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Default upload ceiling: 50 MiB.
const DEFAULT_UPLOAD_MAX_BYTES: usize = 50 * 1024 * 1024;

/// Default engagement event retention in days.
const DEFAULT_ANALYTICS_RETENTION_DAYS: i64 = 90;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Root directory for uploaded media.
    pub upload_dir: PathBuf,
    /// Largest accepted upload in bytes.
    pub upload_max_bytes: usize,
    /// Engagement events older than this many days are purged daily.
    pub analytics_retention_days: i64,
    /// Whether auth cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `UPLOAD_DIR`               | `storage/uploads`          |
    /// | `UPLOAD_MAX_BYTES`         | `52428800`                 |
    /// | `ANALYTICS_RETENTION_DAYS` | `90`                       |
    /// | `COOKIE_SECURE`            | `true`                     |
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            upload_dir: PathBuf::from(
                std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "storage/uploads".into()),
            ),
            upload_max_bytes: env_or("UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES),
            analytics_retention_days: env_or(
                "ANALYTICS_RETENTION_DAYS",
                DEFAULT_ANALYTICS_RETENTION_DAYS,
            ),
            cookie_secure,
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Parse `name` from the environment, falling back to `default` when unset.
///
/// # Panics
///
/// Panics when the variable is set but does not parse.
pub(crate) fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
