//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MINISHOP_API_URL` - GraphQL endpoint of the shop API
//! - `MINISHOP_BASE_URL` - Public URL of the console (`https://` enables secure cookies)
//!
//! ## Optional
//! - `MINISHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `MINISHOP_PORT` - Listen port (default: 3000)
//! - `MINISHOP_API_TIMEOUT_SECS` - Upstream request timeout (default: 10)
//! - `MINISHOP_CACHE_TTL_SECS` - Query cache lifetime (default: 30)
//! - `MINISHOP_STATIC_DIR` - Static assets directory (default: crates/web/static)
//! - `MINISHOP_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Console configuration.
#[derive(Debug, Clone)]
pub struct MiniShopConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the console
    pub base_url: String,
    /// Shop API configuration
    pub api: ApiConfig,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Emit flattened JSON logs instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Shop GraphQL API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// GraphQL endpoint URL
    pub url: Url,
    /// Timeout applied to every upstream request
    pub timeout: Duration,
    /// Lifetime of cached list and aggregate queries
    pub cache_ttl: Duration,
}

impl MiniShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = parse_env_or_default(&lookup, "MINISHOP_HOST", "127.0.0.1")?;
        let port = parse_env_or_default(&lookup, "MINISHOP_PORT", "3000")?;
        let base_url = get_required_env(&lookup, "MINISHOP_BASE_URL")?;
        validate_http_url(&base_url, "MINISHOP_BASE_URL")?;

        let api = ApiConfig::from_lookup(&lookup)?;
        let static_dir = PathBuf::from(get_env_or_default(
            &lookup,
            "MINISHOP_STATIC_DIR",
            "crates/web/static",
        ));
        let log_json = lookup("MINISHOP_LOG_JSON").is_some();

        Ok(Self {
            host,
            port,
            base_url,
            api,
            static_dir,
            log_json,
            sentry_dsn: get_optional_env(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional_env(&lookup, "SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default(&lookup, "SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default(
                &lookup,
                "SENTRY_TRACES_SAMPLE_RATE",
                "0.0",
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ApiConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = get_required_env(lookup, "MINISHOP_API_URL")?;
        let url = validate_http_url(&raw_url, "MINISHOP_API_URL")?;
        let timeout_secs: u64 = parse_env_or_default(lookup, "MINISHOP_API_TIMEOUT_SECS", "10")?;
        let cache_ttl_secs: u64 = parse_env_or_default(lookup, "MINISHOP_CACHE_TTL_SECS", "30")?;

        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable. Blank values count as missing.
fn get_required_env<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    get_optional_env(lookup, key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(lookup, key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a URL and require an `http` or `https` scheme.
fn validate_http_url(value: &str, key: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("MINISHOP_API_URL", "http://localhost:8000/graphql/"),
        ("MINISHOP_BASE_URL", "http://localhost:3000"),
    ];

    #[test]
    fn test_defaults() {
        let config = MiniShopConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert_eq!(config.api.cache_ttl, Duration::from_secs(30));
        assert_eq!(config.static_dir, PathBuf::from("crates/web/static"));
        assert!(!config.log_json);
        assert!(!config.is_secure());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_api_url() {
        let err = MiniShopConfig::from_lookup(lookup_from(&[REQUIRED[1]])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "MINISHOP_API_URL"));
    }

    #[test]
    fn test_blank_is_missing() {
        let err = MiniShopConfig::from_lookup(lookup_from(&[
            REQUIRED[0],
            ("MINISHOP_BASE_URL", "  "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "MINISHOP_BASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("MINISHOP_PORT", "http"));
        let err = MiniShopConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "MINISHOP_PORT"));
    }

    #[test]
    fn test_api_url_scheme() {
        let err = MiniShopConfig::from_lookup(lookup_from(&[
            ("MINISHOP_API_URL", "ftp://example.mg/graphql"),
            REQUIRED[1],
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "MINISHOP_API_URL"));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("MINISHOP_BASE_URL", "https://console.minishop.mg"),
            ("MINISHOP_PORT", "8080"),
            ("MINISHOP_CACHE_TTL_SECS", "0"),
            ("MINISHOP_LOG_JSON", "1"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ]);
        let config = MiniShopConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.api.cache_ttl, Duration::ZERO);
        assert!(config.log_json);
        assert!(config.is_secure());
        assert!(config.sentry_dsn.is_some());
    }
}
