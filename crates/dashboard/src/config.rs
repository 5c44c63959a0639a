//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BLOG_API_URL` - Base URL of the blog backend (e.g., <http://localhost:3000>)
//!
//! ## Optional
//! - `DASHBOARD_HOST` - Bind address (default: 127.0.0.1)
//! - `DASHBOARD_PORT` - Listen port (default: 5173)
//! - `DASHBOARD_THEME` - Initial theme, `light` or `dark` (default: light)
//! - `BLOG_ACCESS_TOKEN` - Token sent as the `access_token` cookie
//! - `BLOG_API_TIMEOUT_SECS` - Per-request timeout (default: none)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Optional (session)
//! - `SESSION_USER_ID` - Signed-in user; when unset the dashboard runs signed out
//! - `SESSION_IS_ADMIN` - `true`/`false` (default: false)
//! - `SESSION_USERNAME`, `SESSION_EMAIL`, `SESSION_PROFILE_PICTURE`

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ideafusion_core::{Session, Theme};
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Dashboard application configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Blog backend connection settings
    pub api: BlogApiConfig,
    /// Signed-in user, if any
    pub session: Option<Session>,
    /// Theme at startup
    pub theme: Theme,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Blog backend configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct BlogApiConfig {
    /// Base URL; endpoint paths are joined onto it
    pub base_url: Url,
    /// Session token forwarded to the backend as a cookie
    pub access_token: Option<SecretString>,
    /// Request timeout. `None` means requests may wait forever.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for BlogApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BlogApiConfig {
    /// Configuration with no token and no timeout.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            access_token: None,
            timeout: None,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the access token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`DashboardConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);

        let host = env
            .or_default("DASHBOARD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("DASHBOARD_PORT", "5173")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_PORT".to_string(), e.to_string()))?;
        let theme = env
            .or_default("DASHBOARD_THEME", "light")
            .parse::<Theme>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("DASHBOARD_THEME".to_string(), e.to_string())
            })?;

        let api = BlogApiConfig::from_env(&env)?;
        let session = session_from_env(&env)?;

        let json_logs = env
            .optional("LOG_FORMAT")
            .is_some_and(|f| f.eq_ignore_ascii_case("json"));
        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);

        Ok(Self {
            host,
            port,
            api,
            session,
            theme,
            json_logs,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BlogApiConfig {
    fn from_env<F>(env: &Env<'_, F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = parse_base_url(&env.required("BLOG_API_URL")?)?;

        let access_token = match env.optional("BLOG_ACCESS_TOKEN") {
            Some(token) => {
                validate_secret_strength(&token, "BLOG_ACCESS_TOKEN")?;
                Some(SecretString::from(token))
            }
            None => None,
        };

        let timeout = env
            .optional("BLOG_API_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ConfigError::InvalidEnvVar("BLOG_API_TIMEOUT_SECS".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            base_url,
            access_token,
            timeout,
        })
    }
}

/// Build the session from `SESSION_*` variables.
///
/// No user id means signed out.
fn session_from_env<F>(env: &Env<'_, F>) -> Result<Option<Session>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(user_id) = env.optional("SESSION_USER_ID") else {
        return Ok(None);
    };

    let is_admin = env
        .optional("SESSION_IS_ADMIN")
        .map(|raw| parse_bool(&raw, "SESSION_IS_ADMIN"))
        .transpose()?
        .unwrap_or(false);

    Ok(Some(Session {
        user_id: user_id.into(),
        is_admin,
        username: env.optional("SESSION_USERNAME").unwrap_or_default(),
        email: env.optional("SESSION_EMAIL").unwrap_or_default(),
        profile_picture: env.optional("SESSION_PROFILE_PICTURE"),
    }))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source wrapper. Empty values count as unset.
struct Env<'a, F>(&'a F);

impl<F> Env<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Parse the backend base URL. Only http(s) is accepted.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("BLOG_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "BLOG_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_bool(raw: &str, var_name: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config =
            DashboardConfig::from_lookup(lookup(&[("BLOG_API_URL", "http://localhost:3000")]))
                .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5173");
        assert_eq!(config.theme, Theme::Light);
        assert!(config.session.is_none());
        assert!(config.api.timeout.is_none());
        assert!(config.api.access_token.is_none());
        assert!(!config.json_logs);
    }

    #[test]
    fn test_missing_api_url() {
        let err = DashboardConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "BLOG_API_URL"));
    }

    #[test]
    fn test_rejects_non_http_api_url() {
        let err =
            DashboardConfig::from_lookup(lookup(&[("BLOG_API_URL", "ftp://files.local")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_session_from_env() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("BLOG_API_URL", "http://localhost:3000"),
            ("SESSION_USER_ID", "65f0c2a1"),
            ("SESSION_IS_ADMIN", "true"),
            ("SESSION_USERNAME", "ada"),
        ]))
        .unwrap();

        let session = config.session.unwrap();
        assert_eq!(session.user_id.as_str(), "65f0c2a1");
        assert!(session.is_admin);
        assert_eq!(session.username, "ada");
        assert!(session.profile_picture.is_none());
    }

    #[test]
    fn test_invalid_admin_flag() {
        let err = DashboardConfig::from_lookup(lookup(&[
            ("BLOG_API_URL", "http://localhost:3000"),
            ("SESSION_USER_ID", "u1"),
            ("SESSION_IS_ADMIN", "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "SESSION_IS_ADMIN"));
    }

    #[test]
    fn test_timeout_and_theme() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("BLOG_API_URL", "https://blog.internal"),
            ("BLOG_API_TIMEOUT_SECS", "15"),
            ("DASHBOARD_THEME", "dark"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.api.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.theme, Theme::Dark);
        assert!(config.json_logs);
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let err = DashboardConfig::from_lookup(lookup(&[
            ("BLOG_API_URL", "http://localhost:3000"),
            ("BLOG_ACCESS_TOKEN", "your-token-here"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("BLOG_API_URL", "http://localhost:3000"),
            ("BLOG_ACCESS_TOKEN", "eyJhbGciOiJIUzI1NiJ9.aB3xY9mK2nL5pQ7"),
        ]))
        .unwrap();
        let debug = format!("{:?}", config.api);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("eyJhbGci"));
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("BLOG_API_URL", "http://localhost:3000"),
            ("SESSION_USER_ID", "  "),
        ]))
        .unwrap();
        assert!(config.session.is_none());
    }
}
