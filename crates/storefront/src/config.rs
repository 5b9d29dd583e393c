//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BAZAAR_API_URL` - Base URL of the storefront REST API
//!
//! ## Optional
//! - `BAZAAR_DATA_DIR` - Directory for durable client storage (default: `.bazaar`)
//! - `BAZAAR_TOKEN_SCOPE` - Where the bearer token lives: `durable` or `session` (default: `durable`)
//! - `BAZAAR_TOKEN` - Bearer token seeded into session-scoped storage at startup
//! - `BAZAAR_REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".bazaar";
const DEFAULT_TIMEOUT_SECS: &str = "10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which storage backend holds the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenScope {
    /// Process-lifetime storage; forgotten on exit.
    Session,
    /// On-disk storage; survives restarts.
    #[default]
    Durable,
}

impl FromStr for TokenScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "session" => Ok(Self::Session),
            "durable" | "local" => Ok(Self::Durable),
            other => Err(format!("expected `session` or `durable`, got `{other}`")),
        }
    }
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST API settings
    pub api: ApiConfig,
    /// Directory for durable storage
    pub data_dir: PathBuf,
    /// Backend that holds the bearer token
    pub token_scope: TokenScope,
    /// Token seeded into session storage (redacted in `Debug`)
    pub session_token: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// REST API connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; endpoint paths are appended to it
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
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

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let base_url = vars.required("BAZAAR_API_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("BAZAAR_API_URL".to_string(), e.to_string())
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "BAZAAR_API_URL".to_string(),
                "must be a hierarchical URL such as https://api.example.com/".to_string(),
            ));
        }

        let timeout_secs = vars
            .or_default("BAZAAR_REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BAZAAR_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let token_scope = vars
            .optional("BAZAAR_TOKEN_SCOPE")
            .map(|raw| raw.parse::<TokenScope>())
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("BAZAAR_TOKEN_SCOPE".to_string(), e))?
            .unwrap_or_default();

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            data_dir: PathBuf::from(vars.or_default("BAZAAR_DATA_DIR", DEFAULT_DATA_DIR)),
            token_scope,
            session_token: vars
                .optional("BAZAAR_TOKEN")
                .filter(|token| !token.is_empty())
                .map(SecretString::from),
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("BAZAAR_API_URL", "http://localhost:4000/api/")]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:4000/api/");
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert_eq!(config.data_dir, PathBuf::from(".bazaar"));
        assert_eq!(config.token_scope, TokenScope::Durable);
        assert!(config.session_token.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_api_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "BAZAAR_API_URL"));
    }

    #[test]
    fn test_invalid_api_url() {
        let err = load(&[("BAZAAR_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "BAZAAR_API_URL"));

        let err = load(&[("BAZAAR_API_URL", "mailto:shop@example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_token_scope_parsing() {
        let config = load(&[
            ("BAZAAR_API_URL", "http://localhost:4000"),
            ("BAZAAR_TOKEN_SCOPE", "Session"),
        ])
        .unwrap();
        assert_eq!(config.token_scope, TokenScope::Session);

        let err = load(&[
            ("BAZAAR_API_URL", "http://localhost:4000"),
            ("BAZAAR_TOKEN_SCOPE", "cookie"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "BAZAAR_TOKEN_SCOPE"));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = load(&[
            ("BAZAAR_API_URL", "http://localhost:4000"),
            ("BAZAAR_REQUEST_TIMEOUT_SECS", "soon"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_session_token_is_redacted() {
        let config = load(&[
            ("BAZAAR_API_URL", "http://localhost:4000"),
            ("BAZAAR_TOKEN", "header.super_secret_payload.sig"),
        ])
        .unwrap();

        assert_eq!(
            config.session_token.as_ref().unwrap().expose_secret(),
            "header.super_secret_payload.sig"
        );
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("super_secret_payload"));
    }
}
