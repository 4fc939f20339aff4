//! Client configuration
//!
//! Read from the environment (optionally through a `.env` file):
//!
//! | Variable | Default |
//! |---|---|
//! | `GYMBOOK_API_URL` | `http://localhost:5000/api` |
//! | `GYMBOOK_HTTP_TIMEOUT_SECS` | `30` |

use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

pub const API_URL_VAR: &str = "GYMBOOK_API_URL";
pub const TIMEOUT_VAR: &str = "GYMBOOK_HTTP_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("Gymbook/", env!("CARGO_PKG_VERSION"));

/// Settings of the backend HTTP client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// Validate `api_url` and use default timeout and user agent
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(api_url).map_err(|source| ConfigError::InvalidUrl {
            value: api_url.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(api_url.to_string()));
        }

        Ok(Self {
            api_url: parsed,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut config = Self::new(api_url.trim())?;

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            if secs == 0 {
                return Err(ConfigError::InvalidTimeout(raw));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// API base without trailing slash
    pub fn base_url(&self) -> &str {
        self.api_url.as_str().trim_end_matches('/')
    }

    /// Absolute URL of an API path such as `Appointments/users`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }
}
