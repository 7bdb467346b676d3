//! Connection settings for the SciCat backend.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScicatError};

/// Environment variable holding the backend base URL.
pub const ENV_URL: &str = "SCICAT_URL";
/// Environment variable holding an access token.
pub const ENV_TOKEN: &str = "SCICAT_TOKEN";
/// Environment variable holding the login name.
pub const ENV_USERNAME: &str = "SCICAT_USERNAME";
/// Environment variable holding the login password.
pub const ENV_PASSWORD: &str = "SCICAT_PASSWORD";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT: &str = "SCICAT_TIMEOUT_SECS";

/// How to reach and authenticate against a SciCat backend.
///
/// Either `token` or both `username` and `password` must be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL, e.g. `http://localhost:3000/api/v3`.
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Request timeout in seconds (None = no timeout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Read settings from `SCICAT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (environment, test maps).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(ENV_URL).ok_or_else(|| {
            ScicatError::Config(format!("{} environment variable not set", ENV_URL))
        })?;
        let timeout_secs = match lookup(ENV_TIMEOUT) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                ScicatError::Config(format!("Invalid {} '{}': {}", ENV_TIMEOUT, raw, e))
            })?),
            None => None,
        };

        let config = Self {
            base_url,
            token: lookup(ENV_TOKEN),
            username: lookup(ENV_USERNAME),
            password: lookup(ENV_PASSWORD),
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that a base URL and some form of credentials are present.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ScicatError::Config(
                "SciCat database URL must be provided".to_string(),
            ));
        }
        let has_token = self.token.as_deref().is_some_and(|t| !t.is_empty());
        let has_credentials = self.username.is_some() && self.password.is_some();
        if !has_token && !has_credentials {
            return Err(ScicatError::Config(
                "SciCat login credentials (username, password) must be provided if token is not provided"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL with a trailing slash.
    pub fn normalized_base_url(&self) -> String {
        normalize_base_url(&self.base_url)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

pub(crate) fn normalize_base_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
