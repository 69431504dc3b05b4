//! Provider configuration
//!
//! The provider block may leave any attribute unset. Each value is resolved
//! in order: non-empty provider attribute, non-empty environment variable,
//! otherwise unset.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable consulted for the endpoint
pub const ENV_ENDPOINT: &str = "UPTIMEKUMA_ENDPOINT";

/// Environment variable consulted for the username
pub const ENV_USERNAME: &str = "UPTIMEKUMA_USERNAME";

/// Environment variable consulted for the password
pub const ENV_PASSWORD: &str = "UPTIMEKUMA_PASSWORD";

/// Default timeout for establishing the socket connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for a single socket call
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw provider block as written by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Uptime Kuma base URL
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Login username
    #[serde(default)]
    pub username: Option<String>,

    /// Login password
    #[serde(default)]
    pub password: Option<String>,
}

/// Fully resolved connection configuration
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Uptime Kuma base URL (`http://` or `https://`)
    pub endpoint: String,

    /// Login username, `None` when the server runs with auth disabled
    pub username: Option<String>,

    /// Login password
    /// ⚠️ NEVER log this value
    pub password: Option<String>,

    /// Timeout for the initial connection and handshake
    pub connect_timeout: Duration,

    /// Timeout for each acknowledged call
    pub call_timeout: Duration,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<REDACTED>"))
            .field("connect_timeout", &self.connect_timeout)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a configuration for an endpoint without credentials
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: None,
            password: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Set login credentials
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Resolve settings against the process environment
    pub fn resolve(settings: &ProviderSettings) -> Result<Self, crate::Error> {
        Self::resolve_with(settings, |key| std::env::var(key).ok())
    }

    /// Resolve settings against an arbitrary environment lookup
    ///
    /// The lookup is injected so precedence can be exercised without
    /// touching the process environment.
    pub fn resolve_with<F>(settings: &ProviderSettings, env: F) -> Result<Self, crate::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: &Option<String>, key: &str| {
            non_empty(explicit.clone()).or_else(|| non_empty(env(key)))
        };

        let endpoint = pick(&settings.endpoint, ENV_ENDPOINT).ok_or_else(|| {
            crate::Error::config(format!(
                "endpoint is required: set it in the provider block or via {ENV_ENDPOINT}"
            ))
        })?;

        let config = Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            username: pick(&settings.username, ENV_USERNAME),
            password: pick(&settings.password, ENV_PASSWORD),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(crate::Error::config(format!(
                "endpoint must use the http or https scheme. Got: {}",
                self.endpoint
            )));
        }

        match (&self.username, &self.password) {
            (Some(_), None) => Err(crate::Error::config(format!(
                "password is required when username is set (provider block or {ENV_PASSWORD})"
            ))),
            (None, Some(_)) => Err(crate::Error::config(format!(
                "username is required when password is set (provider block or {ENV_USERNAME})"
            ))),
            _ => Ok(()),
        }
    }

    /// Whether a login call is needed after connecting
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
