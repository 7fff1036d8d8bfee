//! Client configuration.

use crate::error::{ClientError, Result};
use std::env;
use std::time::Duration;

/// Default base URL of the Poradock logging API.
pub const DEFAULT_BASE_URL: &str = "https://api.alexmayka.ru";

/// Default timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`LogClient`](crate::LogClient).
///
/// All fields are fixed once the client is built; the timeout and the
/// silent-error policy apply to every request the client issues.
///
/// # Example
///
/// ```
/// use poradock_client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("my-token")
///     .with_timeout(Duration::from_secs(5))
///     .with_silent_errors(false)
///     .with_auto_host(false);
///
/// assert_eq!(config.timeout(), Duration::from_secs(5));
/// assert!(!config.silent_errors());
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API server.
    base_url: String,
    /// Bearer token sent with every request.
    token: Option<String>,
    /// Request timeout.
    timeout: Duration,
    /// Swallow transport failures instead of returning them.
    silent_errors: bool,
    /// Resolve the local hostname as the default run-report host.
    auto_host: bool,
    /// Explicit default host; takes precedence over hostname lookup.
    host: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
            silent_errors: true,
            auto_host: true,
            host: None,
        }
    }
}

impl ClientConfig {
    /// Create a configuration with the given auth token and default settings.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORADOCK_TOKEN`: bearer token
    /// - `PORADOCK_BASE_URL`: API base URL
    /// - `PORADOCK_TIMEOUT_SECS`: request timeout in seconds (fractions allowed)
    /// - `PORADOCK_SILENT_ERRORS`: "true"/"1" or "false"/"0"
    /// - `PORADOCK_HOST`: explicit default host for run reports
    /// - `PORADOCK_AUTO_HOST`: "false"/"0" disables hostname lookup
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] if a variable is set to a value
    /// that cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(token) = env::var("PORADOCK_TOKEN") {
            config.token = Some(token);
        }
        if let Ok(base_url) = env::var("PORADOCK_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(raw) = env::var("PORADOCK_TIMEOUT_SECS") {
            config.timeout = parse_timeout(&raw)?;
        }
        if let Ok(raw) = env::var("PORADOCK_SILENT_ERRORS") {
            config.silent_errors = parse_flag("PORADOCK_SILENT_ERRORS", &raw)?;
        }
        if let Ok(raw) = env::var("PORADOCK_AUTO_HOST") {
            config.auto_host = parse_flag("PORADOCK_AUTO_HOST", &raw)?;
        }
        if let Ok(host) = env::var("PORADOCK_HOST") {
            config.host = Some(host);
        }

        Ok(config)
    }

    /// Set the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the timeout applied to every request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Choose whether transport failures are swallowed (logged, `Ok(None)`)
    /// or returned as [`ClientError::Transport`].
    #[must_use]
    pub fn with_silent_errors(mut self, silent: bool) -> Self {
        self.silent_errors = silent;
        self
    }

    /// Enable or disable resolving the local hostname as the default host.
    #[must_use]
    pub fn with_auto_host(mut self, enabled: bool) -> Self {
        self.auto_host = enabled;
        self
    }

    /// Set an explicit default host for run reports.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check whether transport failures are swallowed.
    pub fn silent_errors(&self) -> bool {
        self.silent_errors
    }

    /// Check whether hostname lookup is enabled.
    pub fn auto_host(&self) -> bool {
        self.auto_host
    }

    /// Get the explicit default host, if any.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Resolve the default host: explicit host first, then the local
    /// hostname when `auto_host` is on.
    pub(crate) fn resolve_host(&self) -> Option<String> {
        if let Some(ref host) = self.host {
            return Some(host.clone());
        }
        if !self.auto_host {
            return None;
        }

        match hostname::get() {
            Ok(name) => Some(name.to_string_lossy().into_owned()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to resolve local hostname, run reports will carry no host");
                None
            }
        }
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: f64 = raw.trim().parse().map_err(|_| {
        ClientError::InvalidConfig(format!("PORADOCK_TIMEOUT_SECS must be a number, got: {}", raw))
    })?;

    Duration::try_from_secs_f64(secs).map_err(|_| {
        ClientError::InvalidConfig(format!(
            "PORADOCK_TIMEOUT_SECS must be a non-negative finite number, got: {}",
            raw
        ))
    })
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ClientError::InvalidConfig(format!(
            "{} must be true or false, got: {}",
            name, raw
        ))),
    }
}
