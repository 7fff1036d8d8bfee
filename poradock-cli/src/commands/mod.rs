//! CLI command implementations.

pub mod check;
pub mod finish;
pub mod log;
pub mod run;
pub mod version;

use anyhow::{Context, Result};
use clap::Args;
use poradock_client::{ClientConfig, LogClient};
use std::time::Duration;

/// Connection options shared by every command that talks to the API.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// API token (Bearer)
    #[arg(long, env = "PORADOCK_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<f64>,

    /// Fail on transport errors instead of ignoring them
    #[arg(long, global = true)]
    pub strict: bool,
}

impl ConnectionArgs {
    /// Build the client configuration: environment first, flags on top.
    pub fn config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::from_env().context("Invalid PORADOCK_* environment")?;

        if let Some(ref token) = self.token {
            config = config.with_token(token);
        }
        if let Some(ref base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(secs) = self.timeout {
            let timeout = Duration::try_from_secs_f64(secs)
                .with_context(|| format!("Invalid timeout: {}", secs))?;
            config = config.with_timeout(timeout);
        }
        if self.strict {
            config = config.with_silent_errors(false);
        }

        Ok(config)
    }

    /// Create a client from these options.
    pub fn connect(&self) -> Result<LogClient> {
        LogClient::new(self.config()?).context("Failed to create client")
    }
}

/// Print the outcome of a single call.
pub(crate) fn report_response(
    label: &str,
    response: Option<poradock_client::ApiResponse>,
) -> bool {
    match response {
        Some(response) if response.is_created() => {
            println!("✓ {} accepted (status {})", label, response.status());
            true
        }
        Some(response) => {
            println!("✗ {} rejected (status {})", label, response.status());
            if !response.text().is_empty() {
                println!("  Response: {}", response.text());
            }
            false
        }
        None => {
            println!("✗ {} not delivered (transport error suppressed)", label);
            false
        }
    }
}
