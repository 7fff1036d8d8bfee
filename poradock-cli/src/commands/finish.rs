//! Finish command - report the completion of a run.

use super::{ConnectionArgs, report_response};
use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use poradock_client::{Extra, RunOutcome};
use serde_json::Value;

/// Options for reporting a run.
#[derive(Debug)]
pub struct FinishOptions<'a> {
    /// How the run concluded.
    pub outcome: RunOutcome,
    /// When the run started.
    pub from: DateTime<Utc>,
    /// When the run finished.
    pub to: DateTime<Utc>,
    /// Host that ran the work.
    pub host: Option<&'a str>,
    /// Extra key/value pairs.
    pub extra: Vec<(String, Value)>,
}

/// Run the finish command.
pub async fn run(connection: &ConnectionArgs, options: FinishOptions<'_>) -> Result<()> {
    if options.to < options.from {
        bail!("--to ({}) is earlier than --from ({})", options.to, options.from);
    }

    let client = connection.connect()?;
    let extra: Extra = options.extra.into_iter().collect();
    tracing::info!(outcome = %options.outcome, fields = extra.len(), "Sending run report");

    let response = client
        .report(options.from, options.to, options.outcome, options.host, extra)
        .await?;
    client.close();

    if report_response(&format!("{} run report", options.outcome), response) {
        Ok(())
    } else {
        bail!("Run report was not stored")
    }
}

/// Parse a `KEY=VALUE` pair; the value is read as JSON when it parses,
/// otherwise kept as a string.
pub fn parse_extra(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got: {}", raw))?;

    if key.is_empty() {
        return Err(format!("empty key in: {}", raw));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
