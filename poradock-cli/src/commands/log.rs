//! Log command - send a single log record.

use super::{ConnectionArgs, report_response};
use anyhow::{Result, bail};
use poradock_client::Severity;

/// Run the log command.
pub async fn run(connection: &ConnectionArgs, severity: Severity, message: &str) -> Result<()> {
    let client = connection.connect()?;
    tracing::info!(severity = %severity, "Sending log record");

    let response = client.log(severity, message).await?;
    client.close();

    if report_response(&format!("{} record", severity), response) {
        Ok(())
    } else {
        bail!("Log record was not stored")
    }
}
