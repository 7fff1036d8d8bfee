//! Check command - verify connectivity and credentials.

use super::{ConnectionArgs, report_response};
use anyhow::{Result, bail};

/// Run the check command.
///
/// Probes the health endpoint, then sends one `Info` and one `Debug` record.
/// Transport errors are always raised here, whatever `--strict` says.
pub async fn run(connection: &ConnectionArgs) -> Result<()> {
    let config = connection.config()?.with_silent_errors(false);
    let client = poradock_client::LogClient::new(config)?;

    println!("Poradock connection check");
    println!("=========================");
    println!("URL:   {}", client.config().base_url());
    println!("Token: {}", mask_token(client.config().token()));
    println!(
        "Host:  {}",
        client.default_host().unwrap_or("(not resolved)")
    );
    println!();

    println!("1. Health endpoint...");
    match client.health().await? {
        Some(response) => println!(
            "   status {} - {}",
            response.status(),
            response.text().trim()
        ),
        None => println!("   no response"),
    }
    println!();

    println!("2. Sending info record...");
    let info = report_response(
        "Info record",
        client.info("Test connection message from poradock check").await?,
    );
    println!();

    println!("3. Sending debug record...");
    let debug = report_response("Debug record", client.debug("Debug test message").await?);
    println!();

    client.close();

    if info && debug {
        println!("All checks passed");
        Ok(())
    } else {
        bail!("The API did not accept the test records")
    }
}

/// Show only the first ten and last four characters of a token.
fn mask_token(token: Option<&str>) -> String {
    match token {
        None => "(none)".to_string(),
        Some(token) if token.chars().count() > 14 => {
            let head: String = token.chars().take(10).collect();
            let tail: String = token
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("{}...{}", head, tail)
        }
        Some(token) => {
            let head: String = token.chars().take(10).collect();
            format!("{}...***", head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token(None), "(none)");
        assert_eq!(
            mask_token(Some("f95e9305-107e-4967-ad3f-c65c70e8930a")),
            "f95e9305-1...930a"
        );
        assert_eq!(mask_token(Some("short")), "short...***");
    }
}
