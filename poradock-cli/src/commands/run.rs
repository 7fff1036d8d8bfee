//! Run command - execute a program and report how it ended.

use super::ConnectionArgs;
use anyhow::Result;
use poradock_client::ClientError;
use std::process::{ExitCode, ExitStatus};
use thiserror::Error;
use tokio::process::Command;

/// Ways a wrapped program can fail.
#[derive(Debug, Error)]
pub enum RunError {
    /// The program could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program exited unsuccessfully.
    #[error("{program} exited with {status}")]
    Exit { program: String, status: ExitStatus },

    /// The success report could not be delivered.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Run `program` inside a scope and report the outcome.
///
/// Returns the program's exit code so the CLI can pass it through.
pub async fn run(connection: &ConnectionArgs, program: &str, args: &[String]) -> Result<ExitCode> {
    let client = connection.connect()?;
    tracing::info!(program = %program, args = ?args, "Running program");

    let result = client
        .scope(async {
            let status = Command::new(program)
                .args(args)
                .status()
                .await
                .map_err(|source| RunError::Spawn {
                    program: program.to_string(),
                    source,
                })?;

            if status.success() {
                Ok(status)
            } else {
                Err(RunError::Exit {
                    program: program.to_string(),
                    status,
                })
            }
        })
        .await;
    client.close();

    match result {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(RunError::Exit { status, .. }) => {
            tracing::warn!(status = %status, "Program failed");
            Ok(exit_code(status))
        }
        Err(e) => Err(e.into()),
    }
}

fn exit_code(status: ExitStatus) -> ExitCode {
    status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .map(ExitCode::from)
        .unwrap_or(ExitCode::FAILURE)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn connection(base_url: String) -> ConnectionArgs {
        ConnectionArgs {
            token: Some("test-token".to_string()),
            base_url: Some(base_url),
            timeout: None,
            strict: true,
        }
    }

    #[tokio::test]
    async fn test_successful_program_reports_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/eff-runs"))
            .and(body_partial_json(json!({"Status": "success"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let code = run(&connection(mock_server.uri()), "true", &[]).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn test_failing_program_reports_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/eff-runs"))
            .and(body_partial_json(json!({
                "Status": "error",
                "Extra": {"error_type": "RunError"}
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let args = vec!["-c".to_string(), "exit 3".to_string()];
        let code = run(&connection(mock_server.uri()), "sh", &args).await.unwrap();
        assert_eq!(code, ExitCode::from(3));
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/eff-runs"))
            .and(body_partial_json(json!({"Status": "error"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = run(
            &connection(mock_server.uri()),
            "definitely-not-a-real-program",
            &[],
        )
        .await;
        assert!(result.unwrap_err().to_string().contains("failed to start"));
    }
}
