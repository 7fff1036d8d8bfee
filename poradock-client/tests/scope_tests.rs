//! Scoped run reporting against a mock server, in both execution modes.

use poradock_client::{ClientConfig, ClientError, LogClient};
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Error)]
enum JobError {
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Client(#[from] ClientError),
}

fn config(base_url: &str) -> ClientConfig {
    ClientConfig::new("test-token")
        .with_base_url(base_url)
        .with_host("scope-host")
        .with_silent_errors(false)
}

async fn mount_runs(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/api/v1/eff-runs"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

async fn run_reports(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == "/api/v1/eff-runs")
        .map(|request| request.body_json::<Value>().unwrap())
        .collect()
}

#[tokio::test]
async fn test_scope_success_reports_once() {
    let mock_server = MockServer::start().await;
    mount_runs(&mock_server, 201).await;

    let client = LogClient::new(config(&mock_server.uri())).unwrap();
    let started = Instant::now();
    let value = client
        .scope(async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, JobError>("done")
        })
        .await
        .unwrap();
    let elapsed = started.elapsed().as_secs_f64();

    assert_eq!(value, "done");

    let reports = run_reports(&mock_server).await;
    assert_eq!(reports.len(), 1);

    let report = &reports[0];
    assert_eq!(report["Status"], "success");
    assert_eq!(report["Host"], "scope-host");

    let extra = report["Extra"].as_object().unwrap();
    assert_eq!(extra.len(), 1);
    let duration = extra["duration_seconds"].as_f64().unwrap();
    assert!(
        (duration - elapsed).abs() < 0.05,
        "reported {} vs elapsed {}",
        duration,
        elapsed
    );
}

#[tokio::test]
async fn test_scope_error_reports_and_propagates() {
    let mock_server = MockServer::start().await;
    mount_runs(&mock_server, 201).await;

    let client = LogClient::new(config(&mock_server.uri())).unwrap();
    let result: Result<(), JobError> = client
        .scope(async { Err(JobError::Failed("boom".to_string())) })
        .await;

    match result {
        Err(JobError::Failed(msg)) => assert_eq!(msg, "boom"),
        other => panic!("Expected the body error, got {:?}", other),
    }

    let reports = run_reports(&mock_server).await;
    assert_eq!(reports.len(), 1);

    let report = &reports[0];
    assert_eq!(report["Status"], "error");
    assert_eq!(report["Host"], "scope-host");
    assert_eq!(report["Extra"]["error"], "boom");
    assert_eq!(report["Extra"]["error_type"], "JobError");
    assert!(report["Extra"]["duration_seconds"].is_f64());
}

#[tokio::test]
async fn test_scope_ignores_rejected_report() {
    let mock_server = MockServer::start().await;
    mount_runs(&mock_server, 500).await;

    // A non-2xx answer is not a transport failure, so the body's value comes back.
    let client = LogClient::new(config(&mock_server.uri())).unwrap();
    let value = client.scope(async { Ok::<_, JobError>(3) }).await.unwrap();
    assert_eq!(value, 3);
}

#[tokio::test]
async fn test_scope_success_with_unreachable_server() {
    let client = LogClient::new(config("http://127.0.0.1:1")).unwrap();
    let result = client.scope(async { Ok::<_, JobError>(()) }).await;
    assert!(matches!(result, Err(JobError::Client(ClientError::Transport(_)))));

    let silent = LogClient::new(config("http://127.0.0.1:1").with_silent_errors(true)).unwrap();
    assert!(silent.scope(async { Ok::<_, JobError>(()) }).await.is_ok());
}

#[tokio::test]
async fn test_scope_error_wins_over_report_failure() {
    let client = LogClient::new(config("http://127.0.0.1:1")).unwrap();
    let result: Result<(), JobError> = client
        .scope(async { Err(JobError::Failed("boom".to_string())) })
        .await;

    match result {
        Err(JobError::Failed(msg)) => assert_eq!(msg, "boom"),
        other => panic!("Expected the body error, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_scope_success() {
    let mock_server = MockServer::start().await;
    mount_runs(&mock_server, 201).await;

    let uri = mock_server.uri();
    let value = tokio::task::spawn_blocking(move || {
        let client = LogClient::new(config(&uri)).unwrap();
        client.blocking().scope(|| {
            std::thread::sleep(Duration::from_millis(50));
            Ok::<_, JobError>(42)
        })
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(value, 42);

    let reports = run_reports(&mock_server).await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["Status"], "success");

    let duration = reports[0]["Extra"]["duration_seconds"].as_f64().unwrap();
    assert!(duration >= 0.045, "duration {}", duration);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_scope_error() {
    let mock_server = MockServer::start().await;
    mount_runs(&mock_server, 201).await;

    let uri = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let client = LogClient::new(config(&uri)).unwrap();
        client
            .blocking()
            .scope(|| -> Result<(), JobError> { Err(JobError::Failed("boom".to_string())) })
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(JobError::Failed(ref msg)) if msg == "boom"));

    let reports = run_reports(&mock_server).await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["Status"], "error");
    assert_eq!(reports[0]["Extra"]["error"], "boom");
}

fn explode() -> Result<(), ClientError> {
    panic!("boom")
}

#[tokio::test]
async fn test_scope_panic_reports_once_and_resumes() {
    let mock_server = MockServer::start().await;
    mount_runs(&mock_server, 201).await;

    let client = LogClient::new(config(&mock_server.uri())).unwrap();
    let outcome = tokio::spawn(async move { client.scope(async { explode() }).await }).await;

    let join_error = outcome.unwrap_err();
    assert!(join_error.is_panic());
    let payload = join_error.into_panic();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"boom"));

    let reports = run_reports(&mock_server).await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["Status"], "error");
    assert_eq!(reports[0]["Extra"]["error"], "boom");
    assert_eq!(reports[0]["Extra"]["error_type"], "panic");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_scope_panic_reports_once_and_resumes() {
    let mock_server = MockServer::start().await;
    mount_runs(&mock_server, 201).await;

    let uri = mock_server.uri();
    let outcome = tokio::task::spawn_blocking(move || {
        let client = LogClient::new(config(&uri)).unwrap();
        client.blocking().scope(explode)
    })
    .await;

    assert!(outcome.unwrap_err().is_panic());

    let reports = run_reports(&mock_server).await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["Status"], "error");
    assert_eq!(reports[0]["Extra"]["error"], "boom");
    assert_eq!(reports[0]["Extra"]["error_type"], "panic");
}

#[tokio::test]
async fn test_scope_boxed_error_type_names_the_cause() {
    let mock_server = MockServer::start().await;
    mount_runs(&mock_server, 201).await;

    let client = LogClient::new(config(&mock_server.uri())).unwrap();
    let result: Result<(), Box<dyn std::error::Error + Send + Sync>> = client
        .scope(async { Err("boom".into()) })
        .await;
    assert!(result.is_err());

    let reports = run_reports(&mock_server).await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["Extra"]["error_type"], "Error");
}
