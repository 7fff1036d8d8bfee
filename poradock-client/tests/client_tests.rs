//! Integration tests for poradock-client.
//!
//! These tests verify the client API surface without requiring a running server.

use poradock_client::{
    ClientConfig, ClientError, DEFAULT_BASE_URL, LogClient, RunOutcome, SessionState, Severity,
};
use std::time::Duration;

#[test]
fn test_client_construction() {
    let client = LogClient::new(ClientConfig::new("token").with_auto_host(false));
    assert!(client.is_ok());

    let client = LogClient::new(
        ClientConfig::new("token")
            .with_base_url("http://localhost:8080")
            .with_auto_host(false),
    );
    assert!(client.is_ok());
}

#[test]
fn test_client_construction_without_token() {
    // Missing token must not fail construction; the server rejects the calls.
    let client = LogClient::new(ClientConfig::default().with_auto_host(false)).unwrap();
    assert!(client.config().token().is_none());
    assert_eq!(client.config().base_url(), DEFAULT_BASE_URL);
}

#[test]
fn test_client_invalid_url() {
    let result = LogClient::new(ClientConfig::new("token").with_base_url("localhost:8080"));

    match result {
        Err(ClientError::InvalidUrl(msg)) => {
            assert!(msg.contains("http://"));
        }
        _ => panic!("Expected InvalidUrl error"),
    }
}

#[test]
fn test_client_builder_pattern() {
    let config = ClientConfig::new("my-secret-key")
        .with_base_url("https://api.example.com")
        .with_timeout(Duration::from_secs(60))
        .with_silent_errors(false)
        .with_host("batch-runner");

    let client = LogClient::new(config).unwrap();
    assert_eq!(client.config().timeout(), Duration::from_secs(60));
    assert!(!client.config().silent_errors());
    assert_eq!(client.default_host(), Some("batch-runner"));
}

#[test]
fn test_auto_host_resolves_local_hostname() {
    let client = LogClient::new(ClientConfig::new("token")).unwrap();
    assert!(client.default_host().is_some_and(|host| !host.is_empty()));
}

#[test]
fn test_auto_host_disabled() {
    let client = LogClient::new(ClientConfig::new("token").with_auto_host(false)).unwrap();
    assert!(client.default_host().is_none());
}

#[test]
fn test_new_client_has_no_session() {
    let client = LogClient::new(ClientConfig::new("token").with_auto_host(false)).unwrap();
    assert_eq!(client.session_state(), SessionState::Absent);

    // Closing a client that never opened a pool is harmless.
    client.close();
    assert_eq!(client.session_state(), SessionState::Absent);
}

#[test]
fn test_labels_display() {
    assert_eq!(Severity::Critical.to_string(), "Critical");
    assert_eq!(RunOutcome::Success.to_string(), "success");
}

#[test]
fn test_error_display() {
    let error = ClientError::InvalidUrl("test error".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Invalid URL"));
    assert!(display.contains("test error"));
    assert!(!error.is_transport());
}

#[test]
fn test_config_error_display() {
    let error = ClientError::InvalidConfig("PORADOCK_TIMEOUT_SECS must be a number".to_string());
    assert!(error.to_string().contains("Invalid configuration"));
}
