//! Leveled log records.

use crate::client::{Endpoint, LogClient};
use crate::error::Result;
use crate::types::{ApiResponse, Severity};
use serde::Serialize;

/// A single log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Message text. Any text is accepted, including an empty string.
    pub message: String,
    /// Record severity.
    pub severity: Severity,
}

impl LogRecord {
    /// Create a record.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub(crate) fn body(&self) -> LogRecordBody<'_> {
        LogRecordBody {
            msg: &self.message,
            status: self.severity,
        }
    }
}

/// Wire shape of a log record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LogRecordBody<'a> {
    msg: &'a str,
    status: Severity,
}

impl LogClient {
    /// Send a log record with the given severity.
    ///
    /// Issues exactly one POST to `api/v1/logs`.
    ///
    /// # Returns
    ///
    /// The server response whatever its status (the API answers `201` when
    /// the record is stored), or `None` if the request failed and the client
    /// swallows transport errors.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`](crate::ClientError::Transport) if
    /// the request fails and silent errors are disabled.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use poradock_client::{ClientConfig, LogClient, Severity};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = LogClient::new(ClientConfig::new("token"))?;
    /// let response = client.log(Severity::Warning, "Some data is missing").await?;
    /// if let Some(response) = response {
    ///     assert!(response.is_created());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn log(
        &self,
        severity: Severity,
        message: impl Into<String>,
    ) -> Result<Option<ApiResponse>> {
        self.send_record(&LogRecord::new(severity, message)).await
    }

    /// Send a prepared log record.
    pub async fn send_record(&self, record: &LogRecord) -> Result<Option<ApiResponse>> {
        self.post(Endpoint::Logs, &record.body()).await
    }

    /// Send an `Info` record.
    pub async fn info(&self, message: impl Into<String>) -> Result<Option<ApiResponse>> {
        self.log(Severity::Info, message).await
    }

    /// Send a `Debug` record.
    pub async fn debug(&self, message: impl Into<String>) -> Result<Option<ApiResponse>> {
        self.log(Severity::Debug, message).await
    }

    /// Send a `Warning` record.
    pub async fn warning(&self, message: impl Into<String>) -> Result<Option<ApiResponse>> {
        self.log(Severity::Warning, message).await
    }

    /// Send an `Error` record.
    pub async fn error(&self, message: impl Into<String>) -> Result<Option<ApiResponse>> {
        self.log(Severity::Error, message).await
    }

    /// Send a `Critical` record.
    pub async fn critical(&self, message: impl Into<String>) -> Result<Option<ApiResponse>> {
        self.log(Severity::Critical, message).await
    }
}
