//! Type definitions for the Poradock client.
//!
//! Wire labels for [`Severity`] and [`RunOutcome`] come from explicit tables
//! rather than variant names, so renaming a variant never changes what is
//! sent to the server.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Free-form key/value data attached to a run report under `Extra`.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Informational message.
    Info,
    /// Debugging detail.
    Debug,
    /// Something unexpected but recoverable.
    Warning,
    /// Severe failure.
    Critical,
    /// Operation failed.
    Error,
}

impl Severity {
    /// All severities, in declaration order.
    pub const ALL: [Severity; 5] = [
        Severity::Info,
        Severity::Debug,
        Severity::Warning,
        Severity::Critical,
        Severity::Error,
    ];

    /// The label sent as `Status` on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Debug => "Debug",
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
            Severity::Error => "Error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "debug" => Ok(Severity::Debug),
            "warning" | "warn" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            "error" => Ok(Severity::Error),
            _ => Err(ParseLabelError::new("severity", s)),
        }
    }
}

/// Terminal state of a measured unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    /// The run completed successfully.
    Success,
    /// The run completed with warnings.
    Warning,
    /// The run failed.
    Error,
}

impl RunOutcome {
    /// All outcomes, in declaration order.
    pub const ALL: [RunOutcome; 3] = [RunOutcome::Success, RunOutcome::Warning, RunOutcome::Error];

    /// The label sent as `Status` on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            RunOutcome::Success => "success",
            RunOutcome::Warning => "warning",
            RunOutcome::Error => "error",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RunOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for RunOutcome {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(RunOutcome::Success),
            "warning" => Ok(RunOutcome::Warning),
            "error" => Ok(RunOutcome::Error),
            _ => Err(ParseLabelError::new("run outcome", s)),
        }
    }
}

/// Error returned when parsing a [`Severity`] or [`RunOutcome`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
}

impl ParseLabelError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Response returned by the API.
///
/// Any HTTP status is returned as-is; the API signals an accepted record
/// with `201 Created`, which [`ApiResponse::is_created`] checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    body: String,
}

impl ApiResponse {
    /// Create a response from a status code and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub(crate) async fn from_async(response: reqwest::Response) -> reqwest::Result<Self> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(Self { status, body })
    }

    pub(crate) fn from_blocking(response: reqwest::blocking::Response) -> reqwest::Result<Self> {
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(Self { status, body })
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Raw response body.
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Whether the server accepted the record (`201 Created`).
    pub fn is_created(&self) -> bool {
        self.status == 201
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Deserialize`](crate::ClientError::Deserialize)
    /// if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}
