//! Blocking execution mode.
//!
//! [`Blocking`] mirrors the async API of [`LogClient`] with calls that do not
//! return until the response (or failure) is available. It shares the
//! client's configuration; the underlying `reqwest::blocking::Client` pool is
//! created on first use and is safe to use from several threads.

use crate::client::{Endpoint, LogClient};
use crate::error::{ClientError, Result};
use crate::logs::LogRecord;
use crate::runs::RunReport;
use crate::scope::{Scope, log_unreported};
use crate::types::{ApiResponse, Extra, RunOutcome, Severity};
use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Blocking view of a [`LogClient`].
///
/// Must not be used from inside an async runtime.
///
/// # Example
///
/// ```no_run
/// use poradock_client::{ClientConfig, LogClient};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = LogClient::new(ClientConfig::new("my-token"))?;
/// let logger = client.blocking();
///
/// logger.info("Application started")?;
/// let processed = logger.scope(|| -> Result<usize, Box<dyn std::error::Error>> {
///     logger.debug("Processing data...")?;
///     Ok(42)
/// })?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Blocking<'a> {
    client: &'a LogClient,
}

impl LogClient {
    /// Get the blocking view of this client.
    pub fn blocking(&self) -> Blocking<'_> {
        Blocking { client: self }
    }
}

impl<'a> Blocking<'a> {
    /// The client this view belongs to.
    pub fn client(&self) -> &'a LogClient {
        self.client
    }

    /// Send a log record with the given severity. See [`LogClient::log`].
    pub fn log(&self, severity: Severity, message: impl Into<String>) -> Result<Option<ApiResponse>> {
        self.send_record(&LogRecord::new(severity, message))
    }

    /// Send a prepared log record.
    pub fn send_record(&self, record: &LogRecord) -> Result<Option<ApiResponse>> {
        self.client.post_blocking(Endpoint::Logs, &record.body())
    }

    /// Send an `Info` record.
    pub fn info(&self, message: impl Into<String>) -> Result<Option<ApiResponse>> {
        self.log(Severity::Info, message)
    }

    /// Send a `Debug` record.
    pub fn debug(&self, message: impl Into<String>) -> Result<Option<ApiResponse>> {
        self.log(Severity::Debug, message)
    }

    /// Send a `Warning` record.
    pub fn warning(&self, message: impl Into<String>) -> Result<Option<ApiResponse>> {
        self.log(Severity::Warning, message)
    }

    /// Send an `Error` record.
    pub fn error(&self, message: impl Into<String>) -> Result<Option<ApiResponse>> {
        self.log(Severity::Error, message)
    }

    /// Send a `Critical` record.
    pub fn critical(&self, message: impl Into<String>) -> Result<Option<ApiResponse>> {
        self.log(Severity::Critical, message)
    }

    /// Report the completion of a run. See [`LogClient::report`].
    pub fn report(
        &self,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        outcome: RunOutcome,
        host: Option<&str>,
        extra: Extra,
    ) -> Result<Option<ApiResponse>> {
        let mut report = RunReport::new(period_start, period_end, outcome).with_extra(extra);
        report.host = host.map(str::to_string);
        self.submit(&report)
    }

    /// Send a prepared run report.
    pub fn submit(&self, report: &RunReport) -> Result<Option<ApiResponse>> {
        self.client
            .post_blocking(Endpoint::EffRuns, &report.body(self.client.default_host()))
    }

    /// Report a successful run.
    pub fn finish_success(
        &self,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        host: Option<&str>,
        extra: Extra,
    ) -> Result<Option<ApiResponse>> {
        self.report(period_start, period_end, RunOutcome::Success, host, extra)
    }

    /// Report a run that finished with warnings.
    pub fn finish_warning(
        &self,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        host: Option<&str>,
        extra: Extra,
    ) -> Result<Option<ApiResponse>> {
        self.report(period_start, period_end, RunOutcome::Warning, host, extra)
    }

    /// Report a failed run.
    pub fn finish_error(
        &self,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        host: Option<&str>,
        extra: Extra,
    ) -> Result<Option<ApiResponse>> {
        self.report(period_start, period_end, RunOutcome::Error, host, extra)
    }

    /// Probe the service health endpoint. See [`LogClient::health`].
    pub fn health(&self) -> Result<Option<ApiResponse>> {
        self.client.get_blocking(Endpoint::Health)
    }

    /// Run `body` inside a scope and report its outcome.
    ///
    /// Same contract as [`LogClient::scope`]: the body's error is always
    /// returned unchanged, and a panic is reported before it resumes.
    pub fn scope<F, T, E>(&self, body: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: fmt::Display + From<ClientError>,
    {
        let scope = Scope::enter();

        match panic::catch_unwind(AssertUnwindSafe(body)) {
            Ok(Ok(value)) => {
                self.submit(&scope.succeeded())?;
                Ok(value)
            }
            Ok(Err(error)) => {
                if let Err(report_error) = self.submit(&scope.failed(&error)) {
                    log_unreported(&report_error, &error);
                }
                Err(error)
            }
            Err(payload) => {
                if let Err(report_error) = self.submit(&scope.panicked(payload.as_ref())) {
                    log_unreported(&report_error, &"panic");
                }
                panic::resume_unwind(payload)
            }
        }
    }
}
