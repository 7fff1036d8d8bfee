//! Run completion reports.

use crate::client::{Endpoint, LogClient};
use crate::error::Result;
use crate::types::{ApiResponse, Extra, RunOutcome};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Report describing how a measured unit of work concluded.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// When the work started.
    pub period_start: DateTime<Utc>,
    /// When the work finished.
    pub period_end: DateTime<Utc>,
    /// Host that ran the work; `None` falls back to the client default.
    pub host: Option<String>,
    /// How the work concluded.
    pub outcome: RunOutcome,
    /// Additional key/value data, sent as a nested `Extra` object.
    pub extra: Extra,
}

impl RunReport {
    /// Create a report with no host and no extra data.
    pub fn new(
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        outcome: RunOutcome,
    ) -> Self {
        Self {
            period_start,
            period_end,
            host: None,
            outcome,
            extra: Extra::new(),
        }
    }

    /// Set the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the extra data.
    #[must_use]
    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extra = extra;
        self
    }

    pub(crate) fn body<'a>(&'a self, default_host: Option<&'a str>) -> RunReportBody<'a> {
        RunReportBody {
            period_from: iso8601(&self.period_start),
            period_to: iso8601(&self.period_end),
            host: self.host.as_deref().or(default_host),
            status: self.outcome,
            extra: &self.extra,
        }
    }
}

/// Wire shape of a run report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RunReportBody<'a> {
    period_from: String,
    period_to: String,
    host: Option<&'a str>,
    status: RunOutcome,
    extra: &'a Extra,
}

fn iso8601(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, false)
}

impl LogClient {
    /// Report the completion of a run.
    ///
    /// Issues exactly one POST to `api/v1/eff-runs`. `host` falls back to the
    /// client's default host; `extra` is sent unchanged as a nested object.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`](crate::ClientError::Transport) if
    /// the request fails and silent errors are disabled.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use poradock_client::{ClientConfig, Extra, LogClient, RunOutcome};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = LogClient::new(ClientConfig::new("token"))?;
    /// let started = chrono::Utc::now();
    /// // ... do the work ...
    /// let finished = chrono::Utc::now();
    ///
    /// let mut extra = Extra::new();
    /// extra.insert("rows".into(), 1200.into());
    ///
    /// client
    ///     .report(started, finished, RunOutcome::Success, Some("my-server"), extra)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn report(
        &self,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        outcome: RunOutcome,
        host: Option<&str>,
        extra: Extra,
    ) -> Result<Option<ApiResponse>> {
        let mut report = RunReport::new(period_start, period_end, outcome).with_extra(extra);
        report.host = host.map(str::to_string);
        self.submit(&report).await
    }

    /// Send a prepared run report.
    pub async fn submit(&self, report: &RunReport) -> Result<Option<ApiResponse>> {
        self.post(Endpoint::EffRuns, &report.body(self.default_host()))
            .await
    }

    /// Report a successful run.
    pub async fn finish_success(
        &self,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        host: Option<&str>,
        extra: Extra,
    ) -> Result<Option<ApiResponse>> {
        self.report(period_start, period_end, RunOutcome::Success, host, extra)
            .await
    }

    /// Report a run that finished with warnings.
    pub async fn finish_warning(
        &self,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        host: Option<&str>,
        extra: Extra,
    ) -> Result<Option<ApiResponse>> {
        self.report(period_start, period_end, RunOutcome::Warning, host, extra)
            .await
    }

    /// Report a failed run.
    pub async fn finish_error(
        &self,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        host: Option<&str>,
        extra: Extra,
    ) -> Result<Option<ApiResponse>> {
        self.report(period_start, period_end, RunOutcome::Error, host, extra)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn period() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 5, 0).unwrap(),
        )
    }

    #[test]
    fn test_report_body() {
        let (start, end) = period();
        let mut extra = Extra::new();
        extra.insert("rows".to_string(), json!(12));

        let report = RunReport::new(start, end, RunOutcome::Success)
            .with_host("my-server")
            .with_extra(extra);
        let body = serde_json::to_value(report.body(Some("ignored"))).unwrap();

        assert_eq!(
            body,
            json!({
                "PeriodFrom": "2024-01-15T10:00:00.000000+00:00",
                "PeriodTo": "2024-01-15T10:05:00.000000+00:00",
                "Host": "my-server",
                "Status": "success",
                "Extra": {"rows": 12}
            })
        );
    }

    #[test]
    fn test_report_body_uses_default_host() {
        let (start, end) = period();
        let report = RunReport::new(start, end, RunOutcome::Warning);
        let body = serde_json::to_value(report.body(Some("fallback"))).unwrap();
        assert_eq!(body["Host"], "fallback");
        assert_eq!(body["Extra"], json!({}));
    }

    #[test]
    fn test_report_body_without_any_host() {
        let (start, end) = period();
        let report = RunReport::new(start, end, RunOutcome::Error);
        let body = serde_json::to_value(report.body(None)).unwrap();
        assert!(body["Host"].is_null());
        assert_eq!(body["Status"], "error");
    }

    #[test]
    fn test_extra_stays_nested() {
        let (start, end) = period();
        let mut extra = Extra::new();
        extra.insert("Status".to_string(), json!("custom"));
        extra.insert("nested".to_string(), json!({"a": [1, 2, 3]}));

        let report = RunReport::new(start, end, RunOutcome::Success).with_extra(extra);
        let body = serde_json::to_value(report.body(None)).unwrap();

        assert_eq!(body["Status"], "success");
        assert_eq!(body["Extra"]["Status"], "custom");
        assert_eq!(body["Extra"]["nested"]["a"], json!([1, 2, 3]));
    }
}
