//! Scoped runs that report their own outcome.
//!
//! A [`Scope`] records when a unit of work started. When the work ends it is
//! turned into exactly one [`RunReport`]: `success` with `duration_seconds`
//! in `Extra`, or `error` with `duration_seconds`, `error` and `error_type`.
//! A body that panics is reported as `error` with `error_type` `"panic"`,
//! then the panic resumes. The host is always the client's default host.

use crate::client::LogClient;
use crate::error::ClientError;
use crate::runs::RunReport;
use crate::types::{Extra, RunOutcome};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

/// An entered scope. Consumed when it produces its report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    started_at: DateTime<Utc>,
}

impl Scope {
    /// Enter a scope now. No request is sent.
    pub fn enter() -> Self {
        Self {
            started_at: Utc::now(),
        }
    }

    /// When the scope was entered.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Close the scope as successful.
    pub fn succeeded(self) -> RunReport {
        let finished_at = Utc::now();
        let extra = self.duration_extra(finished_at);
        RunReport::new(self.started_at, finished_at, RunOutcome::Success).with_extra(extra)
    }

    /// Close the scope as failed with `error`.
    ///
    /// `error_type` is the unqualified name of the error's type, looking
    /// through `Box`, `Arc` and `Rc`.
    pub fn failed<E: fmt::Display + ?Sized>(self, error: &E) -> RunReport {
        self.failure(error.to_string(), short_type_name::<E>())
    }

    /// Close the scope as failed by a panic. `error_type` is `"panic"`.
    pub fn panicked(self, payload: &(dyn Any + Send)) -> RunReport {
        self.failure(panic_message(payload), "panic")
    }

    fn failure(self, message: String, error_type: &str) -> RunReport {
        let finished_at = Utc::now();
        let mut extra = self.duration_extra(finished_at);
        extra.insert("error".to_string(), Value::String(message));
        extra.insert("error_type".to_string(), Value::String(error_type.to_string()));
        RunReport::new(self.started_at, finished_at, RunOutcome::Error).with_extra(extra)
    }

    fn duration_extra(&self, finished_at: DateTime<Utc>) -> Extra {
        let seconds = (finished_at - self.started_at)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        let mut extra = Extra::new();
        extra.insert("duration_seconds".to_string(), Value::from(seconds));
        extra
    }
}

/// `my_crate::jobs::JobError` -> `JobError`,
/// `Box<dyn std::error::Error + Send>` -> `Error`.
fn short_type_name<T: ?Sized>() -> &'static str {
    let mut name = std::any::type_name::<T>();
    loop {
        name = name.trim_start_matches('&').trim_start_matches("dyn ");
        name = name.split(" + ").next().unwrap_or(name);
        name = name.split(", ").next().unwrap_or(name);

        let Some((outer, inner)) = name.split_once('<') else {
            break;
        };
        let wrapper = outer.rsplit("::").next().unwrap_or(outer);
        if !matches!(wrapper, "Box" | "Arc" | "Rc") {
            name = outer;
            break;
        }
        name = inner.strip_suffix('>').unwrap_or(inner);
    }
    name.rsplit("::").next().unwrap_or(name)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

/// A failure report could not be sent; the scope's own failure wins.
pub(crate) fn log_unreported(report_error: &ClientError, scope_error: &dyn fmt::Display) {
    tracing::error!(
        error = %report_error,
        scope_error = %scope_error,
        "Failed to report scope failure"
    );
}

impl LogClient {
    /// Run `body` inside a scope and report its outcome.
    ///
    /// The report request is awaited before this returns. If `body` fails,
    /// its error is returned unchanged after the error report was attempted;
    /// a failure to send that report is only logged. If `body` succeeds and
    /// the success report fails with silent errors disabled, the transport
    /// error is converted into `E`. If `body` panics, an error report with
    /// `error_type` `"panic"` is sent and the panic then resumes.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use poradock_client::{ClientConfig, ClientError, LogClient};
    /// # async fn load() -> Result<usize, ClientError> { Ok(0) }
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = LogClient::new(ClientConfig::new("token"))?;
    /// let rows = client.scope(async { load().await }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scope<F, T, E>(&self, body: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: fmt::Display + From<ClientError>,
    {
        let scope = Scope::enter();

        match AssertUnwindSafe(body).catch_unwind().await {
            Ok(Ok(value)) => {
                self.submit(&scope.succeeded()).await?;
                Ok(value)
            }
            Ok(Err(error)) => {
                if let Err(report_error) = self.submit(&scope.failed(&error)).await {
                    log_unreported(&report_error, &error);
                }
                Err(error)
            }
            Err(payload) => {
                let report = scope.panicked(payload.as_ref());
                if let Err(report_error) = self.submit(&report).await {
                    log_unreported(&report_error, &"panic");
                }
                panic::resume_unwind(payload)
            }
        }
    }
}
