//! Core Poradock client implementation.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::ApiResponse;
use parking_lot::Mutex;
use reqwest::Client as HttpClient;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;

/// API endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    /// Leveled log records.
    Logs,
    /// Run completion reports.
    EffRuns,
    /// Service health probe (outside the versioned API group).
    Health,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Logs => "api/v1/logs",
            Endpoint::EffRuns => "api/v1/eff-runs",
            Endpoint::Health => "health",
        }
    }
}

/// Lifecycle of the connection pool used by async calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No pool has been created yet.
    Absent,
    /// A pool is open and reused across calls.
    Open,
    /// The pool was released with [`LogClient::close`]; the next async call
    /// opens a fresh one.
    Closed,
}

#[derive(Debug)]
enum Session {
    Absent,
    Open(HttpClient),
    Closed,
}

/// A client for the Poradock logging API.
///
/// Every operation exists in two execution modes sharing the same request
/// building and error policy: async methods on `LogClient` itself, and
/// blocking methods on the view returned by [`LogClient::blocking`].
///
/// Share a client across tasks or threads behind an `Arc`. Do not drop a
/// client that has made blocking calls from inside an async runtime.
///
/// # Example
///
/// ```no_run
/// use poradock_client::{ClientConfig, LogClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = LogClient::new(ClientConfig::new("my-token"))?;
///
/// if let Some(response) = client.info("Application started").await? {
///     println!("status: {}", response.status());
/// }
///
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LogClient {
    /// Immutable configuration.
    config: ClientConfig,
    /// Headers attached to every request.
    headers: HeaderMap,
    /// Host reported when a call does not name one.
    default_host: Option<String>,
    /// Lazily created pool for async calls.
    session: Mutex<Session>,
    /// Lazily created pool for blocking calls.
    blocking: Mutex<Option<reqwest::blocking::Client>>,
}

impl LogClient {
    /// Create a new client.
    ///
    /// A missing token is not an error: requests are sent unauthenticated
    /// and the server rejects them. The local hostname is resolved here, once,
    /// unless an explicit host is configured or `auto_host` is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL has no `http://`/`https://` scheme or
    /// the token cannot be encoded as a header value.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let headers = build_headers(config.token())?;
        let default_host = config.resolve_host();

        Ok(Self {
            config,
            headers,
            default_host,
            session: Mutex::new(Session::Absent),
            blocking: Mutex::new(None),
        })
    }

    /// Create a client from `PORADOCK_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment holds an invalid value or the
    /// resulting configuration is rejected by [`LogClient::new`].
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Host used for run reports that do not name one.
    pub fn default_host(&self) -> Option<&str> {
        self.default_host.as_deref()
    }

    /// Current state of the async connection pool.
    pub fn session_state(&self) -> SessionState {
        match *self.session.lock() {
            Session::Absent => SessionState::Absent,
            Session::Open(_) => SessionState::Open,
            Session::Closed => SessionState::Closed,
        }
    }

    /// Release the async connection pool.
    ///
    /// Requests already in flight keep their connections until they finish.
    /// Calling `close` again is a no-op, and a later async call opens a new
    /// pool.
    pub fn close(&self) {
        let mut session = self.session.lock();
        if matches!(*session, Session::Open(_)) {
            tracing::debug!("Closing async session");
            *session = Session::Closed;
        }
    }

    /// Build a full URL for an endpoint.
    pub(crate) fn url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}/{}",
            self.config.base_url().trim_end_matches('/'),
            endpoint.path()
        )
    }

    /// Get the async pool, opening one if none is open.
    fn session(&self) -> reqwest::Result<HttpClient> {
        let mut session = self.session.lock();
        if let Session::Open(ref http) = *session {
            return Ok(http.clone());
        }

        let http = HttpClient::builder()
            .default_headers(self.headers.clone())
            .timeout(self.config.timeout())
            .build()?;
        tracing::debug!(reopened = matches!(*session, Session::Closed), "Opened async session");
        *session = Session::Open(http.clone());
        Ok(http)
    }

    /// Get the blocking pool, creating it on first use.
    pub(crate) fn blocking_session(&self) -> reqwest::Result<reqwest::blocking::Client> {
        let mut slot = self.blocking.lock();
        if let Some(ref http) = *slot {
            return Ok(http.clone());
        }

        let http = reqwest::blocking::Client::builder()
            .default_headers(self.headers.clone())
            .timeout(self.config.timeout())
            .build()?;
        *slot = Some(http.clone());
        Ok(http)
    }

    /// Execute a POST request with a JSON body.
    pub(crate) async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        body: &T,
    ) -> Result<Option<ApiResponse>> {
        let url = self.url(endpoint);
        let outcome = async {
            let request = self.session()?.post(&url).json(body);
            ApiResponse::from_async(request.send().await?).await
        }
        .await;

        self.settle(&url, outcome)
    }

    /// Execute a GET request.
    pub(crate) async fn get(&self, endpoint: Endpoint) -> Result<Option<ApiResponse>> {
        let url = self.url(endpoint);
        let outcome = async {
            let request = self.session()?.get(&url);
            ApiResponse::from_async(request.send().await?).await
        }
        .await;

        self.settle(&url, outcome)
    }

    /// Execute a blocking POST request with a JSON body.
    pub(crate) fn post_blocking<T: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        body: &T,
    ) -> Result<Option<ApiResponse>> {
        let url = self.url(endpoint);
        let outcome = self
            .blocking_session()
            .and_then(|http| http.post(&url).json(body).send())
            .and_then(ApiResponse::from_blocking);

        self.settle(&url, outcome)
    }

    /// Execute a blocking GET request.
    pub(crate) fn get_blocking(&self, endpoint: Endpoint) -> Result<Option<ApiResponse>> {
        let url = self.url(endpoint);
        let outcome = self
            .blocking_session()
            .and_then(|http| http.get(&url).send())
            .and_then(ApiResponse::from_blocking);

        self.settle(&url, outcome)
    }

    /// Apply the silent-error policy to a finished request.
    fn settle(
        &self,
        url: &str,
        outcome: reqwest::Result<ApiResponse>,
    ) -> Result<Option<ApiResponse>> {
        match outcome {
            Ok(response) => {
                tracing::debug!(url = %url, status = response.status(), "Request completed");
                Ok(Some(response))
            }
            Err(e) if self.config.silent_errors() => {
                tracing::warn!(url = %url, error = %e, "Request failed, error suppressed");
                Ok(None)
            }
            Err(e) => Err(ClientError::Transport(e)),
        }
    }
}

/// Headers shared by every request.
fn build_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ClientError::InvalidToken(e.to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}
