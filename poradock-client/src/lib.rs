//! Rust client for the Poradock logging API.
//!
//! Sends leveled log records and run completion reports to the Poradock
//! service as JSON, in async or blocking mode, and can wrap a unit of work
//! in a scope that reports its own success or failure.
//!
//! # Features
//!
//! - Leveled log records (`Info`, `Debug`, `Warning`, `Error`, `Critical`)
//! - Run completion reports with free-form `Extra` data
//! - Async calls on [`LogClient`], blocking calls via [`LogClient::blocking`]
//! - Scoped runs that report `success`/`error` with their duration
//! - Configurable timeout and silent-error policy, Bearer token auth
//!
//! # Example
//!
//! ```no_run
//! use poradock_client::{ClientConfig, Extra, LogClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = LogClient::new(ClientConfig::new("my-token").with_silent_errors(false))?;
//!
//! client.info("Application started").await?;
//!
//! let started = chrono::Utc::now();
//! client.warning("Some data is missing").await?;
//! client
//!     .finish_success(started, chrono::Utc::now(), Some("my-server"), Extra::new())
//!     .await?;
//!
//! client.close();
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Calls return `Result<Option<ApiResponse>, ClientError>`. Non-2xx answers
//! are ordinary responses; the API acknowledges a record with `201`:
//!
//! ```no_run
//! # use poradock_client::{ClientConfig, ClientError, LogClient};
//! # async fn example() -> Result<(), ClientError> {
//! # let client = LogClient::new(ClientConfig::new("token"))?;
//! match client.info("hello").await {
//!     Ok(Some(response)) if response.is_created() => println!("stored"),
//!     Ok(Some(response)) => println!("rejected: {}", response.status()),
//!     Ok(None) => println!("request failed, error suppressed"),
//!     Err(e) => println!("Error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod blocking;
mod client;
mod config;
mod error;
mod health;
mod logs;
mod runs;
mod scope;
mod types;

pub use blocking::Blocking;
pub use client::{LogClient, SessionState};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{ClientError, Result};
pub use logs::LogRecord;
pub use runs::RunReport;
pub use scope::Scope;
pub use types::{ApiResponse, Extra, ParseLabelError, RunOutcome, Severity};
