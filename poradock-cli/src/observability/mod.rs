//! Logging setup for the CLI.
//!
//! The client library only emits `tracing` events; this module installs the
//! subscriber that prints them.
//!
//! # Configuration
//!
//! Logging format is controlled via `PORADOCK_LOG_FORMAT`:
//! - `json` - Structured JSON output
//! - `pretty` - Human-readable colored output (default for TTY)
//! - `compact` - Compact single-line format (default for non-TTY)
//!
//! The filter comes from `PORADOCK_LOG_LEVEL`, then `RUST_LOG`, then the
//! `-v` count given on the command line.

mod config;
mod tracing_setup;

pub use config::{LogFormat, TracingConfig};
pub use tracing_setup::{TracingGuard, init_tracing};
