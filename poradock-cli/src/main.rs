//! Poradock CLI - send log records and run reports from the command line.

mod commands;
mod observability;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use commands::ConnectionArgs;
use observability::{TracingConfig, TracingGuard, init_tracing};
use poradock_client::{RunOutcome, Severity};
use serde_json::Value;
use std::process::ExitCode;

/// Poradock - client for the Poradock logging API.
#[derive(Parser)]
#[command(name = "poradock")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check connectivity: health probe plus one info and one debug record
    Check,

    /// Send a log record
    Log {
        /// Severity (info, debug, warning, error, critical)
        level: Severity,

        /// Message text
        message: String,
    },

    /// Report the completion of a run
    Finish {
        /// Outcome (success, warning, error)
        status: RunOutcome,

        /// Start of the run (RFC 3339)
        #[arg(long)]
        from: DateTime<Utc>,

        /// End of the run (RFC 3339, defaults to now)
        #[arg(long)]
        to: Option<DateTime<Utc>>,

        /// Host that ran the work (defaults to the local hostname)
        #[arg(long)]
        host: Option<String>,

        /// Extra KEY=VALUE data; VALUE is parsed as JSON when possible
        #[arg(short, long = "extra", value_parser = commands::finish::parse_extra)]
        extra: Vec<(String, Value)>,
    },

    /// Run a program and report its outcome
    Run {
        /// Program to execute
        program: String,

        /// Arguments passed to the program
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Show version information
    Version,
}

fn setup_logging(verbosity: u8) -> Result<TracingGuard> {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    init_tracing(TracingConfig::from_env(filter))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _tracing_guard = setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Check => commands::check::run(&cli.connection).await?,
        Commands::Log { level, message } => {
            commands::log::run(&cli.connection, level, &message).await?
        }
        Commands::Finish {
            status,
            from,
            to,
            host,
            extra,
        } => {
            let options = commands::finish::FinishOptions {
                outcome: status,
                from,
                to: to.unwrap_or_else(Utc::now),
                host: host.as_deref(),
                extra,
            };
            commands::finish::run(&cli.connection, options).await?
        }
        Commands::Run { program, args } => {
            return commands::run::run(&cli.connection, &program, &args).await;
        }
        Commands::Version => commands::version::run()?,
    }

    Ok(ExitCode::SUCCESS)
}
