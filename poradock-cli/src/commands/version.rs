//! Version command - show version information.

use anyhow::Result;
use poradock_client::DEFAULT_BASE_URL;

/// Version information.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the version command.
pub fn run() -> Result<()> {
    println!("Poradock - logging API client");
    println!();
    println!("Version:     {}", VERSION);
    println!(
        "Platform:    {} / {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    println!("Default API: {}", DEFAULT_BASE_URL);
    println!();
    println!("Components:");
    println!("  poradock-client  Async and blocking API client");
    println!("  poradock-cli     Command-line interface");

    Ok(())
}
