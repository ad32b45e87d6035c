//! COINS validator CLI main entry point

use anyhow::Result;
use clap::Parser;
use coins_cli::commands::{Cli, CommandExecutor};

fn main() -> Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let executor = CommandExecutor::from_options(&cli.options)?;
    let result = executor.execute(cli.command)?;

    if !result.message.is_empty() {
        println!("{}", result.message);
    }

    if result.success {
        std::process::exit(0);
    } else {
        std::process::exit(1);
    }
}
