//! faultgate CLI - Command-line interface for the error-reporting gateway
//!
//! Provides commands for:
//! - Sending test messages and exceptions through the gateway
//! - Showing the context attached to reports
//! - Viewing and editing configuration, including the reporting opt-in

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use faultgate_core::config::{Config, LoggingConfig};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{capture::CaptureCommand, config::ConfigCommand, context::ContextCommand};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "faultgate", version, about = "Opt-in, sampled error reporting")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Send an event through the gateway
    #[command(subcommand)]
    Capture(CaptureCommand),
    /// Show the context attached to reports for a run
    Context(ContextCommand),
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn init_tracing(verbose: u8, logging: &LoggingConfig) {
    let filter = match verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so `--json` output on stdout stays parseable.
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);
    init_tracing(cli.verbose, &config.logging);

    let format = OutputFormat::from_json_flag(cli.json);

    match cli.command {
        Commands::Capture(cmd) => cmd.execute(&config, format).await,
        Commands::Context(cmd) => cmd.execute(&config, format).await,
        Commands::Config(cmd) => cmd.execute(&config_path, format).await,
    }
}
