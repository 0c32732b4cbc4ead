// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! hexapi CLI - collection ledger fed by the card game client

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use hexapi::{commands, config};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexapi")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "HEXAPI_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for client events and keep the collection up to date
    Serve {
        /// Address to listen on (overrides listen_addr)
        #[arg(short, long)]
        listen: Option<String>,

        /// Skip the startup version check
        #[arg(long)]
        skip_version_check: bool,
    },

    /// Print the cached collection with current prices
    Show {
        /// Include entries with no copies owned
        #[arg(long)]
        all: bool,
    },

    /// Export the collection as CSV
    Export {
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },

    /// Print the effective configuration
    Config {
        /// Single configuration key
        key: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize logging; RUST_LOG wins over the flags
    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 if settings.debug => tracing::Level::DEBUG,
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Serve { listen, skip_version_check } => {
            commands::serve::run(&settings, listen, skip_version_check).await
        }
        Commands::Show { all } => {
            commands::show::run(&settings, all, !cli.no_color).await
        }
        Commands::Export { output } => {
            commands::export::run(&settings, output).await
        }
        Commands::Config { key } => {
            commands::config::run(&settings, key.as_deref())
        }
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command())
        }
    }
}
