//! CLI Module
//!
//! Command-line interface for chatboat using Clap v4.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// chatboat - onboarding wizard for your AI chatbot
#[derive(Parser, Debug)]
#[command(name = "chatboat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (written to ~/.chatboat/logs/)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the onboarding wizard (default)
    Onboard,

    /// Initialize configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration (the API key is never printed)
    Config,
}

/// Main CLI entry point
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;
    let _log_guard = crate::logging::init(&config.logging, cli.debug)?;
    if cli.debug {
        tracing::info!("Debug mode enabled");
    }

    match cli.command {
        None | Some(Commands::Onboard) => commands::cmd_onboard(&config).await,
        Some(Commands::Init { force }) => commands::cmd_init(&config, force),
        Some(Commands::Config) => commands::cmd_config(&config),
    }
}
