//! Application configuration and CLI argument parsing
//!
//! This module handles the command-line interface definitions and turns
//! them into a loaded [`Config`].

use clap::{Parser, Subcommand};
use playslip::config::Config;
use playslip::models::{BetId, OptionId, UserId};
use playslip::Result;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Command-line interface definition for Playslip
#[derive(Parser)]
#[command(name = "playslip")]
#[command(about = "Register plays on bets and list a user's latest plays")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of config/<environment>.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

/// Available commands for the Playslip CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve,

    /// Register a play
    CreatePlay {
        #[arg(long)]
        user_id: UserId,
        #[arg(long)]
        bet_id: BetId,
        #[arg(long)]
        choice_id: Option<OptionId>,
        #[arg(long)]
        amount: Decimal,
        /// Read bets from a JSON file instead of the catalog service
        #[arg(long)]
        bets_file: Option<PathBuf>,
        /// Locale for rejection messages
        #[arg(long)]
        locale: Option<String>,
    },

    /// Show a user's latest plays
    Latest {
        #[arg(long)]
        user_id: UserId,
        /// Read bets from a JSON file instead of the catalog service
        #[arg(long)]
        bets_file: Option<PathBuf>,
    },

    /// Bring the play store schema up to date
    Migrate,
}

impl Commands {
    /// Get the command name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Serve => "serve",
            Commands::CreatePlay { .. } => "create-play",
            Commands::Latest { .. } => "latest",
            Commands::Migrate => "migrate",
        }
    }
}

impl Cli {
    /// Load configuration, honoring `--config` and `--verbose`
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = Config::load_from_file(path)?;
                config.override_from(|key| std::env::var(key).ok())?;
                config.validate()?;
                config
            }
            None => Config::load()?,
        };

        if self.verbose {
            config.app.log_level = "debug".to_string();
        }

        Ok(config)
    }
}
