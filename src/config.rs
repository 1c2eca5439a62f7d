//! Configuration and CLI argument handling

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

/// Directory under the home directory holding the session record
pub const DEFAULT_CONFIG_SUBDIR: &str = ".config/redgreen";

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "redgreen")]
#[command(about = "redgreen: a TDD session timer")]
#[command(version)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the session record
    #[arg(long, global = true, env = "REDGREEN_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// One verb per session operation
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a TDD session for MINUTES minutes (1-60)
    Start {
        /// Session length in whole minutes
        #[arg(allow_hyphen_values = true)]
        minutes: String,
    },
    /// Show the current session status
    Status,
    /// Pause the current session
    Pause,
    /// Resume a paused session
    Resume,
    /// Restart the session with the original duration
    Restart,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Resolve the config directory, falling back to `~/.config/redgreen`
    pub fn config_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.config_dir {
            return Ok(dir.clone());
        }
        let home = dirs::home_dir().context("could not determine the home directory")?;
        Ok(home.join(DEFAULT_CONFIG_SUBDIR))
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }
}
