//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod config;
pub mod export;
pub mod session;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hw_core::config::Config;
use hw_storage::{default_data_dir, FileSystemStore};
use std::path::{Path, PathBuf};

/// hw-helper - export tutoring sessions as documents
#[derive(Debug, Parser)]
#[command(name = "hw-helper")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "HW_HELPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Export one or more sessions
    Export(export::ExportArgs),

    /// Inspect stored sessions
    #[command(subcommand)]
    Session(session::SessionCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Settings shared by every command
pub struct AppContext {
    /// Path the configuration was loaded from
    pub config_path: PathBuf,
    /// Effective configuration
    pub config: Config,
}

impl AppContext {
    /// Open the session store, preferring `data_dir` over the configured one
    pub fn open_store(&self, data_dir: Option<&Path>) -> Result<FileSystemStore> {
        let base = data_dir
            .map(Path::to_path_buf)
            .or_else(|| self.config.storage.data_dir.clone())
            .unwrap_or_else(default_data_dir);

        FileSystemStore::new(&base)
            .with_context(|| format!("Failed to open session store at {}", base.display()))
    }
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| default_data_dir().join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    let ctx = AppContext {
        config_path,
        config,
    };

    // Dispatch to command handler
    match cli.command {
        Commands::Export(args) => export::execute(args, &ctx),
        Commands::Session(cmd) => session::execute(cmd, &ctx),
        Commands::Config(cmd) => config::execute(cmd, &ctx),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_export_accepts_repeated_sessions() {
        let cli = Cli::try_parse_from([
            "hw-helper", "export", "--session", "a", "--session", "b", "--format", "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Export(args) => assert_eq!(args.sessions, vec!["a", "b"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["hw-helper", "config", "show", "-vv", "--no-color"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_color);
    }
}
