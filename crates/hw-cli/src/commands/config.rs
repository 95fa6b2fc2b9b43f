//! Config command
//!
//! Manage hw-helper configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use hw_core::config::Config;

use super::AppContext;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, ctx: &AppContext) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(ctx, json),
        ConfigCommand::Init { force } => init_config(ctx, force),
    }
}

fn show_config(ctx: &AppContext, as_json: bool) -> Result<()> {
    use colored::Colorize;

    if as_json {
        let json = serde_json::to_string_pretty(&ctx.config)?;
        println!("{}", json);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    let source = if ctx.config_path.exists() {
        ctx.config_path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", ctx.config_path.display())
    };
    println!("{}", source.dimmed());
    println!();
    println!("{}", ctx.config.to_toml()?);

    Ok(())
}

fn init_config(ctx: &AppContext, force: bool) -> Result<()> {
    use colored::Colorize;

    let path = &ctx.config_path;
    if path.exists() && !force {
        anyhow::bail!(
            "Configuration already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    Config::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} Wrote default configuration to {}", "✓".green(), path.display());
    Ok(())
}
