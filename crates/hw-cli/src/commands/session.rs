//! Session command
//!
//! Inspect stored tutoring sessions.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::PathBuf;

use hw_core::normalize::{normalize, Content};
use hw_core::types::SessionId;
use hw_storage::FileSystemStore;

use super::AppContext;

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// List all sessions
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Limit number of sessions
        #[arg(long, short, default_value = "10")]
        limit: usize,

        /// Data directory holding `sessions/`
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Show session details
    Show {
        /// Session ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Data directory holding `sessions/`
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

/// Execute the session command
pub fn execute(cmd: SessionCommand, ctx: &AppContext) -> Result<()> {
    match cmd {
        SessionCommand::List {
            json,
            limit,
            data_dir,
        } => list_sessions(&ctx.open_store(data_dir.as_deref())?, json, limit),
        SessionCommand::Show { id, json, data_dir } => {
            show_session(&ctx.open_store(data_dir.as_deref())?, &id, json)
        }
    }
}

fn list_sessions(store: &FileSystemStore, as_json: bool, limit: usize) -> Result<()> {
    use colored::Colorize;

    let sessions = store.list()?;
    let total = sessions.len();
    let sessions: Vec<_> = sessions.into_iter().take(limit).collect();

    if as_json {
        let json = serde_json::to_string_pretty(&sessions)?;
        println!("{}", json);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    println!("{}", "Sessions:".bold().underline());
    println!();

    for info in &sessions {
        println!(
            "  {} {} [{}] {} messages ({})",
            info.id.to_string().green(),
            info.title,
            info.subject.cyan(),
            info.message_count.to_string().yellow(),
            info.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
        );
    }

    if total > limit {
        println!(
            "\n  {} Showing {} of {} sessions. Use --limit to show more.",
            "ℹ".blue(),
            limit,
            total
        );
    }

    Ok(())
}

fn show_session(store: &FileSystemStore, id: &str, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let session_id =
        SessionId::from_string(id).context(format!("Invalid session ID: {}", id))?;
    let (session, messages) = store
        .load(&session_id)
        .context(format!("Session '{}' not found", id))?;

    if as_json {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "session": session,
            "messages": normalize(&messages),
        }))?;
        println!("{}", json);
        return Ok(());
    }

    println!("{}", "Session Details".bold().underline());
    println!();
    println!("  ID: {}", session.id.to_string().green());
    println!("  Title: {}", session.display_title());
    println!("  Subject: {}", session.display_subject().cyan());
    println!(
        "  Created: {}",
        session.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  Updated: {}",
        session.updated_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("  Messages: {}", messages.len().to_string().yellow());

    if messages.is_empty() {
        return Ok(());
    }

    println!();
    println!("{}", "Conversation".bold());
    for message in normalize(&messages) {
        println!(
            "  {} {}",
            message.role.label().bold(),
            message.timestamp.format("%H:%M:%S").to_string().dimmed()
        );
        if let Some(url) = &message.image_url {
            println!("    {} {}", "image:".dimmed(), url);
        }
        match &message.content {
            Content::PlainText(text) => {
                for line in text.lines() {
                    println!("    {}", line);
                }
            }
            Content::Structured(structured) => {
                for (section, text) in structured.sections() {
                    println!("    {}: {}", section.label().cyan(), text);
                }
            }
        }
    }

    Ok(())
}
