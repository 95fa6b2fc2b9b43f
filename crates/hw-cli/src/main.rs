//! hw-helper - tutoring session export CLI
//!
//! Turns stored homework-help conversations into JSON, Markdown, Word or
//! plain-text documents.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a default configuration
//! hw-helper config init
//!
//! # See what is stored
//! hw-helper session list
//!
//! # Export one session as Markdown, or several as one JSON file
//! hw-helper export --session abc123 --format markdown
//! hw-helper export --session abc123 --session def456 --format json
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
