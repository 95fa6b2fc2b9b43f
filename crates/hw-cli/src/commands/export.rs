//! Export command
//!
//! Export tutoring sessions to files.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use hw_core::emit::DirectorySink;
use hw_core::fetch::{HttpImageFetcher, ImageFetcher, NoopImageFetcher};
use hw_core::types::SessionId;
use hw_core::ExportOrchestrator;

use super::AppContext;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Structured JSON snapshot
    Json,
    /// Markdown document
    #[value(alias = "md")]
    Markdown,
    /// Word document (.docx)
    #[value(alias = "docx")]
    Word,
    /// Plain text document
    #[value(alias = "txt", alias = "pdf")]
    Plaintext,
}

impl From<ExportFormat> for hw_core::types::ExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
            ExportFormat::Word => Self::Word,
            ExportFormat::Plaintext => Self::Plaintext,
        }
    }
}

/// Arguments for the export command
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Session ID to export (repeat for a batch)
    #[arg(long = "session", short, required = true)]
    pub sessions: Vec<String>,

    /// Export format (configured default if not specified)
    #[arg(long, short, value_enum)]
    pub format: Option<ExportFormat>,

    /// Output directory
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Data directory holding `sessions/`
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Do not download image attachments
    #[arg(long)]
    pub no_images: bool,
}

/// Execute the export command
pub fn execute(args: ExportArgs, ctx: &AppContext) -> Result<()> {
    use colored::Colorize;

    let ids = args
        .sessions
        .iter()
        .map(|s| SessionId::from_string(s).context(format!("Invalid session ID: {}", s)))
        .collect::<Result<Vec<_>>>()?;

    let export_config = ctx.config.export.clone();
    let format = args
        .format
        .map(Into::into)
        .unwrap_or(export_config.default_format);
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| export_config.output_dir.clone());

    let store = ctx.open_store(args.data_dir.as_deref())?;
    let fetcher: Arc<dyn ImageFetcher> = if args.no_images || !ctx.config.fetch.enabled {
        Arc::new(NoopImageFetcher)
    } else {
        Arc::new(HttpImageFetcher::new(&ctx.config.fetch))
    };

    eprintln!(
        "Exporting {} session(s) as {}...",
        ids.len().to_string().yellow(),
        format.to_string().cyan()
    );

    let mut sink = DirectorySink::new(&output_dir).with_overwrite(export_config.overwrite);
    let orchestrator =
        ExportOrchestrator::new(Arc::new(store), fetcher).with_config(export_config);

    let result = orchestrator.export_sessions(&ids, format, &mut sink);

    for path in sink.written() {
        eprintln!("  {} {}", "→".dimmed(), path.display());
    }

    let summary = result.context("Export failed")?;
    eprintln!(
        "{} Exported {} session(s) as {} to {}",
        "✓".green(),
        summary.count.to_string().yellow(),
        summary.format.to_string().cyan(),
        output_dir.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_values() {
        assert!(ExportFormat::from_str("json", true).is_ok());
        assert!(ExportFormat::from_str("markdown", true).is_ok());
        assert!(ExportFormat::from_str("word", true).is_ok());
        assert!(ExportFormat::from_str("plaintext", true).is_ok());
    }

    #[test]
    fn test_export_format_aliases() {
        assert_eq!(ExportFormat::from_str("pdf", true).unwrap(), ExportFormat::Plaintext);
        assert_eq!(ExportFormat::from_str("docx", true).unwrap(), ExportFormat::Word);
        assert_eq!(ExportFormat::from_str("md", true).unwrap(), ExportFormat::Markdown);
    }

    #[test]
    fn test_export_format_conversion() {
        let core: hw_core::types::ExportFormat = ExportFormat::Plaintext.into();
        assert_eq!(core, hw_core::types::ExportFormat::Plaintext);
    }
}
