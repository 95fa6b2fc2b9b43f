//! hw-core - Core library for hw-helper
//!
//! This crate provides the export pipeline for tutoring sessions: message
//! normalization, image retrieval, the JSON / Markdown / Word / plain-text
//! renderers, artifact delivery and the orchestrator tying them together.

pub mod error;
pub mod types;
pub mod config;
pub mod session;
pub mod normalize;
pub mod fetch;
pub mod export;
pub mod emit;
pub mod orchestrator;

pub use error::{HwError, Result};
pub use orchestrator::{ExportOrchestrator, ExportSummary};
pub use types::*;
