//! hw-storage - Storage library for hw-helper
//!
//! This crate provides a file-backed [`hw_core::session::SessionStore`].

mod session_store;

pub use session_store::{default_data_dir, FileSystemStore, SessionFile, CURRENT_SCHEMA_VERSION};
