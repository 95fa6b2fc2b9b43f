//! Configuration management for hw-helper

use crate::error::{HwError, Result};
use crate::types::ExportFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Export settings
    pub export: ExportConfig,
    /// Image fetch settings
    pub fetch: FetchConfig,
    /// Storage settings
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| HwError::Toml(format!("{}: {}", path.display(), e)))
    }

    /// Serialize to pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| HwError::Toml(e.to_string()))
    }

    /// Write configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

/// Export-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default export format
    pub default_format: ExportFormat,
    /// Directory artifacts are written to
    pub output_dir: PathBuf,
    /// Delay between artifacts of a multi-file export, in milliseconds
    pub pace_interval_ms: u64,
    /// Fixed UTC offset for timestamps; local time zone when unset
    pub utc_offset_minutes: Option<i32>,
    /// Product name shown in document footers
    pub product_name: String,
    /// Overwrite existing files instead of picking a fresh name
    pub overwrite: bool,
}

impl ExportConfig {
    /// Pacing interval as a duration
    pub fn pace_interval(&self) -> Duration {
        Duration::from_millis(self.pace_interval_ms)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: ExportFormat::Markdown,
            output_dir: PathBuf::from("exports"),
            pace_interval_ms: 500,
            utc_offset_minutes: None,
            product_name: "Homework Helper".to_string(),
            overwrite: false,
        }
    }
}

/// Image fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Fetch attachments at all; when off, documents carry the fallback line
    pub enabled: bool,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
    /// User agent sent with image requests
    pub user_agent: String,
}

impl FetchConfig {
    /// Timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 15,
            user_agent: concat!("hw-helper/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory; platform default when unset
    pub data_dir: Option<PathBuf>,
}
