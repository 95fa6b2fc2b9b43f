//! Artifact destinations

use crate::error::{HwError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Rendered artifact content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// UTF-8 text
    Text(String),
    /// Binary document
    Bytes(Vec<u8>),
}

impl Payload {
    /// Raw bytes of the payload
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Bytes(bytes) => bytes,
        }
    }

    /// Text content, if this is a text payload
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Bytes(_) => None,
        }
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Check if the payload is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A finished export output ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Content
    pub payload: Payload,
    /// Target filename
    pub filename: String,
    /// MIME type
    pub mime_type: String,
}

impl ExportArtifact {
    /// Create an artifact
    pub fn new(
        payload: Payload,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            payload,
            filename: filename.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Destination artifacts are written to
pub trait Sink {
    /// Deliver one artifact
    fn write(&mut self, payload: &Payload, filename: &str, mime_type: &str) -> Result<()>;
}

/// Writes artifacts as files into a directory
pub struct DirectorySink {
    dir: PathBuf,
    overwrite: bool,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Create a sink for `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: false,
            written: Vec::new(),
        }
    }

    /// Replace existing files instead of picking a fresh name
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// First free path for `filename`: `name.ext`, `name-1.ext`, `name-2.ext`, ...
    fn target_path(&self, filename: &str) -> PathBuf {
        let path = self.dir.join(filename);
        if self.overwrite || !path.exists() {
            return path;
        }

        let candidate = Path::new(filename);
        let stem = candidate
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename);
        let ext = candidate.extension().and_then(|s| s.to_str());

        (1..)
            .map(|n| {
                let name = match ext {
                    Some(ext) => format!("{}-{}.{}", stem, n, ext),
                    None => format!("{}-{}", stem, n),
                };
                self.dir.join(name)
            })
            .find(|p| !p.exists())
            .unwrap_or(path)
    }
}

impl Sink for DirectorySink {
    fn write(&mut self, payload: &Payload, filename: &str, mime_type: &str) -> Result<()> {
        if filename.is_empty() || filename.contains('/') || filename.contains('\\') {
            return Err(HwError::Validation(format!("Invalid artifact filename: {}", filename)));
        }

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let final_path = self.target_path(filename);

        // Atomic write using temp file
        let temp_path = self.dir.join(format!(".{}.tmp", filename));
        let written = fs::File::create(&temp_path)
            .and_then(|mut file| {
                file.write_all(payload.as_bytes())?;
                file.flush()
            })
            .and_then(|()| fs::rename(&temp_path, &final_path));

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!(
            "Wrote {} ({}, {} bytes)",
            final_path.display(),
            mime_type,
            payload.len()
        );
        self.written.push(final_path);
        Ok(())
    }
}

/// Collects artifacts in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Vec<ExportArtifact>,
    fail_after: Option<usize>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `count` writes, then fail every following one
    pub fn failing_after(count: usize) -> Self {
        Self {
            artifacts: Vec::new(),
            fail_after: Some(count),
        }
    }

    /// Artifacts received so far, in delivery order
    pub fn artifacts(&self) -> &[ExportArtifact] {
        &self.artifacts
    }
}

impl Sink for MemorySink {
    fn write(&mut self, payload: &Payload, filename: &str, mime_type: &str) -> Result<()> {
        if self.fail_after.is_some_and(|limit| self.artifacts.len() >= limit) {
            return Err(HwError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("sink rejected {}", filename),
            )));
        }
        self.artifacts
            .push(ExportArtifact::new(payload.clone(), filename, mime_type));
        Ok(())
    }
}
