//! File system storage for sessions

use hw_core::error::{HwError, Result};
use hw_core::session::{Message, Session, SessionInfo, SessionStore};
use hw_core::types::SessionId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Current schema version of session files
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// On-disk session file: metadata plus the full conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFile {
    /// Schema version
    pub schema_version: String,
    /// Session metadata
    pub session: Session,
    /// Conversation
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl SessionFile {
    /// Create a file with the current schema version
    pub fn new(session: Session, messages: Vec<Message>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            session,
            messages,
        }
    }

    /// Check that the file's major version matches ours
    fn is_supported(&self) -> bool {
        let major = |v: &str| v.split('.').next().map(str::to_string);
        major(&self.schema_version) == major(CURRENT_SCHEMA_VERSION)
    }
}

/// File system based session storage
pub struct FileSystemStore {
    /// Sessions subdirectory
    sessions_dir: PathBuf,
}

impl FileSystemStore {
    /// Create a new file system store
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            sessions_dir: base_dir.into().join("sessions"),
        };

        store.ensure_dirs()?;
        Ok(store)
    }

    /// Ensure required directories exist
    fn ensure_dirs(&self) -> Result<()> {
        if !self.sessions_dir.exists() {
            fs::create_dir_all(&self.sessions_dir).map_err(|e| {
                HwError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create sessions directory: {}", e),
                ))
            })?;
            debug!("Created sessions directory: {:?}", self.sessions_dir);
        }
        Ok(())
    }

    /// Get the path for a session file
    fn session_path(&self, id: &SessionId) -> PathBuf {
        self.sessions_dir.join(format!("{}.json", id))
    }

    /// Get a temporary path for atomic writes
    fn temp_path(&self, id: &SessionId) -> PathBuf {
        self.sessions_dir.join(format!(".{}.json.tmp", id))
    }

    /// Save a session with its messages (write to temp, then rename)
    pub fn save(&self, session: &Session, messages: &[Message]) -> Result<()> {
        let temp_path = self.temp_path(&session.id);
        let final_path = self.session_path(&session.id);

        let file = SessionFile::new(session.clone(), messages.to_vec());

        let written = fs::File::create(&temp_path)
            .map_err(HwError::from)
            .and_then(|temp_file| {
                let mut writer = BufWriter::new(temp_file);
                serde_json::to_writer_pretty(&mut writer, &file)?;
                writer.flush()?;
                Ok(())
            })
            .and_then(|()| fs::rename(&temp_path, &final_path).map_err(HwError::from));

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        debug!("Saved session {} to {:?}", session.id, final_path);
        Ok(())
    }

    /// Read a session file; `Ok(None)` when it does not exist
    fn read_file(&self, path: &Path) -> Result<Option<SessionFile>> {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(HwError::Upstream(format!(
                    "Failed to open {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let reader = BufReader::new(file);
        let mut session_file: SessionFile = serde_json::from_reader(reader).map_err(|e| {
            HwError::Upstream(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        if !session_file.is_supported() {
            return Err(HwError::Upstream(format!(
                "Unsupported schema version {} in {} (expected {})",
                session_file.schema_version,
                path.display(),
                CURRENT_SCHEMA_VERSION
            )));
        }

        session_file.messages.sort_by_key(|m| m.created_at);
        Ok(Some(session_file))
    }

    /// List all sessions, newest first
    pub fn list(&self) -> Result<Vec<SessionInfo>> {
        let mut sessions = Vec::new();

        let entries = fs::read_dir(&self.sessions_dir).map_err(|e| {
            HwError::Upstream(format!("Failed to read sessions directory: {}", e))
        })?;

        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();

            // Skip non-json files and temp files
            if !path.extension().map(|e| e == "json").unwrap_or(false) {
                continue;
            }
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with('.'))
                .unwrap_or(false)
            {
                continue;
            }

            match self.read_file(&path) {
                Ok(Some(file)) => {
                    sessions.push(SessionInfo::new(&file.session, file.messages.len()))
                }
                Ok(None) => {}
                Err(e) => warn!("Failed to read session file {:?}: {}", path, e),
            }
        }

        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    /// Load one session with its messages
    pub fn load(&self, id: &SessionId) -> Result<(Session, Vec<Message>)> {
        self.read_file(&self.session_path(id))?
            .map(|file| (file.session, file.messages))
            .ok_or_else(|| HwError::NotFound(id.to_string()))
    }

    /// Check if a session exists
    #[cfg(test)]
    fn exists(&self, id: &SessionId) -> bool {
        self.session_path(id).exists()
    }

    #[cfg(test)]
    fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }
}

impl SessionStore for FileSystemStore {
    fn get_sessions(&self, ids: &[SessionId]) -> Result<Vec<Session>> {
        let mut sessions = Vec::new();
        for id in ids {
            if let Some(file) = self.read_file(&self.session_path(id))? {
                sessions.push(file.session);
            }
        }
        Ok(sessions)
    }

    fn get_messages(&self, session_id: &SessionId) -> Result<Vec<Message>> {
        Ok(self
            .read_file(&self.session_path(session_id))?
            .map(|file| file.messages)
            .unwrap_or_default())
    }
}

/// Platform data directory, falling back to `~/.hw-helper`
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "hw-helper", "hw-helper")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".hw-helper")
        })
}
