//! JSON exporter for sessions

use super::exporter::{Exporter, SessionExport};
use crate::emit::Payload;
use crate::error::Result;
use crate::normalize::NormalizedMessage;
use crate::types::ExportFormat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JSON exporter
pub struct JsonExporter {
    /// Whether to use pretty-print formatting
    pretty: bool,
}

impl JsonExporter {
    /// Create a pretty-printing JSON exporter
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Create a compact JSON exporter
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Serialize one session snapshot as an object
    pub fn export_record(&self, record: &SessionRecord) -> Result<Payload> {
        self.to_payload(record)
    }

    /// Serialize several sessions as one array
    pub fn export_batch(&self, records: &[SessionRecord]) -> Result<Payload> {
        self.to_payload(records)
    }

    fn to_payload<T: Serialize + ?Sized>(&self, value: &T) -> Result<Payload> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(Payload::Text(json))
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn export(&self, session: &SessionExport) -> Result<Payload> {
        self.export_record(&SessionRecord::from_export(session))
    }
}

/// Exported session snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Session ID
    pub session_id: String,
    /// Title, "Untitled" when missing
    pub title: String,
    /// Subject, "General" when missing
    pub subject: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
    /// Number of messages
    pub total_messages: usize,
    /// Normalized conversation
    pub conversation: Vec<NormalizedMessage>,
}

impl SessionRecord {
    /// Create from a normalized session
    pub fn from_export(export: &SessionExport) -> Self {
        let session = &export.session;
        Self {
            session_id: session.id.to_string(),
            title: session.display_title().to_string(),
            subject: session.display_subject().to_string(),
            created_at: session.created_at,
            updated_at: session.updated_at,
            total_messages: export.message_count(),
            conversation: export.messages.clone(),
        }
    }
}
