//! Exporter trait and shared rendering context

use crate::emit::Payload;
use crate::error::Result;
use crate::normalize::NormalizedMessage;
use crate::session::Session;
use crate::types::ExportFormat;
use chrono::{DateTime, FixedOffset, Local, Offset, Utc};

/// Fixed-component timestamp layout used by every renderer
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// A session paired with its normalized conversation
#[derive(Debug, Clone)]
pub struct SessionExport {
    /// Session metadata
    pub session: Session,
    /// Messages in ascending `created_at` order
    pub messages: Vec<NormalizedMessage>,
}

impl SessionExport {
    /// Pair a session with its messages
    pub fn new(session: Session, messages: Vec<NormalizedMessage>) -> Self {
        Self { session, messages }
    }

    /// Number of messages
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

/// Time zone used when formatting timestamps
#[derive(Debug, Clone, Copy)]
pub enum TimeZoneSetting {
    /// Host local time zone
    Local,
    /// Fixed offset from UTC
    Fixed(FixedOffset),
}

/// Settings shared by all renderers of one export call
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Time zone for displayed timestamps
    pub time_zone: TimeZoneSetting,
    /// When the export started
    pub exported_at: DateTime<Utc>,
    /// Product name for footers
    pub product_name: String,
}

impl RenderContext {
    /// Create a context rendering times in UTC
    pub fn utc(exported_at: DateTime<Utc>) -> Self {
        Self {
            time_zone: TimeZoneSetting::Fixed(Utc.fix()),
            exported_at,
            product_name: "Homework Helper".to_string(),
        }
    }

    /// Build from an optional UTC offset in minutes; `None` means local time
    pub fn with_offset_minutes(
        offset_minutes: Option<i32>,
        exported_at: DateTime<Utc>,
        product_name: impl Into<String>,
    ) -> Self {
        let time_zone = offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes.saturating_mul(60)))
            .map(TimeZoneSetting::Fixed)
            .unwrap_or(TimeZoneSetting::Local);
        Self {
            time_zone,
            exported_at,
            product_name: product_name.into(),
        }
    }

    /// Format a timestamp as `YYYY/MM/DD HH:MM:SS`
    pub fn format_time(&self, ts: DateTime<Utc>) -> String {
        match self.time_zone {
            TimeZoneSetting::Local => ts.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string(),
            TimeZoneSetting::Fixed(offset) => {
                ts.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string()
            }
        }
    }
}

/// Trait for session exporters
pub trait Exporter {
    /// Format produced by this exporter
    fn format(&self) -> ExportFormat;

    /// Render one session
    fn export(&self, session: &SessionExport) -> Result<Payload>;
}
