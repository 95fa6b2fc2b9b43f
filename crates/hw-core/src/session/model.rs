//! Session data models

use crate::types::{Role, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when a session has none
pub const DEFAULT_TITLE: &str = "Untitled";

/// Subject used when a session has none
pub const DEFAULT_SUBJECT: &str = "General";

/// A tutoring session as stored upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier
    pub id: SessionId,
    /// Session title
    #[serde(default)]
    pub title: Option<String>,
    /// School subject
    #[serde(default)]
    pub subject: Option<String>,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// When the session was last updated
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with both timestamps set to `created_at`
    pub fn new(id: SessionId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: None,
            subject: None,
            created_at,
            updated_at: created_at,
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Title, or the default when missing or blank
    pub fn display_title(&self) -> &str {
        non_blank(self.title.as_deref()).unwrap_or(DEFAULT_TITLE)
    }

    /// Subject, or the default when missing or blank
    pub fn display_subject(&self) -> &str {
        non_blank(self.subject.as_deref()).unwrap_or(DEFAULT_SUBJECT)
    }

    /// Title as stored, if it carries any text
    pub fn title_text(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// One turn in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Author
    pub role: Role,
    /// Raw stored content; assistant turns may hold serialized JSON
    pub content: String,
    /// When the message was created
    pub created_at: DateTime<Utc>,
    /// Attached image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            created_at,
            image_url: None,
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            created_at,
            image_url: None,
        }
    }

    /// Attach an image
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// Lightweight session summary for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session ID
    pub id: SessionId,
    /// Display title
    pub title: String,
    /// Display subject
    pub subject: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
    /// Number of messages
    pub message_count: usize,
}

impl SessionInfo {
    /// Build a summary from a session and its message count
    pub fn new(session: &Session, message_count: usize) -> Self {
        Self {
            id: session.id.clone(),
            title: session.display_title().to_string(),
            subject: session.display_subject().to_string(),
            created_at: session.created_at,
            updated_at: session.updated_at,
            message_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 11, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_display_defaults() {
        let session = Session::new(SessionId("abc123".to_string()), ts());
        assert_eq!(session.display_title(), "Untitled");
        assert_eq!(session.display_subject(), "General");
        assert!(session.title_text().is_none());
    }

    #[test]
    fn test_blank_title_uses_default() {
        let session = Session::new(SessionId("abc123".to_string()), ts()).with_title("  ");
        assert_eq!(session.display_title(), "Untitled");
    }

    #[test]
    fn test_session_deserialize_nullable_fields() {
        let json = r#"{
            "id": "abc123",
            "title": null,
            "created_at": "2026-01-11T10:30:00Z",
            "updated_at": "2026-01-11T10:45:00Z"
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.id.as_str(), "abc123");
        assert!(session.title.is_none());
        assert!(session.subject.is_none());
    }

    #[test]
    fn test_message_builders() {
        let msg = Message::user("hello", ts()).with_image("https://img.example/a.png");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.image_url.as_deref(), Some("https://img.example/a.png"));
    }
}
