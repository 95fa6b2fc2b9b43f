//! Core type definitions for hw-helper

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a tutoring session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Create from a string with validation
    pub fn from_string(s: impl Into<String>) -> crate::Result<Self> {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(crate::HwError::Validation(
                "Session ID must not be empty".to_string(),
            ));
        }
        if trimmed.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
            return Err(crate::HwError::Validation(format!(
                "Invalid session ID format: {}",
                s
            )));
        }
        Ok(SessionId(trimmed.to_string()))
    }

    /// First `len` characters of the id, used in filenames
    pub fn prefix(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The student asking for help
    User,
    /// The tutoring assistant
    Assistant,
}

impl Role {
    /// Human-readable label used by the document renderers
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "AI Tutor",
        }
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Structured snapshot
    Json,
    /// Narrative document
    Markdown,
    /// Office Open XML word-processor document
    Word,
    /// Plain-text stand-in for PDF
    Plaintext,
}

impl ExportFormat {
    /// All supported formats
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Json,
        ExportFormat::Markdown,
        ExportFormat::Word,
        ExportFormat::Plaintext,
    ];

    /// Format name
    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "markdown",
            ExportFormat::Word => "word",
            ExportFormat::Plaintext => "plaintext",
        }
    }

    /// File extension without the dot
    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
            ExportFormat::Word => "docx",
            ExportFormat::Plaintext => "txt",
        }
    }

    /// MIME type of the produced artifact
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Plaintext => "text/plain;charset=utf-8",
        }
    }

    /// Whether the format can only carry one session per export
    pub fn is_single_session(&self) -> bool {
        matches!(self, ExportFormat::Word | ExportFormat::Plaintext)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = crate::HwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "word" | "docx" => Ok(ExportFormat::Word),
            "plaintext" | "txt" | "pdf" => Ok(ExportFormat::Plaintext),
            other => Err(crate::HwError::Validation(format!(
                "Unknown export format: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_prefix() {
        let id = SessionId::from_string("abc123def456").unwrap();
        assert_eq!(id.prefix(8), "abc123de");

        let short = SessionId::from_string("abc").unwrap();
        assert_eq!(short.prefix(8), "abc");
    }

    #[test]
    fn test_session_id_prefix_multibyte() {
        let id = SessionId("会话编号一二三四五六".to_string());
        assert_eq!(id.prefix(8), "会话编号一二三四");
    }

    #[test]
    fn test_session_id_validation() {
        assert!(SessionId::from_string("").is_err());
        assert!(SessionId::from_string("   ").is_err());
        assert!(SessionId::from_string("../etc").is_err());
        assert_eq!(SessionId::from_string(" abc ").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        let role: Role = serde_json::from_str("\"assistant\"").unwrap();
        assert_eq!(role, Role::Assistant);
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("MD".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("docx".parse::<ExportFormat>().unwrap(), ExportFormat::Word);
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Plaintext);
        assert!("html".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_mime_types() {
        assert_eq!(ExportFormat::Json.mime_type(), "application/json");
        assert_eq!(ExportFormat::Markdown.mime_type(), "text/markdown");
        assert!(ExportFormat::Word.mime_type().contains("wordprocessingml.document"));
        assert_eq!(ExportFormat::Plaintext.mime_type(), "text/plain;charset=utf-8");
    }

    #[test]
    fn test_single_session_formats() {
        assert!(ExportFormat::Word.is_single_session());
        assert!(ExportFormat::Plaintext.is_single_session());
        assert!(!ExportFormat::Json.is_single_session());
        assert!(!ExportFormat::Markdown.is_single_session());
    }
}
