//! Message normalization
//!
//! Stored assistant replies are either free text or a JSON object carrying
//! `analysis`, `hint` and `guidance`. The shape is decided here, once, and
//! every renderer works from the resulting [`Content`] variant.

use crate::session::Message;
use crate::types::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Structured tutoring reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredContent {
    /// Analysis of the problem
    #[serde(default, deserialize_with = "null_as_empty")]
    pub analysis: String,
    /// Hint towards the next step
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hint: String,
    /// Guidance for the student
    #[serde(default, deserialize_with = "null_as_empty")]
    pub guidance: String,
}

impl StructuredContent {
    /// Non-empty sections in display order
    pub fn sections(&self) -> impl Iterator<Item = (Section, &str)> {
        [
            (Section::Analysis, self.analysis.as_str()),
            (Section::Hint, self.hint.as_str()),
            (Section::Guidance, self.guidance.as_str()),
        ]
        .into_iter()
        .filter(|(_, text)| !text.is_empty())
    }
}

/// Treat an explicit JSON `null` like a missing field
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Named part of a structured reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Analysis,
    Hint,
    Guidance,
}

impl Section {
    /// Heading label
    pub fn label(&self) -> &'static str {
        match self {
            Section::Analysis => "Analysis",
            Section::Hint => "Hint",
            Section::Guidance => "Guidance",
        }
    }
}

/// Message body after classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Free text, kept verbatim
    PlainText(String),
    /// Analysis / hint / guidance reply
    Structured(StructuredContent),
}

impl Content {
    /// Check if the content is structured
    pub fn is_structured(&self) -> bool {
        matches!(self, Content::Structured(_))
    }
}

/// A message ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMessage {
    /// Author
    pub role: Role,
    /// Classified body
    pub content: Content,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
    /// Attached image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Normalize messages, preserving order and length
pub fn normalize(messages: &[Message]) -> Vec<NormalizedMessage> {
    messages
        .iter()
        .map(|m| NormalizedMessage {
            role: m.role,
            content: classify(m.role, &m.content),
            timestamp: m.created_at,
            image_url: m.image_url.clone(),
        })
        .collect()
}

/// Decide the content shape of one raw message body
pub fn classify(role: Role, raw: &str) -> Content {
    if role == Role::Assistant {
        if let Some(structured) = parse_structured(raw) {
            return Content::Structured(structured);
        }
    }
    Content::PlainText(raw.to_string())
}

fn parse_structured(raw: &str) -> Option<StructuredContent> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('{') {
        return None;
    }

    let value: serde_json::Value = serde_json::from_str(trimmed).ok()?;
    let object = value.as_object()?;
    if !["analysis", "hint", "guidance"]
        .iter()
        .any(|key| object.contains_key(*key))
    {
        return None;
    }

    // Non-string fields fail here and the message stays plain text
    serde_json::from_value(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 11, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_structured_assistant_reply() {
        let raw = r#"{"analysis":"a","hint":"h","guidance":"g"}"#;
        assert_eq!(
            classify(Role::Assistant, raw),
            Content::Structured(StructuredContent {
                analysis: "a".to_string(),
                hint: "h".to_string(),
                guidance: "g".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        let raw = r#"{"analysis":"only analysis"}"#;
        assert_eq!(
            classify(Role::Assistant, raw),
            Content::Structured(StructuredContent {
                analysis: "only analysis".to_string(),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_null_fields_default_to_empty() {
        let raw = r#"{"analysis":"a","hint":null,"guidance":"g"}"#;
        assert_eq!(
            classify(Role::Assistant, raw),
            Content::Structured(StructuredContent {
                analysis: "a".to_string(),
                hint: String::new(),
                guidance: "g".to_string(),
            })
        );
    }

    #[test]
    fn test_user_json_stays_plain() {
        let raw = r#"{"analysis":"a"}"#;
        assert_eq!(
            classify(Role::User, raw),
            Content::PlainText(raw.to_string())
        );
    }

    #[test]
    fn test_invalid_json_is_lossless() {
        let raw = "  Let's factor x^2 - 5x + 6 = {x-2}(x-3)\n";
        assert_eq!(
            classify(Role::Assistant, raw),
            Content::PlainText(raw.to_string())
        );
    }

    #[test]
    fn test_object_without_known_keys_stays_plain() {
        let raw = r#"{"answer": 42}"#;
        assert_eq!(
            classify(Role::Assistant, raw),
            Content::PlainText(raw.to_string())
        );
    }

    #[test]
    fn test_non_string_field_stays_plain() {
        let raw = r#"{"analysis": ["step 1"], "hint": "h"}"#;
        assert_eq!(
            classify(Role::Assistant, raw),
            Content::PlainText(raw.to_string())
        );
    }

    #[test]
    fn test_non_object_json_stays_plain() {
        assert_eq!(
            classify(Role::Assistant, "42"),
            Content::PlainText("42".to_string())
        );
        assert_eq!(
            classify(Role::Assistant, "null"),
            Content::PlainText("null".to_string())
        );
    }

    #[test]
    fn test_normalize_preserves_order_and_length() {
        let messages = vec![
            Message::user("q1", ts()),
            Message::assistant(r#"{"hint":"h1"}"#, ts() + Duration::seconds(5)),
            Message::user("q2", ts() + Duration::seconds(10)).with_image("https://x/1.png"),
        ];

        let normalized = normalize(&messages);
        assert_eq!(normalized.len(), 3);
        assert_eq!(normalized[0].content, Content::PlainText("q1".to_string()));
        assert!(normalized[1].content.is_structured());
        assert_eq!(normalized[2].timestamp, ts() + Duration::seconds(10));
        assert_eq!(normalized[2].image_url.as_deref(), Some("https://x/1.png"));
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_content_serializes_untagged() {
        let plain = serde_json::to_value(Content::PlainText("hi".to_string())).unwrap();
        assert_eq!(plain, serde_json::json!("hi"));

        let structured = serde_json::to_value(Content::Structured(StructuredContent {
            analysis: "a".to_string(),
            hint: String::new(),
            guidance: "g".to_string(),
        }))
        .unwrap();
        assert_eq!(
            structured,
            serde_json::json!({"analysis": "a", "hint": "", "guidance": "g"})
        );
    }

    #[test]
    fn test_sections_skip_empty() {
        let content = StructuredContent {
            analysis: "a".to_string(),
            hint: String::new(),
            guidance: "g".to_string(),
        };
        let labels: Vec<_> = content.sections().map(|(s, _)| s.label()).collect();
        assert_eq!(labels, vec!["Analysis", "Guidance"]);
    }
}
