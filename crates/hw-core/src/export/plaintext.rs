//! Plain-text exporter, used in place of PDF output

use super::exporter::{Exporter, RenderContext, SessionExport};
use crate::emit::Payload;
use crate::error::Result;
use crate::normalize::{Content, NormalizedMessage};
use crate::types::ExportFormat;

/// Width of banner and rule lines, in characters
const RULE_WIDTH: usize = 60;

/// Plain-text exporter
pub struct PlainTextExporter {
    /// Shared rendering settings
    context: RenderContext,
}

impl PlainTextExporter {
    /// Create a new plain-text exporter
    pub fn new(context: RenderContext) -> Self {
        Self { context }
    }

    fn banner() -> String {
        "═".repeat(RULE_WIDTH)
    }

    fn rule() -> String {
        "─".repeat(RULE_WIDTH)
    }

    fn render_header(&self, export: &SessionExport) -> String {
        let session = &export.session;
        let mut out = String::new();

        out.push_str(&Self::banner());
        out.push('\n');
        out.push_str(session.display_title());
        out.push('\n');
        out.push_str(&Self::banner());
        out.push_str("\n\n");

        out.push_str(&format!("Subject: {}\n", session.display_subject()));
        out.push_str(&format!(
            "Created: {}\n",
            self.context.format_time(session.created_at)
        ));
        out.push_str(&format!("Session ID: {}\n", session.id));
        out.push_str(&format!("Messages: {}\n\n", export.message_count()));

        out
    }

    fn render_message(&self, message: &NormalizedMessage) -> String {
        let mut out = String::new();

        out.push_str(&Self::rule());
        out.push('\n');
        out.push_str(&format!(
            "[{}] {}\n",
            message.role.label(),
            self.context.format_time(message.timestamp)
        ));
        if message.image_url.is_some() {
            out.push_str("[attachment included]\n");
        }
        out.push('\n');

        match &message.content {
            Content::Structured(structured) => {
                for (section, text) in structured.sections() {
                    out.push_str(&format!("【{}】\n{}\n\n", section.label(), text));
                }
            }
            Content::PlainText(text) => {
                out.push_str(text);
                out.push_str("\n\n");
            }
        }

        out
    }

    fn render_footer(&self) -> String {
        format!(
            "{}\nExported at: {}\nGenerated by {}\n",
            Self::banner(),
            self.context.format_time(self.context.exported_at),
            self.context.product_name
        )
    }
}

impl Exporter for PlainTextExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Plaintext
    }

    fn export(&self, export: &SessionExport) -> Result<Payload> {
        let mut out = self.render_header(export);
        for message in &export.messages {
            out.push_str(&self.render_message(message));
        }
        out.push_str(&self.render_footer());
        Ok(Payload::Text(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::session::{Message, Session};
    use crate::types::SessionId;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 11, 10, 30, 0).unwrap()
    }

    fn render(session: Session, messages: Vec<Message>) -> String {
        let export = SessionExport::new(session, normalize(&messages));
        let context = RenderContext::utc(ts() + Duration::hours(2));
        let payload = PlainTextExporter::new(context).export(&export).unwrap();
        payload.as_text().unwrap().to_string()
    }

    fn session() -> Session {
        Session::new(SessionId("abc123".to_string()), ts())
            .with_title("Quadratics")
            .with_subject("Math")
    }

    #[test]
    fn test_banner_and_metadata() {
        let text = render(session(), Vec::new());
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "═".repeat(60));
        assert_eq!(lines[1], "Quadratics");
        assert_eq!(lines[2], "═".repeat(60));
        assert!(text.contains("Subject: Math\n"));
        assert!(text.contains("Created: 2026/01/11 10:30:00\n"));
        assert!(text.contains("Session ID: abc123\n"));
        assert!(text.contains("Messages: 0\n"));
    }

    #[test]
    fn test_footer() {
        let text = render(session(), Vec::new());
        assert!(text.contains("Exported at: 2026/01/11 12:30:00\n"));
        assert!(text.ends_with("Generated by Homework Helper\n"));
    }

    #[test]
    fn test_message_blocks() {
        let text = render(
            session(),
            vec![
                Message::user("What is the vertex?", ts()).with_image("https://img.example/q.png"),
                Message::assistant(
                    r#"{"analysis":"Vertex form","hint":"","guidance":"Complete the square"}"#,
                    ts() + Duration::seconds(30),
                ),
            ],
        );

        assert!(text.contains(
            "[User] 2026/01/11 10:30:00\n[attachment included]\n\nWhat is the vertex?\n"
        ));
        assert!(text.contains("[AI Tutor] 2026/01/11 10:30:30\n\n【Analysis】\nVertex form\n"));
        assert!(text.contains("【Guidance】\nComplete the square\n"));
        assert!(!text.contains("【Hint】"));
        assert!(!text.contains("img.example"));
        assert_eq!(text.lines().filter(|l| *l == "─".repeat(60)).count(), 2);
    }

    #[test]
    fn test_untitled_session() {
        let text = render(Session::new(SessionId("abc123".to_string()), ts()), Vec::new());
        assert_eq!(text.lines().nth(1), Some("Untitled"));
        assert!(text.contains("Subject: General\n"));
    }
}
