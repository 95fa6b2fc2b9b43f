//! Markdown exporter for sessions

use super::exporter::{Exporter, RenderContext, SessionExport};
use crate::emit::Payload;
use crate::error::Result;
use crate::normalize::{Content, NormalizedMessage};
use crate::types::ExportFormat;

/// Markdown exporter
pub struct MarkdownExporter {
    /// Shared rendering settings
    context: RenderContext,
}

impl MarkdownExporter {
    /// Create a new Markdown exporter
    pub fn new(context: RenderContext) -> Self {
        Self { context }
    }

    /// Render the document header and metadata block
    fn render_header(&self, export: &SessionExport) -> String {
        let session = &export.session;
        let mut header = String::new();

        header.push_str(&format!("# {}\n\n", session.display_title()));
        header.push_str(&format!("**Subject:** {}\n", session.display_subject()));
        header.push_str(&format!(
            "**Created:** {}\n",
            self.context.format_time(session.created_at)
        ));
        header.push_str(&format!("**Session ID:** `{}`\n", session.id));
        header.push_str(&format!("**Messages:** {}\n\n", export.message_count()));
        header.push_str("---\n\n");

        header
    }

    /// Render a single message
    fn render_message(&self, message: &NormalizedMessage) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "## {} · {}\n\n",
            message.role.label(),
            self.context.format_time(message.timestamp)
        ));

        if let Some(ref url) = message.image_url {
            output.push_str(&format!("![attachment]({})\n\n", url));
        }

        match &message.content {
            Content::Structured(structured) => {
                for (section, text) in structured.sections() {
                    output.push_str(&format!("### {}\n\n", section.label()));
                    output.push_str(text);
                    output.push_str("\n\n");
                }
            }
            Content::PlainText(text) => {
                output.push_str(text);
                output.push_str("\n\n");
            }
        }

        output
    }
}

impl Exporter for MarkdownExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Markdown
    }

    fn export(&self, export: &SessionExport) -> Result<Payload> {
        let mut output = self.render_header(export);

        let last = export.messages.len().saturating_sub(1);
        for (index, message) in export.messages.iter().enumerate() {
            output.push_str(&self.render_message(message));
            if index < last {
                output.push_str("---\n\n");
            }
        }

        Ok(Payload::Text(output))
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

    fn render(messages: Vec<Message>) -> String {
        let session = Session::new(SessionId("abc123".to_string()), ts())
            .with_title("数学作业 - 二次方程")
            .with_subject("数学");
        let export = SessionExport::new(session, normalize(&messages));
        let payload = MarkdownExporter::new(RenderContext::utc(ts()))
            .export(&export)
            .unwrap();
        payload.as_text().unwrap().to_string()
    }

    fn count_lines(md: &str, predicate: impl Fn(&str) -> bool) -> usize {
        md.lines().filter(|l| predicate(l)).count()
    }

    #[test]
    fn test_markdown_exporter_format() {
        assert_eq!(
            MarkdownExporter::new(RenderContext::utc(ts())).format(),
            ExportFormat::Markdown
        );
    }

    #[test]
    fn test_header_and_metadata() {
        let md = render(Vec::new());
        assert!(md.starts_with("# 数学作业 - 二次方程\n\n"));
        assert!(md.contains("**Subject:** 数学\n"));
        assert!(md.contains("**Created:** 2026/01/11 10:30:00\n"));
        assert!(md.contains("**Session ID:** `abc123`\n"));
        assert!(md.contains("**Messages:** 0\n"));
        assert_eq!(count_lines(&md, |l| l == "---"), 1);
    }

    #[test]
    fn test_rules_only_between_messages() {
        let md = render(vec![
            Message::user("q1", ts()),
            Message::assistant(
                r#"{"analysis":"a","hint":"h","guidance":"g"}"#,
                ts() + Duration::seconds(1),
            ),
            Message::user("q2", ts() + Duration::seconds(2)),
            Message::assistant(
                r#"{"analysis":"a2","hint":"h2","guidance":"g2"}"#,
                ts() + Duration::seconds(3),
            ),
        ]);

        assert_eq!(count_lines(&md, |l| l.starts_with("## ")), 4);
        let body = &md[md.find("\n## ").unwrap()..];
        assert_eq!(count_lines(body, |l| l == "---"), 3);
        assert!(!md.trim_end().ends_with("---"));
    }

    #[test]
    fn test_structured_sections_skip_empty() {
        let md = render(vec![Message::assistant(
            r#"{"analysis":"Look at the discriminant","guidance":"Compute b^2-4ac"}"#,
            ts(),
        )]);

        assert!(md.contains("## AI Tutor · 2026/01/11 10:30:00"));
        assert!(md.contains("### Analysis\n\nLook at the discriminant\n"));
        assert!(md.contains("### Guidance\n\nCompute b^2-4ac\n"));
        assert!(!md.contains("### Hint"));
    }

    #[test]
    fn test_plain_text_and_image() {
        let md = render(vec![
            Message::user("See attached", ts()).with_image("https://img.example/q.png"),
        ]);

        assert!(md.contains(
            "## User · 2026/01/11 10:30:00\n\n![attachment](https://img.example/q.png)\n\nSee attached\n"
        ));
    }

    #[test]
    fn test_message_order_preserved() {
        let md = render(vec![
            Message::user("first", ts()),
            Message::assistant("second", ts() + Duration::seconds(1)),
            Message::user("third", ts() + Duration::seconds(2)),
        ]);

        let first = md.find("first").unwrap();
        let second = md.find("second").unwrap();
        let third = md.find("third").unwrap();
        assert!(first < second && second < third);
    }
}
