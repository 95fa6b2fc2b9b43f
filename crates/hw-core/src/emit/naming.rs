//! Artifact filename conventions

use crate::session::Session;
use crate::types::ExportFormat;
use chrono::{DateTime, Utc};

/// Length of the session id prefix embedded in filenames
pub const ID_PREFIX_LEN: usize = 8;

/// Upper bound in bytes for the title part of a filename
///
/// Keeps `title_id8_ms.ext`, its collision suffix and the sink's temp name
/// well under the common 255-byte filename limit.
pub const MAX_TITLE_BYTES: usize = 120;

const DOCUMENT_FALLBACK: &str = "homework";
const MARKDOWN_FALLBACK: &str = "session";

/// Filename for a single-session artifact
///
/// `timestamp` is appended as epoch milliseconds when present.
pub fn session_filename(
    session: &Session,
    format: ExportFormat,
    timestamp: Option<DateTime<Utc>>,
) -> String {
    let fallback = match format {
        ExportFormat::Markdown => MARKDOWN_FALLBACK,
        _ => DOCUMENT_FALLBACK,
    };
    let base = session
        .title_text()
        .map(sanitize)
        .map(|t| truncate_bytes(&t, MAX_TITLE_BYTES).trim_end().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| fallback.to_string());

    let mut name = format!("{}_{}", base, sanitize(session.id.prefix(ID_PREFIX_LEN)));
    if let Some(ts) = timestamp {
        name.push_str(&format!("_{}", ts.timestamp_millis()));
    }
    format!("{}.{}", name, format.file_extension())
}

/// Filename for a multi-session JSON snapshot
pub fn batch_filename(count: usize, timestamp: DateTime<Utc>) -> String {
    format!(
        "homework_batch_{}sessions_{}.{}",
        count,
        timestamp.timestamp_millis(),
        ExportFormat::Json.file_extension()
    )
}

/// Replace characters that are not allowed in filenames
pub fn sanitize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim_matches('.')
        .to_string()
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char
fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let end = (0..=max)
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0);
    &s[..end]
}
