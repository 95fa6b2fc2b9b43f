//! Session renderers
//!
//! One [`Exporter`] per output format, all consuming the same normalized
//! [`SessionExport`]:
//! - JSON snapshot (single object or batch array)
//! - Markdown narrative
//! - Word document (Office Open XML, with embedded attachments)
//! - Plain text, standing in for PDF
//!
//! # Example
//!
//! ```ignore
//! use hw_core::export::{Exporter, MarkdownExporter, RenderContext, SessionExport};
//!
//! let exporter = MarkdownExporter::new(RenderContext::utc(Utc::now()));
//! let payload = exporter.export(&SessionExport::new(session, messages))?;
//! ```

mod docx;
mod exporter;
mod json;
mod markdown;
mod plaintext;

pub use docx::{DocumentBuilder, DocxExporter, IMAGE_HEIGHT_PX, IMAGE_WIDTH_PX};
pub use exporter::{Exporter, RenderContext, SessionExport, TimeZoneSetting, TIMESTAMP_FORMAT};
pub use json::{JsonExporter, SessionRecord};
pub use markdown::MarkdownExporter;
pub use plaintext::PlainTextExporter;
