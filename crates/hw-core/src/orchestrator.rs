//! Export entry point
//!
//! Loads the requested sessions, enforces per-format cardinality, runs the
//! matching renderer and hands artifacts to the sink. Sessions are handled one
//! at a time in the loaded order; nothing is rendered in parallel.

use crate::config::ExportConfig;
use crate::emit::{self, naming, Clock, ExportArtifact, PacedEmitter, Sink, SystemClock};
use crate::error::{HwError, Result};
use crate::export::{
    DocxExporter, Exporter, JsonExporter, MarkdownExporter, PlainTextExporter, RenderContext,
    SessionExport, SessionRecord,
};
use crate::fetch::ImageFetcher;
use crate::normalize::normalize;
use crate::session::{Session, SessionStore};
use crate::types::{ExportFormat, SessionId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a successful export call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    /// Always true for a returned summary
    pub success: bool,
    /// Number of sessions processed
    pub count: usize,
    /// Format used
    pub format: ExportFormat,
}

/// Coordinates loading, rendering and delivery of session exports
pub struct ExportOrchestrator {
    store: Arc<dyn SessionStore>,
    fetcher: Arc<dyn ImageFetcher>,
    clock: Arc<dyn Clock>,
    config: ExportConfig,
}

impl ExportOrchestrator {
    /// Create an orchestrator with the system clock and default settings
    pub fn new(store: Arc<dyn SessionStore>, fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            store,
            fetcher,
            clock: Arc::new(SystemClock),
            config: ExportConfig::default(),
        }
    }

    /// Use a different clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use different export settings
    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    /// Export the given sessions in `format`, writing artifacts to `sink`
    pub fn export_sessions(
        &self,
        ids: &[SessionId],
        format: ExportFormat,
        sink: &mut dyn Sink,
    ) -> Result<ExportSummary> {
        let sessions = self.load_sessions(ids)?;
        let count = sessions.len();

        if format.is_single_session() && count > 1 {
            return Err(HwError::UnsupportedBatch {
                format: format.to_string(),
                count,
            });
        }

        info!("Exporting {} session(s) as {}", count, format);
        let context = self.render_context();

        match format {
            ExportFormat::Json => self.export_json(sessions, sink)?,
            ExportFormat::Markdown if count > 1 => {
                self.export_markdown_batch(sessions, &context, sink)?
            }
            _ => self.export_single(sessions, format, &context, sink)?,
        }

        info!("Export finished: {} session(s) as {}", count, format);
        Ok(ExportSummary {
            success: true,
            count,
            format,
        })
    }

    /// Load matching sessions, newest first
    fn load_sessions(&self, ids: &[SessionId]) -> Result<Vec<Session>> {
        if ids.is_empty() {
            return Err(HwError::NotFound("no session ids given".to_string()));
        }

        let mut seen = HashSet::new();
        let unique: Vec<SessionId> = ids
            .iter()
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect();

        let mut sessions = self.store.get_sessions(&unique)?;
        if sessions.is_empty() {
            let requested: Vec<&str> = unique.iter().map(SessionId::as_str).collect();
            return Err(HwError::NotFound(requested.join(", ")));
        }

        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    /// Load and normalize one session's messages
    fn load_export(&self, session: Session) -> Result<SessionExport> {
        let messages = self.store.get_messages(&session.id)?;
        debug!("Loaded {} message(s) for {}", messages.len(), session.id);
        Ok(SessionExport::new(session, normalize(&messages)))
    }

    fn render_context(&self) -> RenderContext {
        RenderContext::with_offset_minutes(
            self.config.utc_offset_minutes,
            self.clock.now(),
            self.config.product_name.clone(),
        )
    }

    fn exporter(&self, format: ExportFormat, context: &RenderContext) -> Box<dyn Exporter + '_> {
        match format {
            ExportFormat::Json => Box::new(JsonExporter::new()),
            ExportFormat::Markdown => Box::new(MarkdownExporter::new(context.clone())),
            ExportFormat::Word => {
                Box::new(DocxExporter::new(context.clone(), self.fetcher.as_ref()))
            }
            ExportFormat::Plaintext => Box::new(PlainTextExporter::new(context.clone())),
        }
    }

    fn export_json(&self, sessions: Vec<Session>, sink: &mut dyn Sink) -> Result<()> {
        let exporter = JsonExporter::new();
        let count = sessions.len();
        let now = self.clock.now();

        let mut filename = naming::batch_filename(count, now);
        let mut records = Vec::with_capacity(count);
        for session in sessions {
            let export = self.load_export(session)?;
            if count == 1 {
                filename = naming::session_filename(&export.session, ExportFormat::Json, Some(now));
            }
            records.push(SessionRecord::from_export(&export));
        }

        let payload = match records.as_slice() {
            [record] => exporter.export_record(record)?,
            _ => exporter.export_batch(&records)?,
        };

        let artifact = ExportArtifact::new(payload, filename, ExportFormat::Json.mime_type());
        emit::emit(sink, &artifact)
    }

    fn export_markdown_batch(
        &self,
        sessions: Vec<Session>,
        context: &RenderContext,
        sink: &mut dyn Sink,
    ) -> Result<()> {
        let exporter = self.exporter(ExportFormat::Markdown, context);
        let mut emitter = PacedEmitter::new(sink, self.clock.as_ref(), self.config.pace_interval());

        for session in sessions {
            let export = self.load_export(session)?;
            let payload = exporter.export(&export)?;
            emitter.emit_stamped(|now| {
                ExportArtifact::new(
                    payload,
                    naming::session_filename(&export.session, ExportFormat::Markdown, Some(now)),
                    ExportFormat::Markdown.mime_type(),
                )
            })?;
        }

        debug!("Delivered {} paced artifact(s)", emitter.emitted());
        Ok(())
    }

    fn export_single(
        &self,
        sessions: Vec<Session>,
        format: ExportFormat,
        context: &RenderContext,
        sink: &mut dyn Sink,
    ) -> Result<()> {
        let Some(session) = sessions.into_iter().next() else {
            return Err(HwError::NotFound("no session to export".to_string()));
        };

        let export = self.load_export(session)?;
        let payload = self.exporter(format, context).export(&export)?;

        let stamp = match format {
            ExportFormat::Markdown => None,
            _ => Some(self.clock.now()),
        };
        let filename = naming::session_filename(&export.session, format, stamp);

        let artifact = ExportArtifact::new(payload, filename, format.mime_type());
        emit::emit(sink, &artifact)
    }
}
