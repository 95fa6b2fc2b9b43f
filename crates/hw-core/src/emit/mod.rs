//! Artifact delivery
//!
//! Renderers produce [`Payload`]s; this module names them, writes them to a
//! [`Sink`] and, for multi-file exports, staggers consecutive writes through
//! a [`PacedEmitter`].

mod clock;
pub mod naming;
mod sink;

pub use clock::{Clock, ManualClock, SystemClock};
pub use sink::{DirectorySink, ExportArtifact, MemorySink, Payload, Sink};

use crate::error::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

/// Write a single artifact to the sink
pub fn emit(sink: &mut dyn Sink, artifact: &ExportArtifact) -> Result<()> {
    debug!(
        "Emitting {} ({}, {} bytes)",
        artifact.filename,
        artifact.mime_type,
        artifact.payload.len()
    );
    sink.write(&artifact.payload, &artifact.filename, &artifact.mime_type)
}

/// Rate-limited emission queue
///
/// The first artifact goes out immediately; every following one waits
/// `interval` on the clock first. Artifacts already written stay written
/// when a later one fails.
pub struct PacedEmitter<'a> {
    sink: &'a mut dyn Sink,
    clock: &'a dyn Clock,
    interval: Duration,
    emitted: usize,
}

impl<'a> PacedEmitter<'a> {
    /// Create an emitter over `sink`
    pub fn new(sink: &'a mut dyn Sink, clock: &'a dyn Clock, interval: Duration) -> Self {
        Self {
            sink,
            clock,
            interval,
            emitted: 0,
        }
    }

    /// Deliver the next artifact, pausing first if one was already delivered
    pub fn emit(&mut self, artifact: &ExportArtifact) -> Result<()> {
        self.wait_turn();
        emit(self.sink, artifact)?;
        self.emitted += 1;
        Ok(())
    }

    /// Like [`PacedEmitter::emit`], building the artifact after the pause
    /// with the clock's current time
    pub fn emit_stamped<F>(&mut self, build: F) -> Result<()>
    where
        F: FnOnce(DateTime<Utc>) -> ExportArtifact,
    {
        self.wait_turn();
        let artifact = build(self.clock.now());
        emit(self.sink, &artifact)?;
        self.emitted += 1;
        Ok(())
    }

    fn wait_turn(&self) {
        if self.emitted > 0 && !self.interval.is_zero() {
            debug!("Pacing next artifact by {:?}", self.interval);
            self.clock.sleep(self.interval);
        }
    }

    /// Number of artifacts delivered
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn artifact(name: &str) -> ExportArtifact {
        ExportArtifact::new(Payload::Text(name.to_string()), name, "text/markdown")
    }

    #[test]
    fn test_paced_emitter_sleeps_between_artifacts() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 11, 10, 30, 0).unwrap());
        let mut sink = MemorySink::new();

        {
            let mut emitter =
                PacedEmitter::new(&mut sink, &clock, Duration::from_millis(500));
            emitter.emit(&artifact("a.md")).unwrap();
            emitter.emit(&artifact("b.md")).unwrap();
            emitter.emit(&artifact("c.md")).unwrap();
            assert_eq!(emitter.emitted(), 3);
        }

        assert_eq!(clock.sleeps(), vec![Duration::from_millis(500); 2]);
        let names: Vec<_> = sink.artifacts().iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["a.md", "b.md", "c.md"]);
    }

    #[test]
    fn test_emit_stamped_uses_time_after_pause() {
        let start = Utc.with_ymd_and_hms(2026, 1, 11, 10, 30, 0).unwrap();
        let clock = ManualClock::new(start);
        let mut sink = MemorySink::new();

        {
            let mut emitter =
                PacedEmitter::new(&mut sink, &clock, Duration::from_millis(500));
            for _ in 0..2 {
                emitter
                    .emit_stamped(|now| artifact(&format!("{}.md", now.timestamp_millis())))
                    .unwrap();
            }
        }

        let first = start.timestamp_millis();
        let names: Vec<_> = sink.artifacts().iter().map(|a| a.filename.clone()).collect();
        assert_eq!(
            names,
            vec![format!("{}.md", first), format!("{}.md", first + 500)]
        );
    }

    #[test]
    fn test_single_artifact_is_not_paced() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 11, 10, 30, 0).unwrap());
        let mut sink = MemorySink::new();

        let mut emitter = PacedEmitter::new(&mut sink, &clock, Duration::from_millis(500));
        emitter.emit(&artifact("a.md")).unwrap();

        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn test_failed_write_keeps_earlier_artifacts() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 11, 10, 30, 0).unwrap());
        let mut sink = MemorySink::failing_after(1);

        {
            let mut emitter =
                PacedEmitter::new(&mut sink, &clock, Duration::from_millis(500));
            emitter.emit(&artifact("a.md")).unwrap();
            assert!(emitter.emit(&artifact("b.md")).is_err());
            assert_eq!(emitter.emitted(), 1);
        }

        assert_eq!(sink.artifacts().len(), 1);
    }
}
