//! Internal events for autoloader metrics emission.
//!
//! Each event struct represents a measurable occurrence while configuring or
//! launching a reader.

use metrics::counter;
use tracing::trace;

/// Trait for internal events that can be emitted as metrics.
pub trait InternalEvent {
    /// Emit this event as a metric.
    fn emit(self);
}

/// Where a reader's schema came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaSource {
    /// Inline structured schema.
    Explicit,
    /// Loaded from a JSON schema file.
    File,
    /// Left to the engine to infer.
    Inferred,
}

impl SchemaSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaSource::Explicit => "explicit",
            SchemaSource::File => "file",
            SchemaSource::Inferred => "inferred",
        }
    }
}

/// Event emitted when a schema descriptor has been resolved.
pub struct SchemaResolved {
    pub source: SchemaSource,
}

impl InternalEvent for SchemaResolved {
    fn emit(self) {
        trace!(source = self.source.as_str(), "Schema resolved");
        counter!("autoloader_schema_resolved_total", "source" => self.source.as_str()).increment(1);
    }
}

/// Event emitted when an auto loader passes validation.
pub struct ReaderConfigured {
    /// Canonical format name.
    pub format: String,
}

impl InternalEvent for ReaderConfigured {
    fn emit(self) {
        trace!(format = %self.format, "Reader configured");
        counter!("autoloader_readers_configured_total", "format" => self.format).increment(1);
    }
}

/// Event emitted when a read request has been issued to the engine.
pub struct ReadStarted {
    pub format: String,
}

impl InternalEvent for ReadStarted {
    fn emit(self) {
        trace!(format = %self.format, "Read started");
        counter!("autoloader_reads_started_total", "format" => self.format).increment(1);
    }
}

/// Event emitted when the engine rejects a read request.
pub struct ReadFailed {
    pub format: String,
}

impl InternalEvent for ReadFailed {
    fn emit(self) {
        trace!(format = %self.format, "Read failed");
        counter!("autoloader_reads_failed_total", "format" => self.format).increment(1);
    }
}
