//! # LogEmitter
//!
//! Builds [`LogRecord`]s and writes them to a [`LogSink`]. Constructed once
//! at start-up and cloned into every component that logs; clones share the
//! same sink.

use std::sync::Arc;

use at_core::LogSink;
use chrono::Utc;

use crate::record::{Fields, Level, LogRecord, TraceContext};

pub const DEFAULT_SERVICE: &str = "ascii-twitter-frontend";
pub const DEFAULT_VERSION: &str = "1.0.0";

#[derive(Clone)]
pub struct LogEmitter {
    service: Arc<str>,
    version: Arc<str>,
    sink: Arc<dyn LogSink>,
}

impl std::fmt::Debug for LogEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogEmitter")
            .field("service", &self.service)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl LogEmitter {
    pub fn new(service: &str, version: &str, sink: Arc<dyn LogSink>) -> Self {
        Self {
            service: service.into(),
            version: version.into(),
            sink,
        }
    }

    /// Emitter with the default service name and version.
    pub fn with_sink(sink: Arc<dyn LogSink>) -> Self {
        Self::new(DEFAULT_SERVICE, DEFAULT_VERSION, sink)
    }

    /// Emits a record with a fresh trace and span id.
    pub fn emit(&self, event_type: &str, message: &str, level: Level, fields: Fields) {
        self.emit_in(&TraceContext::generate(), event_type, message, level, fields);
    }

    /// Emits a record under a trace context supplied by the caller.
    pub fn emit_in(
        &self,
        trace: &TraceContext,
        event_type: &str,
        message: &str,
        level: Level,
        fields: Fields,
    ) {
        let record = self.record(trace.clone(), event_type, message, level, fields);
        self.sink.write_line(&record.to_line());
    }

    pub fn info(&self, event_type: &str, message: &str, fields: Fields) {
        self.emit(event_type, message, Level::Info, fields);
    }

    pub fn warn(&self, event_type: &str, message: &str, fields: Fields) {
        self.emit(event_type, message, Level::Warn, fields);
    }

    pub fn error(&self, event_type: &str, message: &str, fields: Fields) {
        self.emit(event_type, message, Level::Error, fields);
    }

    pub fn debug(&self, event_type: &str, message: &str, fields: Fields) {
        self.emit(event_type, message, Level::Debug, fields);
    }

    fn record(
        &self,
        trace: TraceContext,
        event_type: &str,
        message: &str,
        level: Level,
        fields: Fields,
    ) -> LogRecord {
        LogRecord {
            timestamp: Utc::now(),
            level,
            event_type: event_type.to_string(),
            message: message.to_string(),
            service: self.service.to_string(),
            version: self.version.to_string(),
            trace,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    #[test]
    fn emits_one_line_per_call_with_fresh_ids() {
        let sink = MemorySink::new();
        let log = LogEmitter::with_sink(Arc::new(sink.clone()));

        log.info("page_open", "opened", Fields::new().with("component", "HealthPanel"));
        log.error("page_error", "failed", Fields::new());

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["level"], "INFO");
        assert_eq!(records[0]["service"], DEFAULT_SERVICE);
        assert_eq!(records[0]["version"], DEFAULT_VERSION);
        assert_eq!(records[0]["component"], "HealthPanel");
        assert_eq!(records[1]["level"], "ERROR");
        assert_ne!(records[0]["trace_id"], records[1]["trace_id"]);
        assert_ne!(records[0]["span_id"], records[1]["span_id"]);
    }

    #[test]
    fn emit_in_propagates_trace_context() {
        let sink = MemorySink::new();
        let log = LogEmitter::new("svc", "9.9.9", Arc::new(sink.clone()));
        let ctx = TraceContext::generate();

        log.emit_in(&ctx, "a", "first", Level::Debug, Fields::new());
        log.emit_in(&ctx, "b", "second", Level::Debug, Fields::new());

        let records = sink.records();
        assert_eq!(records[0]["trace_id"], ctx.trace_id.as_str());
        assert_eq!(records[1]["span_id"], ctx.span_id.as_str());
        assert_eq!(records[1]["service"], "svc");
    }
}
