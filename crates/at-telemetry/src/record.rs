//! Structured log records and their single-line JSON form.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids;

/// Stand-in for a field value that could not be serialized.
pub const UNSERIALIZABLE: &str = "[unserializable]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trace and span ids attached to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: String,
    pub span_id: String,
}

impl TraceContext {
    pub fn generate() -> Self {
        Self {
            trace_id: ids::trace_id(),
            span_id: ids::span_id(),
        }
    }
}

/// Extra key/value context for a record.
///
/// Values go through serde; one that fails to serialize becomes
/// [`UNSERIALIZABLE`] instead of taking the whole record down.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Map<String, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|_| Value::String(UNSERIALIZABLE.to_string()));
        self.0.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Fields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One diagnostic event. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub event_type: String,
    pub message: String,
    pub service: String,
    pub version: String,
    pub trace: TraceContext,
    pub fields: Fields,
}

impl LogRecord {
    /// Base keys first, then the extra fields flattened into the same
    /// object. A field named like a base key replaces the base value.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(
            "timestamp".into(),
            Value::String(self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        obj.insert("level".into(), Value::String(self.level.as_str().into()));
        obj.insert("event_type".into(), Value::String(self.event_type.clone()));
        obj.insert("message".into(), Value::String(self.message.clone()));
        obj.insert("service".into(), Value::String(self.service.clone()));
        obj.insert("version".into(), Value::String(self.version.clone()));
        obj.insert("trace_id".into(), Value::String(self.trace.trace_id.clone()));
        obj.insert("span_id".into(), Value::String(self.trace.span_id.clone()));
        for (k, v) in &self.fields.0 {
            obj.insert(k.clone(), v.clone());
        }
        Value::Object(obj)
    }

    pub fn to_line(&self) -> String {
        self.to_json().to_string()
    }
}
