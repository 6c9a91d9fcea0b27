//! # at-telemetry
//!
//! Structured, single-line diagnostic records for the ascii-twitter
//! client, plus the `tracing` subscriber the binary installs and the
//! OTLP trace export behind it.
//!
//! ```ignore
//! let log = LogEmitter::with_sink(Arc::new(StdoutSink));
//! log.info("page_open", "Timeline opened", Fields::new().with("entries", &12));
//! ```

pub mod emitter;
pub mod export;
pub mod ids;
pub mod record;
pub mod sink;
pub mod subscriber;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use emitter::{LogEmitter, DEFAULT_SERVICE, DEFAULT_VERSION};
pub use export::{flush, otlp_provider, provider_with_exporter, trace_layer, TRACER_NAME};
pub use record::{Fields, Level, LogRecord, TraceContext, UNSERIALIZABLE};
pub use sink::{MemorySink, StdoutSink, TracingSink, RECORD_TARGET};
pub use subscriber::{init_subscriber, TelemetryError};
