//! OTLP/HTTP trace export.
//!
//! Spans recorded through `tracing` are bridged to OpenTelemetry by
//! [`trace_layer`] and shipped in batches to the configured collector.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::export::trace::SpanExporter;
use opentelemetry_sdk::trace::{self, Tracer, TracerProvider};
use opentelemetry_sdk::{runtime, Resource};
use tracing::Subscriber;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::registry::LookupSpan;

use crate::subscriber::TelemetryError;

/// Instrumentation scope of every exported span.
pub const TRACER_NAME: &str = "ascii-twitter";

/// Signal path the OTLP/HTTP exporter appends to its endpoint.
const TRACES_PATH: &str = "/v1/traces";

/// Provider that batches spans to `collector_url` over OTLP/HTTP
/// (protobuf). Must be called from inside a tokio runtime.
pub fn otlp_provider(
    collector_url: &str,
    service: &str,
    version: &str,
) -> Result<TracerProvider, TelemetryError> {
    let exporter = opentelemetry_otlp::new_exporter()
        .http()
        .with_endpoint(collector_base(collector_url))
        .build_span_exporter()
        .map_err(|e| TelemetryError::Export(e.to_string()))?;

    tracing::debug!(collector = collector_url, "trace export enabled");
    Ok(TracerProvider::builder()
        .with_config(trace::config().with_resource(resource(service, version)))
        .with_batch_exporter(exporter, runtime::Tokio)
        .build())
}

/// Provider that hands every finished span straight to `exporter`.
pub fn provider_with_exporter<E>(exporter: E, service: &str, version: &str) -> TracerProvider
where
    E: SpanExporter + 'static,
{
    TracerProvider::builder()
        .with_config(trace::config().with_resource(resource(service, version)))
        .with_simple_exporter(exporter)
        .build()
}

/// `tracing` layer feeding closed spans into `provider`.
pub fn trace_layer<S>(provider: &TracerProvider) -> OpenTelemetryLayer<S, Tracer>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    tracing_opentelemetry::layer().with_tracer(provider.tracer(TRACER_NAME))
}

/// Flushes pending batches; failures are reported, not returned.
pub fn flush(provider: &TracerProvider) {
    for result in provider.force_flush() {
        if let Err(err) = result {
            tracing::warn!(error = %err, "trace flush failed");
        }
    }
}

fn resource(service: &str, version: &str) -> Resource {
    Resource::new(vec![
        KeyValue::new("service.name", service.to_string()),
        KeyValue::new("service.version", version.to_string()),
    ])
}

// The configured URL names the full traces endpoint.
fn collector_base(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    trimmed
        .strip_suffix(TRACES_PATH)
        .unwrap_or(trimmed)
        .to_string()
}
