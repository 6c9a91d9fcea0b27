//! # ascii-twitter
//!
//! Headless driver for the client: loads configuration, wires the transport
//! selected at compile time and the trace exporter, and opens the timeline,
//! health and pod panels once against the configured backend.

use std::sync::Arc;

use anyhow::Context;
use at_api::ApiClient;
use at_config::{AppConfig, SinkKind};
use at_core::{HttpTransport, LogSink};
use at_telemetry::{flush, init_subscriber, otlp_provider, LogEmitter, StdoutSink, TracingSink};
use at_ui::{HealthPanel, PodInfoPanel, TimelinePage};

#[cfg(feature = "transport-reqwest")]
use at_transport_reqwest::ReqwestTransport;

#[cfg(not(feature = "transport-reqwest"))]
compile_error!("enable a transport feature, e.g. `transport-reqwest`");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::load().context("loading configuration")?;
    let traces = if cfg.export_traces {
        let provider =
            otlp_provider(&cfg.trace_collector_url, &cfg.service_name, &cfg.service_version)
                .context("building trace exporter")?;
        Some(provider)
    } else {
        None
    };
    init_subscriber(&cfg.log.filter, cfg.log.json, traces.as_ref())
        .context("installing tracing subscriber")?;

    let sink: Arc<dyn LogSink> = match cfg.log.sink {
        SinkKind::Stdout => Arc::new(StdoutSink),
        SinkKind::Tracing => Arc::new(TracingSink),
    };
    let log = LogEmitter::new(&cfg.service_name, &cfg.service_version, sink);

    #[cfg(feature = "transport-reqwest")]
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new());

    tracing::info!(
        environment = cfg.environment.as_str(),
        api = %cfg.api_base_url,
        collector = %cfg.trace_collector_url,
        export_traces = cfg.export_traces,
        production = cfg.production,
        "ascii-twitter starting"
    );

    let client = ApiClient::new(&cfg.api_base_url, transport, log.clone());

    let mut page = TimelinePage::new();
    let mut health = HealthPanel::new();
    let mut pod = PodInfoPanel::new();
    health.log_opened(&log, cfg.environment.as_str(), &cfg.service_version);

    tokio::join!(
        page.load(&client),
        health.check(&client, &log),
        pod.load(&client),
    );

    tracing::info!(
        entries = page.timeline.len(),
        timeline_error = page.timeline.error().unwrap_or("-"),
        backend_healthy = health.snapshot.as_ref().is_some_and(|s| s.is_healthy()),
        pod = pod.info.as_ref().map(|p| p.pod_name.as_str()).unwrap_or("-"),
        "initial load finished"
    );

    if let Some(provider) = &traces {
        flush(provider);
    }

    Ok(())
}
