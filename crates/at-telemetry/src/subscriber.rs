//! Process-wide `tracing` subscriber set-up.

use opentelemetry_sdk::trace::TracerProvider;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::export::trace_layer;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("invalid log filter {filter:?}: {reason}")]
    Filter { filter: String, reason: String },

    #[error("tracing subscriber already installed: {0}")]
    Install(String),

    #[error("trace exporter: {0}")]
    Export(String),
}

/// Installs the global subscriber. `RUST_LOG` wins over `filter` when set.
/// `json = true` writes one JSON object per event. With a `provider`,
/// closed spans are also exported through it.
pub fn init_subscriber(
    filter: &str,
    json: bool,
    provider: Option<&TracerProvider>,
) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(filter).map_err(|e| TelemetryError::Filter {
            filter: filter.to_string(),
            reason: e.to_string(),
        })?,
    };

    let fmt = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().compact().boxed()
    };

    tracing_subscriber::registry()
        .with(fmt)
        .with(provider.map(trace_layer))
        .with(env_filter)
        .try_init()
        .map_err(|e| TelemetryError::Install(e.to_string()))
}
