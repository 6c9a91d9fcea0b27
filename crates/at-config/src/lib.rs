//! # at-config
//!
//! Per-environment settings for the ascii-twitter client.
//!
//! Layers, lowest first: profile defaults for the selected environment, an
//! optional `config/ascii-twitter.{toml,yaml,json}` file, then
//! `ASCII_TWITTER__*` environment variables (`__` separates nested keys,
//! e.g. `ASCII_TWITTER__LOG__FILTER=debug`).

use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub const ENV_PREFIX: &str = "ASCII_TWITTER";
pub const ENV_SEPARATOR: &str = "__";
pub const ENVIRONMENT_VAR: &str = "ASCII_TWITTER__ENVIRONMENT";
pub const CONFIG_FILE: &str = "config/ascii-twitter";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("unknown environment {0:?} (expected local, compose or cluster)")]
    UnknownEnvironment(String),

    #[error("{key} must be an absolute http(s) URL, got {value:?}")]
    InvalidUrl { key: &'static str, value: String },
}

/// Deployment profile. Names are matched case-insensitively in every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Developer machine, backend on localhost.
    #[default]
    Local,
    /// docker compose network.
    Compose,
    /// Kubernetes cluster.
    Cluster,
}

impl Environment {
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "compose" => Ok(Environment::Compose),
            "cluster" => Ok(Environment::Cluster),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Compose => "compose",
            Environment::Cluster => "cluster",
        }
    }

    fn api_base_url(&self) -> &'static str {
        match self {
            Environment::Local => "http://localhost:8000",
            Environment::Compose => "http://backend:8000",
            Environment::Cluster => "http://backend-service.bqnq.svc.cluster.local",
        }
    }

    fn trace_collector_url(&self) -> &'static str {
        match self {
            Environment::Local | Environment::Compose => "http://backend:4318/v1/traces",
            Environment::Cluster => {
                "http://datadog-agent.monitoring.svc.cluster.local:4318/v1/traces"
            }
        }
    }

    fn production(&self) -> bool {
        matches!(self, Environment::Cluster)
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Environment::from_name(&name).map_err(de::Error::custom)
    }
}

/// Where structured records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Stdout,
    Tracing,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directives, e.g. `info,at_api=debug`.
    pub filter: String,
    pub json: bool,
    pub sink: SinkKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api_base_url: String,
    pub trace_collector_url: String,
    /// Ship `tracing` spans to `trace_collector_url` over OTLP/HTTP.
    pub export_traces: bool,
    pub production: bool,
    pub service_name: String,
    pub service_version: String,
    pub log: LogSettings,
}

impl AppConfig {
    /// Loads `.env`, picks the profile from `ASCII_TWITTER__ENVIRONMENT`,
    /// and applies the file and environment layers on top of it.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let environment = match std::env::var(ENVIRONMENT_VAR) {
            Ok(name) => Environment::from_name(&name)?,
            Err(_) => Environment::default(),
        };

        let builder = Self::defaults(environment)?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            );
        Self::from_builder(builder)
    }

    /// Profile defaults as the lowest configuration layer.
    pub fn defaults(environment: Environment) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(config::Config::builder()
            .set_default("environment", environment.as_str())?
            .set_default("api_base_url", environment.api_base_url())?
            .set_default("trace_collector_url", environment.trace_collector_url())?
            .set_default("export_traces", true)?
            .set_default("production", environment.production())?
            .set_default("service_name", "ascii-twitter-frontend")?
            .set_default("service_version", "1.0.0")?
            .set_default("log.filter", "info")?
            .set_default("log.json", true)?
            .set_default("log.sink", "stdout")?)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let mut cfg: AppConfig = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        tracing::debug!(
            environment = cfg.environment.as_str(),
            api_base_url = %cfg.api_base_url,
            "configuration loaded"
        );
        Ok(cfg)
    }

    fn validate(&mut self) -> Result<(), ConfigError> {
        check_url("api_base_url", &self.api_base_url)?;
        check_url("trace_collector_url", &self.trace_collector_url)?;
        let trimmed = self.api_base_url.trim_end_matches('/').len();
        self.api_base_url.truncate(trimmed);
        Ok(())
    }
}

fn check_url(key: &'static str, value: &str) -> Result<(), ConfigError> {
    let rest = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            key,
            value: value.to_string(),
        }),
    }
}
