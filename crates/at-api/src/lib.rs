//! # at-api
//!
//! The HTTP orchestration layer of the ascii-twitter client: request
//! logging, backend wire adapters, and the typed API client.

pub mod client;
pub mod middleware;
mod wire;

pub use client::ApiClient;
pub use middleware::{sanitize_headers, LoggingTransport};
