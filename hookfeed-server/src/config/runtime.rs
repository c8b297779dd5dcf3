//! Validated runtime configuration.

use axum::http::HeaderValue;
use std::net::SocketAddr;

/// Configuration after file, CLI and environment layers are merged.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub listen: SocketAddr,
    pub debug: bool,
    pub allowed_origins: AllowedOrigins,
    pub database_url: String,
    pub max_connections: u32,
}

/// Cross-origin policy for browser clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}
