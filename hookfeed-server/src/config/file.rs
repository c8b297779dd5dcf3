//! TOML file configuration structures.
//!
//! These structs directly map to the `hookfeed.toml` file format. Every
//! field has a default, so an absent file is equivalent to an empty one.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:5000").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
    /// Verbose logging.
    #[serde(default)]
    pub debug: bool,
    /// Origins allowed to call the API from a browser. Empty means any.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            debug: false,
            allowed_origins: Vec::new(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

/// Database configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Size of the connection pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "postgres://localhost:5432/github_events".to_string()
}

fn default_max_connections() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"
debug = true
allowed_origins = ["https://dashboard.example.com"]

[database]
url = "postgres://hookfeed@db/hookfeed"
max_connections = 4
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert!(config.server.debug);
        assert_eq!(config.server.allowed_origins.len(), 1);
        assert_eq!(config.database.url, "postgres://hookfeed@db/hookfeed");
        assert_eq!(config.database.max_connections, 4);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.listen.port(), 5000);
        assert!(!config.server.debug);
        assert!(config.server.allowed_origins.is_empty());
        assert_eq!(
            config.database.url,
            "postgres://localhost:5432/github_events"
        );
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let config: FileConfig = toml::from_str("[server]\ndebug = true\n").unwrap();
        assert!(config.server.debug);
        assert_eq!(config.server.listen.port(), 5000);
    }
}
