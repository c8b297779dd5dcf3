//! Configuration module for hookfeed-server.
//!
//! Handles loading configuration from an optional TOML file, then applies
//! CLI arguments and environment variables on top.

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::{AllowedOrigins, RuntimeConfig};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up when no path is given explicitly.
pub const DEFAULT_CONFIG_PATH: &str = "./hookfeed.toml";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Values from the command line or environment that win over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub listen: Option<SocketAddr>,
    pub port: Option<u16>,
    pub debug: bool,
    pub allowed_origins: Option<Vec<String>>,
    pub database_url: Option<String>,
}

/// Where the loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
}

impl ConfigLoader {
    /// Create a new config loader.
    ///
    /// An explicit `config_path` must exist. Without one,
    /// [`DEFAULT_CONFIG_PATH`] is read if present and defaults are used
    /// otherwise.
    pub fn new(config_path: Option<impl AsRef<Path>>, overrides: ConfigOverrides) -> Self {
        Self {
            config_path: config_path.map(|p| p.as_ref().to_path_buf()),
            overrides,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file (if any)
    /// 2. Apply CLI / environment overrides
    /// 3. Validate and build the runtime configuration
    pub fn load(&self) -> Result<(RuntimeConfig, ConfigSource), ConfigError> {
        let (mut file_config, source) = self.read_file()?;
        self.apply_overrides(&mut file_config);
        let config = build_runtime_config(file_config)?;
        Ok((config, source))
    }

    fn read_file(&self) -> Result<(FileConfig, ConfigSource), ConfigError> {
        let (path, required) = match &self.config_path {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => Ok((toml::from_str(&content)?, ConfigSource::File(path))),
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                Ok((FileConfig::default(), ConfigSource::Defaults))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn apply_overrides(&self, config: &mut FileConfig) {
        let overrides = &self.overrides;
        if let Some(listen) = overrides.listen {
            config.server.listen = listen;
        }
        if let Some(port) = overrides.port {
            config.server.listen.set_port(port);
        }
        if overrides.debug {
            config.server.debug = true;
        }
        if let Some(origins) = &overrides.allowed_origins {
            config.server.allowed_origins = origins.clone();
        }
        if let Some(url) = &overrides.database_url {
            config.database.url = url.clone();
        }
    }
}

fn build_runtime_config(file_config: FileConfig) -> Result<RuntimeConfig, ConfigError> {
    if file_config.database.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "database.max_connections must be at least 1".to_string(),
        ));
    }
    if file_config.database.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "database.url must not be empty".to_string(),
        ));
    }

    Ok(RuntimeConfig {
        listen: file_config.server.listen,
        debug: file_config.server.debug,
        allowed_origins: parse_origins(&file_config.server.allowed_origins)?,
        database_url: file_config.database.url,
        max_connections: file_config.database.max_connections,
    })
}

/// An empty list or a `*` entry allows any origin.
fn parse_origins(origins: &[String]) -> Result<AllowedOrigins, ConfigError> {
    let origins: Vec<&str> = origins
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .collect();

    if origins.is_empty() || origins.contains(&"*") {
        return Ok(AllowedOrigins::Any);
    }

    origins
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| {
                ConfigError::ValidationError(format!("invalid allowed origin: {origin}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(AllowedOrigins::List)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader(overrides: ConfigOverrides) -> ConfigLoader {
        ConfigLoader::new(None::<PathBuf>, overrides)
    }

    #[test]
    fn test_defaults_without_file() {
        let loader = loader(ConfigOverrides::default());
        let mut config = FileConfig::default();
        loader.apply_overrides(&mut config);
        let runtime = build_runtime_config(config).unwrap();
        assert_eq!(runtime.listen.port(), 5000);
        assert!(!runtime.debug);
        assert_eq!(runtime.allowed_origins, AllowedOrigins::Any);
        assert_eq!(runtime.max_connections, 10);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let loader = loader(ConfigOverrides {
            listen: Some("127.0.0.1:8080".parse().unwrap()),
            port: Some(9000),
            debug: true,
            allowed_origins: Some(vec!["https://a.example.com".to_string()]),
            database_url: Some("postgres://override/db".to_string()),
        });
        let mut config = FileConfig::default();
        loader.apply_overrides(&mut config);
        let runtime = build_runtime_config(config).unwrap();
        assert_eq!(runtime.listen, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert!(runtime.debug);
        assert_eq!(
            runtime.allowed_origins,
            AllowedOrigins::List(vec![HeaderValue::from_static("https://a.example.com")])
        );
        assert_eq!(runtime.database_url, "postgres://override/db");
    }

    #[test]
    fn test_wildcard_origin_means_any() {
        let origins = vec!["https://a.example.com".to_string(), "*".to_string()];
        assert_eq!(parse_origins(&origins).unwrap(), AllowedOrigins::Any);
        assert_eq!(parse_origins(&[" ".to_string()]).unwrap(), AllowedOrigins::Any);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            parse_origins(&["bad\norigin".to_string()]),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = FileConfig::default();
        config.database.max_connections = 0;
        assert!(matches!(
            build_runtime_config(config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let loader = ConfigLoader::new(
            Some("/nonexistent/hookfeed.toml"),
            ConfigOverrides::default(),
        );
        assert!(matches!(loader.load(), Err(ConfigError::IoError(_))));
    }
}
