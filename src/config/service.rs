//! Typed service configuration, built from merged layers and validated.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml::Value;
use uuid::Uuid;

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;

/// Query string appended to the server URL for `serviceInstance`.
const GET_CAPABILITIES_QUERY: &str = "?service=WPS&request=GetCapabilities";

/// Merged and validated service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
}

/// `[server]` section
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Public base URL of the WPS endpoint
    pub url: String,

    /// Socket address the daemon binds to
    pub bind: String,

    /// `xml:lang` value stamped on response documents
    pub language: String,
}

/// `[store]` section
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Directory status documents are written to (`<run_id>.xml`)
    pub output_path: PathBuf,

    /// Public base URL the status documents are served under
    pub output_url: String,

    /// Delete run workdirs once a terminal status is stored
    pub cleanup: bool,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// The slice of configuration the response builder depends on.
///
/// Injected explicitly so the builder never consults a global lookup.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    /// Full `serviceInstance` attribute value
    pub service_instance: String,

    /// `xml:lang` attribute value
    pub language: String,

    /// Delete run workdirs once a terminal status is delivered
    pub cleanup: bool,
}

impl ServiceConfig {
    /// Build configuration from layers: defaults, optional file, CLI overrides.
    pub fn load(file: Option<&Path>, cli_overrides: Option<Value>) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::to_value()];

        if let Some(path) = file {
            layers.push(Self::load_toml_file(path)?);
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
        }

        let merged = merge_layers(layers);
        let config: ServiceConfig = merged
            .try_into()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn load_toml_file(path: &Path) -> Result<Value, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.server.url) {
            return Err(ConfigError::ValidationError(format!(
                "server.url must be an http(s) URL, got {:?}",
                self.server.url
            )));
        }

        if !is_http_url(&self.store.output_url) {
            return Err(ConfigError::ValidationError(format!(
                "store.output_url must be an http(s) URL, got {:?}",
                self.store.output_url
            )));
        }

        if self.store.output_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "store.output_path must not be empty".to_string(),
            ));
        }

        self.bind_addr()?;
        Ok(())
    }

    /// Parsed bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind.parse().map_err(|_| {
            ConfigError::ValidationError(format!(
                "server.bind must be a socket address, got {:?}",
                self.server.bind
            ))
        })
    }

    /// On-disk status document path for a run.
    pub fn status_location(&self, run_id: &Uuid) -> PathBuf {
        self.store.output_path.join(format!("{}.xml", run_id))
    }

    /// Public URL of a run's status document.
    pub fn status_url(&self, run_id: &Uuid) -> String {
        format!(
            "{}/{}.xml",
            self.store.output_url.trim_end_matches('/'),
            run_id
        )
    }

    /// The `serviceInstance` attribute value.
    pub fn service_instance(&self) -> String {
        format!("{}{}", self.server.url, GET_CAPABILITIES_QUERY)
    }

    /// Context injected into response builders.
    pub fn context(&self) -> ServiceContext {
        ServiceContext {
            service_instance: self.service_instance(),
            language: self.server.language.clone(),
            cleanup: self.store.cleanup,
        }
    }
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"));
    matches!(rest, Some(rest) if !rest.is_empty())
}
