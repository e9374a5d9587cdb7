//! Exporter configuration.
//!
//! [`Options`] is what the collectors see; the rest of [`FileConfig`] is
//! consumed by the binary when wiring stores and the scrape server.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Options passed to every collector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Namespaces to collect from. Empty means all namespaces.
    pub namespaces: Vec<String>,
    /// If non-empty, only these families are emitted.
    pub metric_allowlist: Vec<String>,
    /// Families never emitted.
    pub metric_denylist: Vec<String>,
}

impl Options {
    /// Returns true if the family should be emitted.
    pub fn family_enabled(&self, name: &str) -> bool {
        if !self.metric_allowlist.is_empty() {
            return self.metric_allowlist.iter().any(|n| n == name);
        }
        !self.metric_denylist.iter().any(|n| n == name)
    }

    /// Returns true if resources in `namespace` should be collected.
    pub fn namespace_enabled(&self, namespace: &str) -> bool {
        self.namespaces.is_empty() || self.namespaces.iter().any(|n| n == namespace)
    }

    /// Validates the options.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.metric_allowlist.is_empty() && !self.metric_denylist.is_empty() {
            return Err(ConfigError::ConflictingMetricLists);
        }
        if self.namespaces.iter().any(|n| n.trim().is_empty()) {
            return Err(ConfigError::EmptyNamespace);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Both metric lists were set.
    #[error("metric allowlist and denylist are mutually exclusive")]
    ConflictingMetricLists,
    /// A namespace filter entry is blank.
    #[error("namespace filter contains an empty name")]
    EmptyNamespace,
    /// No resource source was configured.
    #[error("no snapshot file configured")]
    MissingSnapshot,
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The config file is not valid TOML for this format.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Scrape server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], 8080).into(),
        }
    }
}

impl ServerConfig {
    /// Creates a config with a custom port.
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], port).into(),
        }
    }
}

/// Where resources are read from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON snapshot of StatefulSets (`kubectl get statefulsets -A -o json`).
    pub snapshot: Option<PathBuf>,
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Collector options.
    #[serde(default)]
    pub options: Options,
    /// Scrape server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Resource source.
    #[serde(default)]
    pub store: StoreConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.options.validate()?;
        Ok(config)
    }
}
