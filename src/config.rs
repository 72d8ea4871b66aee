//! Configuration for the pagination service and client
//!
//! Loaded from a YAML file, then overridden from the environment. Every field
//! has a default, so an empty file (or no file) gives the demo setup.

use crate::client::DEFAULT_CACHE_CAPACITY;
use crate::error::{Error, Result, ResultExt};
use crate::types::{DEFAULT_PAGE_SIZE, DEFAULT_PARTITION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the backing table
pub const TABLE_NAME_ENV: &str = "TABLE_NAME";

/// Environment variable overriding the server port
pub const PORT_ENV: &str = "PAGINATION_PORT";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Table holding the records
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Partition key every query is fixed to
    #[serde(default = "default_partition")]
    pub partition: String,

    /// Page size used when a request gives no usable `limit`
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Number of demo records written at startup (0 = don't seed)
    #[serde(default = "default_seed_count")]
    pub seed_count: usize,

    /// Store backend
    #[serde(default)]
    pub store: StoreConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Client settings
    #[serde(default)]
    pub client: ClientSettings,
}

fn default_table_name() -> String {
    "books".to_string()
}

fn default_partition() -> String {
    DEFAULT_PARTITION.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_seed_count() -> usize {
    40
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            table_name: default_table_name(),
            partition: default_partition(),
            default_limit: default_limit(),
            seed_count: default_seed_count(),
            store: StoreConfig::default(),
            server: ServerSettings::default(),
            client: ClientSettings::default(),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Where records are kept
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    /// In-process ordered map
    #[default]
    Memory,
    /// DuckDB database; in memory when `path` is omitted
    Duckdb {
        /// Database file
        #[serde(default)]
        path: Option<PathBuf>,
    },
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Server base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pages kept by the prefetch cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl AppConfig {
    /// Parse YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml(&contents)
    }

    /// Load from an optional file, apply environment overrides, and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// `load`)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(table) = lookup(TABLE_NAME_ENV) {
            self.table_name = table;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::invalid_value(PORT_ENV, format!("'{port}' is not a port")))?;
        }
        Ok(())
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.table_name.trim().is_empty() {
            return Err(Error::missing_field("table_name"));
        }
        validate_identifier("table_name", &self.table_name)?;

        if self.partition.is_empty() {
            return Err(Error::missing_field("partition"));
        }
        if self.default_limit == 0 {
            return Err(Error::invalid_value("default_limit", "must be at least 1"));
        }
        if self.client.cache_capacity == 0 {
            return Err(Error::invalid_value(
                "client.cache_capacity",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Check that `value` is a plain SQL identifier (letters, digits, `_`, not
/// starting with a digit)
pub fn validate_identifier(field: &str, value: &str) -> Result<()> {
    let mut chars = value.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(Error::invalid_value(
            field,
            format!("'{value}' is not a valid identifier"),
        ))
    }
}
