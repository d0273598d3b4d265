//! Process configuration.
//!
//! A YAML file provides the base values, command-line flags override
//! individual fields, and the merged result is validated before anything
//! starts. Keys missing from the file take their defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tsvwatch_ingest::CycleConfig;
use tsvwatch_store::StoreConfig;
use tsvwatch_web::ServerConfig;

/// Where the base configuration is read from unless `--config` says otherwise.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP bind host.
    pub host: String,
    /// HTTP bind port.
    pub port: u16,
    /// Watched directory.
    #[serde(alias = "sourceDir")]
    pub source_dir: PathBuf,
    /// Report output directory.
    #[serde(alias = "outputDir")]
    pub output_dir: PathBuf,
    #[serde(alias = "dbhost")]
    pub db_host: String,
    #[serde(alias = "dbport")]
    pub db_port: u16,
    /// Explicit store endpoint, e.g. `mem://`. Takes precedence over
    /// `db_host` and `db_port`.
    pub db_url: Option<String>,
    pub db_namespace: String,
    pub db_database: String,
    pub db_username: Option<String>,
    pub db_password: Option<String>,
    pub scan_interval_secs: u64,
    pub store_timeout_secs: u64,
    pub query_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 7999,
            source_dir: PathBuf::from("files"),
            output_dir: PathBuf::from("processed"),
            db_host: "localhost".to_string(),
            db_port: 7998,
            db_url: None,
            db_namespace: "tsvwatch".to_string(),
            db_database: "documents".to_string(),
            db_username: None,
            db_password: None,
            scan_interval_secs: 20,
            store_timeout_secs: 3,
            query_timeout_secs: 5,
        }
    }
}

/// Values given on the command line. `None` leaves the file value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub db_host: Option<String>,
    pub db_port: Option<u16>,
    pub scan_interval_secs: Option<u64>,
}

impl Config {
    /// Load the base configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid configuration YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration YAML. An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns the YAML error for malformed input or unknown keys.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(dir) = overrides.source_dir {
            self.source_dir = dir;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(host) = overrides.db_host {
            self.db_host = host;
        }
        if let Some(port) = overrides.db_port {
            self.db_port = port;
        }
        if let Some(secs) = overrides.scan_interval_secs {
            self.scan_interval_secs = secs;
        }
        self
    }

    /// Check the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid =
            |message: &str| -> Result<(), ConfigError> { Err(ConfigError::Invalid(message.to_string())) };

        if self.host.trim().is_empty() {
            return invalid("host must not be empty");
        }
        if self.port == 0 {
            return invalid("port must be non-zero");
        }
        if self.source_dir.as_os_str().is_empty() {
            return invalid("source_dir must not be empty");
        }
        if self.output_dir.as_os_str().is_empty() {
            return invalid("output_dir must not be empty");
        }
        if self.db_url.is_none() {
            if self.db_host.trim().is_empty() {
                return invalid("db_host must not be empty");
            }
            if self.db_port == 0 {
                return invalid("db_port must be non-zero");
            }
        }
        if self.db_url.as_deref().is_some_and(|url| url.trim().is_empty()) {
            return invalid("db_url must not be empty when set");
        }
        if self.db_username.is_some() != self.db_password.is_some() {
            return invalid("db_username and db_password must be set together");
        }
        if self.scan_interval_secs == 0 {
            return invalid("scan_interval_secs must be non-zero");
        }
        if self.store_timeout_secs == 0 {
            return invalid("store_timeout_secs must be non-zero");
        }
        if self.query_timeout_secs == 0 {
            return invalid("query_timeout_secs must be non-zero");
        }
        Ok(())
    }

    #[must_use]
    pub const fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    #[must_use]
    pub const fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    #[must_use]
    pub const fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        let base = match &self.db_url {
            Some(url) => StoreConfig::url(url.clone()),
            None => StoreConfig::websocket(&self.db_host, self.db_port),
        };
        let config = base
            .with_namespace(self.db_namespace.clone())
            .with_database(self.db_database.clone());
        match (&self.db_username, &self.db_password) {
            (Some(user), Some(pass)) => config.with_credentials(user.clone(), pass.clone()),
            _ => config,
        }
    }

    #[must_use]
    pub fn cycle_config(&self) -> CycleConfig {
        CycleConfig {
            source_dir: self.source_dir.clone(),
            output_dir: self.output_dir.clone(),
            store_timeout: self.store_timeout(),
        }
    }

    #[must_use]
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }
}
