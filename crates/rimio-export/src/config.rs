//! Exporter configuration.
//!
//! Typed mirror of the `rimio.yaml` settings surface. Every field has a
//! default matching the shipped configuration, so a missing file or a
//! partial one still yields a working exporter. The destination host and
//! port can be overridden with the `RIMIO_HOST` and `RIMIO_PORT`
//! environment variables.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// All settings consumed by the export pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ExporterConfig {
    /// Master switch; when false the dispatcher never fires.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Include the region section in snapshots.
    #[serde(default = "default_true")]
    pub include_world: bool,

    /// Include the actor section in snapshots.
    #[serde(default = "default_true")]
    pub include_actors: bool,

    /// Include per-actor skill records.
    #[serde(default = "default_true")]
    pub include_skills: bool,

    /// Include per-actor current jobs.
    #[serde(default = "default_true")]
    pub include_jobs: bool,

    /// Emit per-cycle timing and size stats at debug level.
    #[serde(default)]
    pub debug: bool,

    /// Destination host name or address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Destination port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Game ticks between export attempts. One second of game time at
    /// normal speed is 60 ticks.
    #[serde(default = "default_cadence")]
    pub cadence_ticks: u64,

    /// Connect/read/write timeout for one delivery attempt, in
    /// milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

const fn default_true() -> bool {
    true
}

fn default_host() -> String {
    String::from("localhost")
}

const fn default_port() -> u16 {
    5500
}

const fn default_cadence() -> u64 {
    60
}

const fn default_timeout_ms() -> u64 {
    1000
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            include_world: true,
            include_actors: true,
            include_skills: true,
            include_jobs: true,
            debug: false,
            host: default_host(),
            port: default_port(),
            cadence_ticks: default_cadence(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ExporterConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Base URL of the configured destination.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Full URL of the snapshot endpoint.
    pub fn data_url(&self) -> String {
        format!("{}/GameData", self.base_url())
    }

    /// Override destination fields from the environment.
    ///
    /// `RIMIO_HOST` replaces `host`; `RIMIO_PORT` replaces `port` when it
    /// parses as a valid port number.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("RIMIO_HOST") {
            if !host.is_empty() {
                self.host = host;
            }
        }
        if let Ok(port) = std::env::var("RIMIO_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.port = port;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_configuration() {
        let config = ExporterConfig::default();
        assert!(config.enabled);
        assert!(config.include_skills);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5500);
        assert_eq!(config.cadence_ticks, 60);
        assert_eq!(config.timeout_ms, 1000);
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let config = ExporterConfig::parse("host: companion.local\ndebug: true\n").unwrap();
        assert_eq!(config.host, "companion.local");
        assert!(config.debug);
        assert_eq!(config.port, 5500);
        assert!(config.include_world);
    }

    #[test]
    fn urls_are_assembled_from_host_and_port() {
        let config = ExporterConfig {
            host: String::from("10.0.0.2"),
            port: 8080,
            ..ExporterConfig::default()
        };
        assert_eq!(config.data_url(), "http://10.0.0.2:8080/GameData");
    }
}
