//! Server configuration.
//!
//! Built-in defaults, then an optional TOML file, then the `BIND_ADDR` and
//! `PORT` environment variables, then command-line flags (applied by the
//! binary), each overriding the last.

use std::path::{Path, PathBuf};

use accident_risk_artifacts::ArtifactPaths;
use serde::Deserialize;

/// Errors that can occur while reading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or has unknown keys.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Runtime configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
    /// Trained classifier (JSON).
    pub model_path: PathBuf,
    /// Encoded feature table (CSV).
    pub features_path: PathBuf,
    /// Accident sample for the heatmap (CSV).
    pub accidents_path: PathBuf,
    /// Frontend build served at `/` when the directory exists.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let paths = ArtifactPaths::default();
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 5000,
            model_path: paths.model,
            features_path: paths.features,
            accidents_path: paths.accidents,
            static_dir: Some(PathBuf::from("app/dist")),
        }
    }
}

impl ServerConfig {
    /// Parses a configuration from TOML. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the TOML is malformed or contains
    /// unknown keys.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Reads the configuration file at `path`, or returns the defaults when
    /// no path is given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        log::info!("Reading configuration from {}", path.display());
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Applies `BIND_ADDR` and `PORT` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Applies `BIND_ADDR` and `PORT` using `lookup` to read variables. An
    /// unparseable `PORT` is ignored with a warning.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind_addr) = lookup("BIND_ADDR") {
            self.bind_addr = bind_addr;
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(e) => log::warn!("Ignoring invalid PORT '{port}': {e}"),
            }
        }
    }

    /// Artifact locations for [`accident_risk_risk::ServiceState::load`].
    #[must_use]
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.model_path.clone(),
            features: self.features_path.clone(),
            accidents: self.accidents_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml_str(
            r#"
            port = 8080
            model_path = "/srv/models/accident_model.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.model_path,
            PathBuf::from("/srv/models/accident_model.json")
        );
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(
            config.features_path,
            PathBuf::from("data/encoded_features.csv")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ServerConfig::from_toml_str("prot = 8080").is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = ServerConfig::default();
        config.apply_env_from(|name| match name {
            "BIND_ADDR" => Some("0.0.0.0".to_string()),
            "PORT" => Some("9090".to_string()),
            _ => None,
        });
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut config = ServerConfig::default();
        config.apply_env_from(|name| (name == "PORT").then(|| "eighty".to_string()));
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(ServerConfig::load(None).unwrap(), ServerConfig::default());
    }

    #[test]
    fn artifact_paths_follow_config() {
        let config = ServerConfig {
            accidents_path: PathBuf::from("/tmp/sample.csv"),
            ..ServerConfig::default()
        };
        assert_eq!(
            config.artifact_paths().accidents,
            PathBuf::from("/tmp/sample.csv")
        );
    }
}
