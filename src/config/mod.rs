//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/geopins/config.toml

pub mod defaults;

use crate::catalog::CatalogSearchIndex;
use crate::error::{Error, Result};
use crate::pins::storage::{open_repository, PinRepository};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Pin persistence settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Point-of-interest catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// CLI output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Pin persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend name: "file" or "memory"
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// Pins file for the file backend (empty: XDG data directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Catalog settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog file replacing the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// CLI output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format ("text" or "json")
    #[serde(default = "default_format")]
    pub format: String,
}

// Default value functions for serde
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_storage_backend() -> String {
    DEFAULT_STORAGE_BACKEND.to_string()
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            path: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["storage", "backend"] => Some(self.storage.backend.clone()),
            ["storage", "path"] => Some(display_path(&self.storage.path)),

            ["catalog", "path"] => Some(display_path(&self.catalog.path)),

            ["output", "format"] => Some(self.output.format.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid port value: {}", value)))?;
            }

            ["storage", "backend"] => match value.to_lowercase().as_str() {
                "file" | "memory" => self.storage.backend = value.to_lowercase(),
                _ => {
                    return Err(Error::Config(format!("Invalid storage backend: {}", value)));
                }
            },
            ["storage", "path"] => {
                self.storage.path = optional_path(value);
            }

            ["catalog", "path"] => {
                self.catalog.path = optional_path(value);
            }

            ["output", "format"] => {
                if crate::format::get_formatter(value).is_none() {
                    return Err(Error::Config(format!("Invalid output format: {}", value)));
                }
                self.output.format = value.to_lowercase();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "server.host",
            "server.port",
            "storage.backend",
            "storage.path",
            "catalog.path",
            "output.format",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Apply the `PORT` environment variable, if set and valid
    pub fn apply_env(&mut self) {
        self.apply_port_override(std::env::var(PORT_ENV_VAR).ok());
    }

    /// Replace the server port with `port` when it parses
    ///
    /// Returns whether the port changed. Invalid values are logged and ignored.
    pub fn apply_port_override(&mut self, port: Option<String>) -> bool {
        let Some(port) = port else {
            return false;
        };
        match port.trim().parse() {
            Ok(port) => {
                self.server.port = port;
                true
            }
            Err(_) => {
                tracing::warn!("Ignoring invalid {} value: {}", PORT_ENV_VAR, port);
                false
            }
        }
    }

    /// Open the configured pin repository
    pub fn open_repository(&self) -> Result<Box<dyn PinRepository>> {
        open_repository(&self.storage)
    }

    /// Load the configured catalog
    pub fn load_catalog(&self) -> Result<CatalogSearchIndex> {
        match &self.catalog.path {
            Some(path) if !path.as_os_str().is_empty() => CatalogSearchIndex::from_path(path),
            _ => Ok(CatalogSearchIndex::builtin()),
        }
    }
}

fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_override() {
        let mut config = Config::default();

        assert!(!config.apply_port_override(None));
        assert_eq!(config.server.port, DEFAULT_PORT);

        assert!(config.apply_port_override(Some("8080".to_string())));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server_addr(), "127.0.0.1:8080");

        for invalid in ["", "http", "-1", "70000"] {
            assert!(!config.apply_port_override(Some(invalid.to_string())));
            assert_eq!(config.server.port, 8080);
        }
    }
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.storage.backend, "file");
        assert!(config.storage.path.is_none());
        assert!(config.catalog.path.is_none());
        assert_eq!(config.output.format, "text");
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("server.port"), Some("4000".to_string()));
        config.set("server.port", "8080").unwrap();
        assert_eq!(config.server.port, 8080);

        config.set("storage.backend", "Memory").unwrap();
        assert_eq!(config.get("storage.backend"), Some("memory".to_string()));

        config.set("storage.path", "/tmp/pins.json").unwrap();
        assert_eq!(config.get("storage.path"), Some("/tmp/pins.json".to_string()));
        config.set("storage.path", "").unwrap();
        assert!(config.storage.path.is_none());

        config.set("output.format", "json").unwrap();
        assert_eq!(config.get("output.format"), Some("json".to_string()));
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("server.port", "not_a_number").is_err());
        assert!(config.set("storage.backend", "postgres").is_err());
        assert!(config.set("output.format", "gpx").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("geopins").join("config.toml");

        let mut config = Config::default();
        config.server.port = 9000;
        config.storage.backend = "memory".to_string();
        config.catalog.path = Some(PathBuf::from("/srv/catalog.json"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.server.port, 9000);
        assert_eq!(loaded.storage.backend, "memory");
        assert_eq!(loaded.catalog.path, Some(PathBuf::from("/srv/catalog.json")));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[server]\nport = 5000\n").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.storage.backend, "file");
    }

    #[test]
    fn test_serialization_format() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[storage]"));
        assert!(toml.contains("[output]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:4000");
    }

    #[test]
    fn test_available_keys_round_trip() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "missing getter for {}", key);
        }
    }

    #[test]
    fn test_load_catalog_default_and_file() {
        let mut config = Config::default();
        assert_eq!(config.load_catalog().unwrap().len(), 8);

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"[{"id":"x","name":"Pier 39","lat":37.8087,"lng":-122.4098,"category":"landmark"}]"#,
        )
        .unwrap();
        config.catalog.path = Some(path);
        assert_eq!(config.load_catalog().unwrap().len(), 1);
    }
}
