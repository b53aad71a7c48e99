//! Pin persistence backends
//!
//! The store hands complete [`Pin`] records to a repository; backends never
//! see query strings. Two backends exist:
//! - `memory`: pins live only as long as the process
//! - `file`: pins are kept in a JSON file in the XDG data directory
//!   (~/.local/share/geopins/pins.json by default)

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::pins::Pin;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const APP_DIR_NAME: &str = "geopins";
const PINS_FILE_NAME: &str = "pins.json";

/// Trait for pin persistence backends
pub trait PinRepository: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &str;

    /// Read every stored pin
    fn load_all(&self) -> Result<Vec<Pin>>;

    /// Durably record a new pin
    ///
    /// On error the pin must not be considered stored.
    fn insert(&mut self, pin: &Pin) -> Result<()>;
}

/// Open the repository named by the storage configuration
pub fn open_repository(config: &StorageConfig) -> Result<Box<dyn PinRepository>> {
    match config.backend.to_lowercase().as_str() {
        "memory" => Ok(Box::new(MemoryRepository::new())),
        "file" => {
            let path = match &config.path {
                Some(path) if !path.as_os_str().is_empty() => path.clone(),
                _ => JsonFileRepository::default_path()?,
            };
            Ok(Box::new(JsonFileRepository::open(path)?))
        }
        other => Err(Error::Config(format!("Unknown storage backend: {}", other))),
    }
}

/// Volatile backend holding pins in a vector
#[derive(Debug, Default)]
pub struct MemoryRepository {
    pins: Vec<Pin>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PinRepository for MemoryRepository {
    fn name(&self) -> &str {
        "memory"
    }

    fn load_all(&self) -> Result<Vec<Pin>> {
        Ok(self.pins.clone())
    }

    fn insert(&mut self, pin: &Pin) -> Result<()> {
        self.pins.push(pin.clone());
        Ok(())
    }
}

/// JSON file backend
///
/// The whole file is rewritten on every insert through a temporary file and
/// a rename, so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonFileRepository {
    pins: Vec<Pin>,
    path: PathBuf,
}

impl JsonFileRepository {
    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
    }

    /// Get the default pins file path
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(PINS_FILE_NAME))
    }

    /// Open a repository at `path`, reading existing pins if the file exists
    pub fn open(path: PathBuf) -> Result<Self> {
        let pins = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Storage(format!("Failed to read pins file {}: {}", path.display(), e))
            })?;

            serde_json::from_str(&content).map_err(|e| {
                Error::Storage(format!("Failed to parse pins file {}: {}", path.display(), e))
            })?
        } else {
            Vec::new()
        };

        Ok(Self { pins, path })
    }

    fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!("Failed to create data directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(&self.pins)
            .map_err(|e| Error::Storage(format!("Failed to serialize pins: {}", e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .map_err(|e| Error::Storage(format!("Failed to write pins file: {}", e)))?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::Storage(format!("Failed to replace pins file: {}", e)));
        }

        Ok(())
    }
}

impl PinRepository for JsonFileRepository {
    fn name(&self) -> &str {
        "file"
    }

    fn load_all(&self) -> Result<Vec<Pin>> {
        Ok(self.pins.clone())
    }

    fn insert(&mut self, pin: &Pin) -> Result<()> {
        self.pins.push(pin.clone());
        if let Err(e) = self.write() {
            self.pins.pop();
            return Err(e);
        }
        debug!(id = %pin.id, path = %self.path.display(), "Pin written to file");
        Ok(())
    }
}
