//! Server shared state
//!
//! Holds the pin store and catalog shared by all request handlers.

use crate::catalog::CatalogSearchIndex;
use crate::config::Config;
use crate::error::Result;
use crate::pins::PinStore;
use std::sync::Arc;

/// Shared state for the HTTP server
#[derive(Debug)]
pub struct AppState {
    /// Pin store (owns the spatial index)
    pub pins: Arc<PinStore>,

    /// Read-only point-of-interest catalog
    pub catalog: Arc<CatalogSearchIndex>,
}

impl AppState {
    /// Create application state from existing components
    pub fn new(pins: PinStore, catalog: CatalogSearchIndex) -> Self {
        Self {
            pins: Arc::new(pins),
            catalog: Arc::new(catalog),
        }
    }

    /// Open the configured repository and catalog
    pub fn from_config(config: &Config) -> Result<Self> {
        let pins = PinStore::open(config.open_repository()?)?;
        let catalog = config.load_catalog()?;
        Ok(Self::new(pins, catalog))
    }

    /// In-memory store with the built-in catalog
    pub fn in_memory() -> Self {
        Self::new(PinStore::in_memory(), CatalogSearchIndex::builtin())
    }
}
