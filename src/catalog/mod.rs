//! Point-of-interest catalog and text search
//!
//! The catalog is fixed for the life of the process: it is either the
//! built-in set or a JSON file read once at startup. Search is a
//! case-insensitive substring match on name or category, returned in
//! catalog order.

mod builtin;

use crate::constants::messages;
use crate::coord;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A read-only catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub category: String,
}

/// Substring search over an immutable catalog
#[derive(Debug, Clone)]
pub struct CatalogSearchIndex {
    entries: Vec<PointOfInterest>,
    /// Lowercased (name, category) per entry, same order as `entries`
    folded: Vec<(String, String)>,
}

impl CatalogSearchIndex {
    /// Build an index over `entries`
    ///
    /// # Errors
    /// Returns a config error if an entry has invalid coordinates or an id
    /// appears twice.
    pub fn new(entries: Vec<PointOfInterest>) -> Result<Self> {
        let mut seen = HashSet::new();
        for poi in &entries {
            coord::validate(poi.lat, poi.lng)
                .map_err(|e| Error::Config(format!("Catalog entry {}: {}", poi.id, e)))?;
            if !seen.insert(poi.id.as_str()) {
                return Err(Error::Config(format!("Duplicate catalog id: {}", poi.id)));
            }
        }

        Ok(Self::fold(entries))
    }

    /// The built-in catalog
    pub fn builtin() -> Self {
        Self::fold(builtin::entries())
    }

    fn fold(entries: Vec<PointOfInterest>) -> Self {
        let folded = entries
            .iter()
            .map(|poi| (poi.name.to_lowercase(), poi.category.to_lowercase()))
            .collect();
        Self { entries, folded }
    }

    /// Load a catalog from a JSON array of entries
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read catalog file {}: {}", path.display(), e))
        })?;
        let entries: Vec<PointOfInterest> = serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse catalog file {}: {}", path.display(), e))
        })?;
        Self::new(entries)
    }

    /// Entries whose name or category contains `query`, ignoring case
    ///
    /// # Errors
    /// Fails if `query` is empty after trimming.
    pub fn search(&self, query: &str) -> Result<Vec<PointOfInterest>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(Error::validation(messages::SEARCH_QUERY_EMPTY));
        }

        Ok(self
            .entries
            .iter()
            .zip(&self.folded)
            .filter(|(_, (name, category))| name.contains(&needle) || category.contains(&needle))
            .map(|(poi, _)| poi.clone())
            .collect())
    }

    /// All catalog entries in catalog order
    pub fn entries(&self) -> &[PointOfInterest] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CatalogSearchIndex {
    fn default() -> Self {
        Self::builtin()
    }
}
