//! geopins: geospatial pin store
//!
//! A library and HTTP service for registering named geographic points
//! ("pins") and finding those within a radius of a location, nearest first,
//! plus substring search over a fixed point-of-interest catalog.
//!
//! ## Features
//!
//! - Coordinate validation and `lat,lng` parsing
//! - Great-circle (haversine) distance
//! - R-tree backed radius queries
//! - Memory or JSON-file pin persistence
//! - Case-insensitive catalog search
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use geopins::pins::PinStore;
//! use geopins::catalog::CatalogSearchIndex;
//!
//! let store = PinStore::in_memory();
//! let pin = store.create("Test Pin", 40.7128, -74.0060).unwrap();
//!
//! let nearby = store.nearby(Some("40.7128,-74.0060"), Some("1000")).unwrap();
//! assert_eq!(nearby[0].id, pin.id);
//!
//! let catalog = CatalogSearchIndex::builtin();
//! let coffee = catalog.search("coffee").unwrap();
//! assert_eq!(coffee[0].name, "Starbucks Coffee");
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod index;
pub mod pins;
pub mod server;

// Re-export commonly used types
pub use catalog::{CatalogSearchIndex, PointOfInterest};
pub use config::Config;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use index::{ProximityResult, SpatialIndex};
pub use pins::{NearbyPin, Pin, PinStore};
