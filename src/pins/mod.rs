//! Pin store
//!
//! Owns pin identity and lifecycle. Every pin goes through [`PinStore::create`],
//! which validates it, persists it through a [`PinRepository`], and registers
//! it in the [`SpatialIndex`] before returning.

pub mod storage;

use crate::constants::limits::{MAX_NAME_CHARS, MAX_RADIUS_METERS, MIN_RADIUS_METERS};
use crate::constants::messages;
use crate::coord::{self, Coordinates};
use crate::error::{Error, Result};
use crate::index::{ProximityResult, SpatialIndex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use storage::PinRepository;
use tracing::{debug, info};
use uuid::Uuid;

/// A named geographic point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: DateTime<Utc>,
}

impl Pin {
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// A pin returned by a proximity query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyPin {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub distance_m: f64,
}

impl From<ProximityResult> for NearbyPin {
    fn from(result: ProximityResult) -> Self {
        Self {
            id: result.pin.id.clone(),
            name: result.pin.name.clone(),
            lat: result.pin.lat,
            lng: result.pin.lng,
            distance_m: result.distance_m,
        }
    }
}

/// Pins and their index, swapped together under one lock
#[derive(Debug, Default)]
struct Indexed {
    by_id: HashMap<String, Arc<Pin>>,
    index: SpatialIndex,
}

/// Thread-safe pin store
///
/// Queries take a read lock and run in parallel. Creation is serialized by
/// the repository mutex and only takes the write lock for the in-memory
/// insert, so a reader sees either all of a new pin or none of it.
pub struct PinStore {
    repository: Mutex<Box<dyn PinRepository>>,
    indexed: RwLock<Indexed>,
}

impl PinStore {
    /// Open a store over `repository`, indexing every pin it already holds
    pub fn open(repository: Box<dyn PinRepository>) -> Result<Self> {
        let existing = repository.load_all()?;

        let mut by_id = HashMap::with_capacity(existing.len());
        for pin in existing {
            let pin = Arc::new(pin);
            if by_id.insert(pin.id.clone(), Arc::clone(&pin)).is_some() {
                return Err(Error::Storage(format!("Duplicate pin id in storage: {}", pin.id)));
            }
        }
        let index = SpatialIndex::bulk_load(by_id.values().cloned().collect());

        info!(
            backend = repository.name(),
            pins = by_id.len(),
            "Pin store opened"
        );

        Ok(Self {
            repository: Mutex::new(repository),
            indexed: RwLock::new(Indexed { by_id, index }),
        })
    }

    /// Open an empty store that keeps pins in memory only
    pub fn in_memory() -> Self {
        Self {
            repository: Mutex::new(Box::new(storage::MemoryRepository::new())),
            indexed: RwLock::new(Indexed::default()),
        }
    }

    /// Create, persist and index a new pin
    ///
    /// The pin is visible to [`PinStore::nearby`] as soon as this returns.
    ///
    /// # Errors
    /// Validation errors for out-of-range coordinates or a bad name; a storage
    /// error if the repository rejects the pin, in which case it is not
    /// indexed.
    pub fn create(&self, name: &str, lat: f64, lng: f64) -> Result<Pin> {
        coord::validate(lat, lng)?;
        validate_name(name)?;

        let pin = Pin {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            lat,
            lng,
            created_at: Utc::now(),
        };

        let mut repository = self
            .repository
            .lock()
            .map_err(|_| Error::Internal("pin repository lock poisoned".to_string()))?;
        // The index is only written under the repository mutex, so it cannot
        // become poisoned between this check and the insert below
        if self.indexed.is_poisoned() {
            return Err(Error::Internal("pin index lock poisoned".to_string()));
        }
        repository.insert(&pin)?;

        let shared = Arc::new(pin.clone());
        {
            let mut indexed = self.write_indexed()?;
            indexed.by_id.insert(pin.id.clone(), Arc::clone(&shared));
            indexed.index.insert(shared);
        }
        drop(repository);

        info!(id = %pin.id, lat = pin.lat, lng = pin.lng, "Pin created");
        Ok(pin)
    }

    /// Pins near a point, from raw query-string parameters
    ///
    /// # Arguments
    /// * `near` - `"lat,lng"` of the query center
    /// * `radius` - integer radius in meters, 1 to 10000
    ///
    /// Empty strings count as missing.
    pub fn nearby(&self, near: Option<&str>, radius: Option<&str>) -> Result<Vec<NearbyPin>> {
        let (Some(near), Some(radius)) = (
            near.filter(|s| !s.is_empty()),
            radius.filter(|s| !s.is_empty()),
        ) else {
            return Err(Error::validation(messages::MISSING_NEARBY_PARAMS));
        };

        let center = coord::parse_near(near)?;
        let radius_m = parse_radius(radius)?;

        let results = self.query(center, radius_m)?;
        debug!(%center, radius_m, hits = results.len(), "Nearby query");

        Ok(results.into_iter().map(NearbyPin::from).collect())
    }

    /// Pins within `radius_m` meters of `center`, nearest first
    ///
    /// No bounds are applied to the radius here.
    pub fn query(&self, center: Coordinates, radius_m: f64) -> Result<Vec<ProximityResult>> {
        Ok(self.read_indexed()?.index.query_radius(center, radius_m))
    }

    /// Get a pin by id
    pub fn get(&self, id: &str) -> Result<Option<Pin>> {
        Ok(self
            .read_indexed()?
            .by_id
            .get(id)
            .map(|pin| pin.as_ref().clone()))
    }

    /// Number of stored pins
    pub fn len(&self) -> Result<usize> {
        Ok(self.read_indexed()?.index.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read_indexed(&self) -> Result<std::sync::RwLockReadGuard<'_, Indexed>> {
        self.indexed
            .read()
            .map_err(|_| Error::Internal("pin index lock poisoned".to_string()))
    }

    fn write_indexed(&self) -> Result<std::sync::RwLockWriteGuard<'_, Indexed>> {
        self.indexed
            .write()
            .map_err(|_| Error::Internal("pin index lock poisoned".to_string()))
    }
}

#[cfg(test)]
impl PinStore {
    /// Poison the index lock by panicking while holding it
    pub(crate) fn poison_index(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.indexed.write();
            panic!("poisoning pin index");
        }));
        assert!(self.indexed.is_poisoned());
    }
}

impl std::fmt::Debug for PinStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinStore").finish_non_exhaustive()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::validation(messages::NAME_EMPTY));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(Error::validation(messages::NAME_TOO_LONG));
    }
    Ok(())
}

/// Parse a radius parameter as whole meters within the accepted range
pub fn parse_radius(text: &str) -> Result<f64> {
    text.trim()
        .parse::<i64>()
        .ok()
        .filter(|r| (MIN_RADIUS_METERS..=MAX_RADIUS_METERS).contains(r))
        .map(|r| r as f64)
        .ok_or_else(|| Error::validation(messages::RADIUS_RANGE))
}
