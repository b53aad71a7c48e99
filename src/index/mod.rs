//! Spatial index for radius queries
//!
//! Pins are kept in an R-tree keyed on `[lng, lat]`. A radius query first
//! collects candidates from a degree-space bounding box that contains the
//! whole search circle, then keeps the ones whose great-circle distance is
//! within the radius.

use crate::constants::geo::{
    EARTH_RADIUS_METERS, MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE,
};
use crate::coord::{haversine_distance, Coordinates};
use crate::pins::Pin;
use rstar::{RTree, RTreeObject, AABB};
use std::sync::Arc;

/// Slack added to every side of a search box, in degrees (about 10 cm)
const ENVELOPE_PADDING_DEG: f64 = 1e-6;

/// A pin as stored in the R-tree
#[derive(Debug, Clone)]
struct IndexedPin {
    pin: Arc<Pin>,
}

impl RTreeObject for IndexedPin {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.pin.lng, self.pin.lat])
    }
}

/// A pin found by a radius query, with its distance from the query center
#[derive(Debug, Clone)]
pub struct ProximityResult {
    pub pin: Arc<Pin>,
    pub distance_m: f64,
}

/// R-tree backed index answering "all pins within r meters of p"
#[derive(Debug, Default)]
pub struct SpatialIndex {
    tree: RTree<IndexedPin>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Build an index from a set of pins in one pass.
    pub fn bulk_load(pins: Vec<Arc<Pin>>) -> Self {
        let entries = pins.into_iter().map(|pin| IndexedPin { pin }).collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Add a pin to the index.
    ///
    /// Each pin id must be inserted at most once; duplicates are not detected
    /// here.
    pub fn insert(&mut self, pin: Arc<Pin>) {
        self.tree.insert(IndexedPin { pin });
    }

    /// Every indexed pin within `radius_m` meters of `center`, nearest first.
    ///
    /// Pins at equal distance are ordered by id, so the same index state
    /// always yields the same sequence.
    pub fn query_radius(&self, center: Coordinates, radius_m: f64) -> Vec<ProximityResult> {
        let mut results: Vec<ProximityResult> = search_envelopes(center, radius_m)
            .iter()
            .flat_map(|envelope| self.tree.locate_in_envelope_intersecting(envelope))
            .filter_map(|entry| {
                let distance_m = haversine_distance(center, entry.pin.coords());
                (distance_m <= radius_m).then(|| ProximityResult {
                    pin: Arc::clone(&entry.pin),
                    distance_m,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            a.distance_m
                .total_cmp(&b.distance_m)
                .then_with(|| a.pin.id.cmp(&b.pin.id))
        });
        results
    }

    /// Get the number of indexed pins.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// Degree-space boxes that together cover the search circle
///
/// Near a pole the box spans every longitude. When the box crosses the
/// antimeridian it is split into one box on each side.
fn search_envelopes(center: Coordinates, radius_m: f64) -> Vec<AABB<[f64; 2]>> {
    let angular = radius_m / EARTH_RADIUS_METERS;
    let delta_lat = angular.to_degrees() + ENVELOPE_PADDING_DEG;
    let min_lat = (center.lat - delta_lat).max(MIN_LATITUDE);
    let max_lat = (center.lat + delta_lat).min(MAX_LATITUDE);

    let full_width = || {
        vec![AABB::from_corners(
            [MIN_LONGITUDE, min_lat],
            [MAX_LONGITUDE, max_lat],
        )]
    };

    if min_lat <= MIN_LATITUDE || max_lat >= MAX_LATITUDE {
        return full_width();
    }

    // Widest longitude offset reached by a spherical cap of this radius
    let ratio = angular.sin() / center.lat.to_radians().cos();
    if !(ratio < 1.0) {
        return full_width();
    }
    let delta_lng = ratio.asin().to_degrees() + ENVELOPE_PADDING_DEG;
    if delta_lng >= 180.0 {
        return full_width();
    }

    let min_lng = center.lng - delta_lng;
    let max_lng = center.lng + delta_lng;

    if min_lng < MIN_LONGITUDE {
        vec![
            AABB::from_corners([min_lng + 360.0, min_lat], [MAX_LONGITUDE, max_lat]),
            AABB::from_corners([MIN_LONGITUDE, min_lat], [max_lng, max_lat]),
        ]
    } else if max_lng > MAX_LONGITUDE {
        vec![
            AABB::from_corners([min_lng, min_lat], [MAX_LONGITUDE, max_lat]),
            AABB::from_corners([MIN_LONGITUDE, min_lat], [max_lng - 360.0, max_lat]),
        ]
    } else {
        vec![AABB::from_corners([min_lng, min_lat], [max_lng, max_lat])]
    }
}
