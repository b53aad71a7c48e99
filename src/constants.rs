//! Centralized constants for the geopins crate
//!
//! Values that are shared between the core, the transport and the CLI live
//! here so that the observable contract is defined in one place.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in meters
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

    pub const MIN_LATITUDE: f64 = -90.0;
    pub const MAX_LATITUDE: f64 = 90.0;
    pub const MIN_LONGITUDE: f64 = -180.0;
    pub const MAX_LONGITUDE: f64 = 180.0;
}

/// Limits on caller input
pub mod limits {
    /// Smallest accepted query radius in meters
    pub const MIN_RADIUS_METERS: i64 = 1;

    /// Largest accepted query radius in meters
    pub const MAX_RADIUS_METERS: i64 = 10_000;

    /// Longest accepted pin name, in characters
    pub const MAX_NAME_CHARS: usize = 255;
}

/// Validation messages returned to clients verbatim
pub mod messages {
    pub const LATITUDE_RANGE: &str = "Latitude must be between -90 and 90";
    pub const LONGITUDE_RANGE: &str = "Longitude must be between -180 and 180";
    pub const NEAR_FORMAT: &str = "Near parameter must be in format lat,lng";
    pub const NEAR_INVALID: &str = "Invalid coordinates in near parameter";
    pub const MISSING_NEARBY_PARAMS: &str = "Missing required parameters: near and radius";
    pub const RADIUS_RANGE: &str = "Radius must be a number between 1 and 10000 meters";
    pub const SEARCH_QUERY_EMPTY: &str = "Search query is required and must not be empty";
    pub const NAME_EMPTY: &str = "Name must not be empty";
    pub const NAME_TOO_LONG: &str = "Name must be at most 255 characters";
}
