//! Coordinates and their validation
//!
//! This module handles:
//! - Range checks for latitude and longitude
//! - Parsing the compact `lat,lng` form used by query strings
//! - Great-circle distance (see [`distance`])

pub mod distance;

use crate::constants::geo::{MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE};
use crate::constants::messages;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub use distance::haversine_distance;

/// A geographic coordinate (latitude, longitude) in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        validate(self.lat, self.lng)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl std::str::FromStr for Coordinates {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_near(s)
    }
}

/// Check a latitude/longitude pair against Earth-surface bounds
///
/// Latitude is checked first. NaN fails the check for its axis.
pub fn validate(lat: f64, lng: f64) -> Result<()> {
    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
        return Err(Error::validation(messages::LATITUDE_RANGE));
    }
    if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lng) {
        return Err(Error::validation(messages::LONGITUDE_RANGE));
    }
    Ok(())
}

/// Parse a `near` parameter of the form `"<lat>,<lng>"`
///
/// # Errors
/// - wrong number of comma-separated fields
/// - a field that is not a finite decimal number
/// - coordinates outside valid ranges
pub fn parse_near(text: &str) -> Result<Coordinates> {
    let parts: Vec<&str> = text.split(',').collect();
    let [lat, lng] = parts.as_slice() else {
        return Err(Error::validation(messages::NEAR_FORMAT));
    };

    let (Some(lat), Some(lng)) = (parse_degrees(lat), parse_degrees(lng)) else {
        return Err(Error::validation(messages::NEAR_INVALID));
    };

    validate(lat, lng)?;
    Ok(Coordinates::new(lat, lng))
}

fn parse_degrees(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
