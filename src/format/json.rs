//! JSON output formatter
//!
//! Emits the same shapes the HTTP API returns.

use crate::catalog::PointOfInterest;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::pins::{NearbyPin, Pin};

/// JSON formatter - pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "JSON, as returned by the HTTP API"
    }

    fn format_pin(&self, pin: &Pin) -> Result<String> {
        Ok(serde_json::to_string_pretty(pin)?)
    }

    fn format_nearby(&self, pins: &[NearbyPin]) -> Result<String> {
        Ok(serde_json::to_string_pretty(pins)?)
    }

    fn format_pois(&self, pois: &[PointOfInterest]) -> Result<String> {
        Ok(serde_json::to_string_pretty(pois)?)
    }
}
