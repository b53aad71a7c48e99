//! Human-readable text output formatter

use crate::catalog::PointOfInterest;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::pins::{NearbyPin, Pin};

/// Text formatter - one line per result
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format_pin(&self, pin: &Pin) -> Result<String> {
        Ok(format!(
            "Created pin {}\n  Name: {}\n  Location: ({:.6}, {:.6})\n  Created: {}\n",
            pin.id,
            pin.name,
            pin.lat,
            pin.lng,
            pin.created_at.to_rfc3339()
        ))
    }

    fn format_nearby(&self, pins: &[NearbyPin]) -> Result<String> {
        if pins.is_empty() {
            return Ok("No pins found\n".to_string());
        }

        let mut output = format!("{} pin(s):\n", pins.len());
        for pin in pins {
            output.push_str(&format!(
                "  {:>9.1}m  {} ({:.6}, {:.6}) [{}]\n",
                pin.distance_m, pin.name, pin.lat, pin.lng, pin.id
            ));
        }
        Ok(output)
    }

    fn format_pois(&self, pois: &[PointOfInterest]) -> Result<String> {
        if pois.is_empty() {
            return Ok("No matches\n".to_string());
        }

        let mut output = format!("{} match(es):\n", pois.len());
        for poi in pois {
            output.push_str(&format!(
                "  {} - {} ({:.4}, {:.4}) [{}]\n",
                poi.name, poi.category, poi.lat, poi.lng, poi.id
            ));
        }
        Ok(output)
    }
}
