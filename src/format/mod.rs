//! Output formatters
//!
//! Provides trait-based output formatting for CLI results.

pub mod json;
pub mod text;

use crate::catalog::PointOfInterest;
use crate::error::Result;
use crate::pins::{NearbyPin, Pin};
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a newly created pin
    fn format_pin(&self, pin: &Pin) -> Result<String>;

    /// Format proximity query results, nearest first
    fn format_nearby(&self, pins: &[NearbyPin]) -> Result<String>;

    /// Format catalog search results
    fn format_pois(&self, pois: &[PointOfInterest]) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    [
        Box::new(json::JsonFormatter) as Box<dyn OutputFormatter>,
        Box::new(text::TextFormatter),
    ]
    .iter()
    .map(|f| FormatInfo {
        name: f.name().to_string(),
        description: f.description().to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_formatter() {
        assert!(get_formatter("json").is_some());
        assert!(get_formatter("text").is_some());
        assert!(get_formatter("unknown").is_none());
    }

    #[test]
    fn test_get_formatter_case_insensitive() {
        assert!(get_formatter("JSON").is_some());
        assert!(get_formatter("Text").is_some());
    }

    #[test]
    fn test_available_formats() {
        let formats = available_formats();
        assert_eq!(formats.len(), 2);
        assert!(formats.iter().any(|f| f.name == "json"));
        assert!(formats.iter().any(|f| f.name == "text"));
    }
}
