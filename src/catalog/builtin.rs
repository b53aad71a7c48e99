//! Built-in point-of-interest catalog (New York City)

use super::PointOfInterest;

const ENTRIES: &[(&str, &str, f64, f64, &str)] = &[
    ("poi_1", "Starbucks Coffee", 40.7128, -74.0060, "coffee shop"),
    ("poi_2", "McDonald's", 40.7589, -73.9851, "restaurant"),
    ("poi_3", "Central Park", 40.7829, -73.9654, "park"),
    ("poi_4", "Times Square", 40.7580, -73.9855, "landmark"),
    ("poi_5", "Brooklyn Bridge", 40.7061, -73.9969, "landmark"),
    ("poi_6", "Dunkin' Donuts", 40.7505, -73.9934, "coffee shop"),
    ("poi_7", "Subway", 40.7614, -73.9776, "restaurant"),
    ("poi_8", "High Line Park", 40.7480, -74.0048, "park"),
];

pub(super) fn entries() -> Vec<PointOfInterest> {
    ENTRIES
        .iter()
        .map(|&(id, name, lat, lng, category)| PointOfInterest {
            id: id.to_string(),
            name: name.to_string(),
            lat,
            lng,
            category: category.to_string(),
        })
        .collect()
}
