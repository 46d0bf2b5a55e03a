//! Deterministic cache keys.
//!
//! Coordinates are rounded to 4 decimal places so near-identical queries
//! share an entry; place names are trimmed, lowercased and percent-encoded
//! (including `_`, the field separator).

use crate::domain::Coordinate;

pub fn stops_key(center: Coordinate, radius_m: u32) -> String {
    format!("bus_stops_{}_{}", center.cache_fragment(), radius_m)
}

pub fn routes_key(from: &str, to: &str) -> String {
    format!("bus_routes_{}_{}", place_key(from), place_key(to))
}

pub fn depot_key(center: Coordinate, radius_m: u32) -> String {
    format!("nearest_depot_{}_{}", center.cache_fragment(), radius_m)
}

fn place_key(place: &str) -> String {
    urlencoding::encode(&place.trim().to_lowercase()).replace('_', "%5F")
}
