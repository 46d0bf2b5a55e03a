//! Bundled sample data served when live sources fail.
//!
//! The built-in dataset covers the main Kerala corridors. A replacement
//! dataset with the same JSON shape can be loaded from disk.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Bus, BusCategory, BusStop, Coordinate, Depot, DomainError};

/// Errors loading a fallback dataset from disk.
#[derive(Debug, thiserror::Error)]
pub enum FallbackError {
    #[error("failed to read fallback dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse fallback dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid record {id} in fallback dataset: {source}")]
    InvalidRecord {
        id: String,
        #[source]
        source: DomainError,
    },
}

/// Static routes, stops and depots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FallbackDataset {
    #[serde(default)]
    pub routes: Vec<Bus>,
    #[serde(default)]
    pub stops: Vec<BusStop>,
    #[serde(default)]
    pub depots: Vec<Depot>,
}

impl FallbackDataset {
    /// The dataset compiled into the crate.
    pub fn bundled() -> Self {
        Self {
            routes: bundled_routes(),
            stops: bundled_stops(),
            depots: bundled_depots(),
        }
    }

    /// Load a dataset from a JSON file shaped like `{routes, stops, depots}`.
    ///
    /// Every stop, depot and stop location must carry a valid coordinate.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FallbackError> {
        let json = std::fs::read_to_string(path)?;
        let dataset: Self = serde_json::from_str(&json)?;
        dataset.validate()?;
        Ok(dataset)
    }

    fn validate(&self) -> Result<(), FallbackError> {
        let invalid = |id: String, c: &Coordinate| {
            Coordinate::new(c.lat, c.lng)
                .map(|_| ())
                .map_err(|source| FallbackError::InvalidRecord { id, source })
        };

        for stop in &self.stops {
            invalid(stop.id.clone(), &stop.position)?;
        }
        for depot in &self.depots {
            invalid(depot.id.clone(), &depot.position)?;
        }
        for bus in &self.routes {
            for location in bus.stop_locations.iter().flatten() {
                invalid(bus.id.to_string(), location)?;
            }
        }
        Ok(())
    }

    /// Routes between `from` and `to`.
    ///
    /// Trips whose endpoints match in either direction come first; if there
    /// are none, any trip that serves both places (as an endpoint or an
    /// intermediate stop) is returned instead.
    pub fn routes_between(&self, from: &str, to: &str) -> Vec<Bus> {
        let direct: Vec<Bus> = self
            .routes
            .iter()
            .filter(|bus| bus.connects(from, to))
            .cloned()
            .collect();

        if !direct.is_empty() {
            return direct;
        }

        self.routes
            .iter()
            .filter(|bus| bus.serves(from) && bus.serves(to))
            .cloned()
            .collect()
    }
}

fn bus(id: i64, from: &str, to: &str, category: BusCategory, times: (&str, &str), stops: &[&str]) -> Bus {
    Bus {
        id,
        from: from.to_string(),
        to: to.to_string(),
        category,
        departure: times.0.to_string(),
        arrival: times.1.to_string(),
        stops: stops.iter().map(|s| s.to_string()).collect(),
        stop_locations: None,
        fare: None,
        duration: None,
        bus_number: None,
    }
}

fn bundled_routes() -> Vec<Bus> {
    use BusCategory::*;

    vec![
        bus(1, "Ernakulam", "Kozhikode", Ac, ("10:30 AM", "3:45 PM"), &[
            "Kalamassery",
            "Thrissur",
            "Shornur",
        ]),
        bus(2, "Ernakulam", "Thiruvananthapuram", Express, ("9:00 AM", "1:30 PM"), &[
            "Alappuzha",
            "Kollam",
        ]),
        bus(3, "Kottayam", "Kozhikode", Ordinary, ("7:15 AM", "4:30 PM"), &[
            "Ernakulam",
            "Thrissur",
            "Palakkad",
            "Malappuram",
        ]),
        bus(4, "Thiruvananthapuram", "Kannur", Ac, ("8:00 PM", "6:30 AM"), &[
            "Kollam",
            "Alappuzha",
            "Ernakulam",
            "Thrissur",
            "Kozhikode",
        ]),
        bus(5, "Thrissur", "Ernakulam", Ordinary, ("7:00 AM", "9:30 AM"), &[
            "Chalakudy",
            "Angamaly",
            "Kalamassery",
        ]),
    ]
}

fn bundled_stops() -> Vec<BusStop> {
    const STOPS: [(&str, &str, f64, f64); 14] = [
        ("stop1", "Ernakulam Bus Terminal", 9.9816, 76.2999),
        ("stop2", "Kalamassery Stop", 10.0523, 76.3305),
        ("stop3", "Thrissur Bus Station", 10.5276, 76.2144),
        ("stop4", "Shornur Junction", 10.7618, 76.2421),
        ("stop5", "Kozhikode KSRTC", 11.2588, 75.7804),
        ("stop6", "Alappuzha Bus Station", 9.4981, 76.3388),
        ("stop7", "Kollam KSRTC", 8.8932, 76.5709),
        ("stop8", "Thiruvananthapuram Central", 8.4855, 76.9492),
        ("stop9", "Kottayam Bus Stand", 9.5916, 76.5222),
        ("stop10", "Palakkad Bus Terminal", 10.7867, 76.6548),
        ("stop11", "Malappuram Bus Stand", 11.0731, 76.0744),
        ("stop12", "Kannur KSRTC", 11.8745, 75.3704),
        ("stop13", "Chalakudy Bus Stand", 10.3004, 76.3390),
        ("stop14", "Angamaly Bus Stop", 10.1960, 76.3861),
    ];

    STOPS
        .iter()
        .map(|&(id, name, lat, lng)| BusStop::new(id, name, Coordinate::from_degrees(lat, lng)))
        .collect()
}

fn bundled_depots() -> Vec<Depot> {
    let facilities = |tags: &[&str]| tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>();

    vec![
        Depot {
            id: "depot_1".to_string(),
            name: "KSRTC Ernakulam Depot".to_string(),
            kind: "main".to_string(),
            address: "MG Road, Ernakulam".to_string(),
            facilities: facilities(&["ticket_counter", "restroom", "canteen"]),
            position: Coordinate::from_degrees(9.9816, 76.2999),
            distance: None,
        },
        Depot {
            id: "depot_2".to_string(),
            name: "KSRTC Thrissur Depot".to_string(),
            kind: "main".to_string(),
            address: "Thrissur Bus Stand".to_string(),
            facilities: facilities(&["ticket_counter", "restroom"]),
            position: Coordinate::from_degrees(10.5276, 76.2144),
            distance: None,
        },
    ]
}
