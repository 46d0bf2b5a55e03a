//! Conversion from source candidates to domain records.
//!
//! Fills in the defaults for fields the sources left out. All functions are
//! pure so the live path and tests share them.

use std::collections::HashSet;

use crate::domain::{Bus, BusCategory, BusStop, Coordinate, Depot};
use crate::geo::rank_by_distance;
use crate::sources::{DepotCandidate, RouteCandidate, StopCandidate};

/// Shown for departure or arrival times the source did not publish.
pub const UNKNOWN_TIME: &str = "N/A";

/// Rank live stops around `center` and fill in missing ids and names.
///
/// Stops are sorted nearest first, duplicates by id are dropped (keeping the
/// nearer), the list is cut to `limit`, and then unnamed stops are called
/// "Bus Stop {n}" after their position in the final list.
pub fn normalize_stops(center: Coordinate, candidates: Vec<StopCandidate>, limit: usize) -> Vec<BusStop> {
    let stops = candidates.into_iter().enumerate().map(|(i, c)| {
        let id = c.id.unwrap_or_else(|| format!("generated-{}", i + 1));
        BusStop {
            id,
            name: c.name.unwrap_or_default(),
            position: c.position,
            distance: None,
        }
    });

    let mut seen = HashSet::new();
    let ranked: Vec<BusStop> = rank_by_distance(center, stops, None, usize::MAX)
        .into_iter()
        .filter(|stop| seen.insert(stop.id.clone()))
        .take(limit)
        .collect();

    name_unnamed(ranked)
}

/// Give every blank-named stop its positional placeholder name.
pub fn name_unnamed(stops: Vec<BusStop>) -> Vec<BusStop> {
    stops
        .into_iter()
        .enumerate()
        .map(|(i, stop)| {
            if stop.name.trim().is_empty() {
                BusStop {
                    name: BusStop::placeholder_name(i),
                    ..stop
                }
            } else {
                stop
            }
        })
        .collect()
}

/// Convert route candidates for a `from` → `to` query.
///
/// Missing endpoints default to the queried names. Missing ids become
/// negative placeholders (-1, -2, ...) so they cannot collide with real ids.
pub fn normalize_routes(from: &str, to: &str, candidates: Vec<RouteCandidate>) -> Vec<Bus> {
    candidates
        .into_iter()
        .enumerate()
        .map(|(i, c)| Bus {
            id: c.id.unwrap_or(-(i as i64) - 1),
            from: non_blank(c.from).unwrap_or_else(|| from.to_string()),
            to: non_blank(c.to).unwrap_or_else(|| to.to_string()),
            category: BusCategory::from_signals(c.category_label.as_deref(), c.is_express),
            departure: non_blank(c.departure).unwrap_or_else(|| UNKNOWN_TIME.to_string()),
            arrival: non_blank(c.arrival).unwrap_or_else(|| UNKNOWN_TIME.to_string()),
            stops: c
                .stops
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            stop_locations: (!c.stop_locations.is_empty()).then_some(c.stop_locations),
            fare: c.fare.filter(|f| f.is_finite() && *f >= 0.0),
            duration: non_blank(c.duration),
            bus_number: non_blank(c.bus_number),
        })
        .collect()
}

/// Convert depot candidates, filling in name, type and address.
pub fn normalize_depots(candidates: Vec<DepotCandidate>, unnamed: &str) -> Vec<Depot> {
    candidates
        .into_iter()
        .enumerate()
        .map(|(i, c)| Depot {
            id: c.id.unwrap_or_else(|| format!("depot-{}", i + 1)),
            name: non_blank(c.name).unwrap_or_else(|| unnamed.to_string()),
            kind: non_blank(c.network).unwrap_or_else(|| "main".to_string()),
            address: non_blank(c.address).unwrap_or_else(|| c.position.to_string()),
            facilities: c.facilities.into_iter().collect(),
            position: c.position,
            distance: None,
        })
        .collect()
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
