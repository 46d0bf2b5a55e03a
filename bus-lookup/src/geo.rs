//! Great-circle distance and distance ranking.

use crate::domain::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Something with a position that can carry a computed distance.
pub trait Located: Sized {
    fn position(&self) -> Coordinate;

    /// Return a copy carrying `km` as its distance from some reference point.
    fn with_distance(self, km: f64) -> Self;
}

/// Haversine distance between two points, in kilometres.
///
/// # Examples
///
/// ```
/// use bus_lookup::domain::Coordinate;
/// use bus_lookup::geo::haversine_km;
///
/// let ernakulam = Coordinate::new(9.9816, 76.2999).unwrap();
/// let thrissur = Coordinate::new(10.5276, 76.2144).unwrap();
/// let d = haversine_km(ernakulam, thrissur);
/// assert!((d - 61.5).abs() < 0.5);
/// ```
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance rounded to metre precision (3 decimal places of a km).
///
/// This is the value stored on ranked records.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    (haversine_km(a, b) * 1000.0).round() / 1000.0
}

/// Attach distances from `origin`, optionally drop anything beyond
/// `radius_m` metres, sort nearest first and keep at most `limit`.
///
/// The sort is stable, so equidistant items keep their input order.
pub fn rank_by_distance<T: Located>(
    origin: Coordinate,
    items: impl IntoIterator<Item = T>,
    radius_m: Option<f64>,
    limit: usize,
) -> Vec<T> {
    let mut ranked: Vec<(f64, T)> = items
        .into_iter()
        .map(|item| {
            let km = distance_km(origin, item.position());
            (km, item.with_distance(km))
        })
        .filter(|(km, _)| radius_m.is_none_or(|r| km * 1000.0 <= r))
        .collect();

    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.truncate(limit);
    ranked.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BusStop;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn stop(id: &str, lat: f64, lng: f64) -> BusStop {
        BusStop::new(id, id, coord(lat, lng))
    }

    #[test]
    fn ernakulam_to_thrissur() {
        let d = haversine_km(coord(9.9816, 76.2999), coord(10.5276, 76.2144));
        assert!((d - 61.5).abs() <= 0.5, "got {d}");
    }

    #[test]
    fn zero_for_same_point() {
        let p = coord(11.2588, 75.7804);
        assert_eq!(haversine_km(p, p), 0.0);
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn rounds_to_metres() {
        let d = distance_km(coord(9.9816, 76.2999), coord(10.0523, 76.3305));
        assert_eq!(d, (d * 1000.0).round() / 1000.0);
    }

    #[test]
    fn rank_sorts_and_truncates() {
        let origin = coord(10.0, 76.0);
        let stops = vec![
            stop("far", 11.0, 76.0),
            stop("near", 10.01, 76.0),
            stop("mid", 10.5, 76.0),
        ];
        let ranked = rank_by_distance(origin, stops, None, 2);
        let ids: Vec<_> = ranked.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid"]);
        assert!(ranked.iter().all(|s| s.distance.is_some()));
    }

    #[test]
    fn rank_applies_radius() {
        let origin = coord(10.0, 76.0);
        let stops = vec![stop("near", 10.01, 76.0), stop("far", 11.0, 76.0)];
        let ranked = rank_by_distance(origin, stops, Some(5_000.0), 30);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, "near");
    }

    #[test]
    fn rank_of_nothing_is_empty() {
        let ranked: Vec<BusStop> = rank_by_distance(coord(0.0, 0.0), vec![], None, 30);
        assert!(ranked.is_empty());
    }
}
