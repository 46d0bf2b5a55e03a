//! Nearest depot lookup.

use tracing::{debug, warn};

use crate::cache::KeyValueStore;
use crate::domain::{Coordinate, Depot};
use crate::geo::rank_by_distance;
use crate::sources::{DepotSource, RouteSource, StopSource};
use crate::status::SourceKind;

use super::normalize::normalize_depots;
use super::{BusLookup, FetchOutcome, keys};

impl<P, R, D, S> BusLookup<P, R, D, S>
where
    P: StopSource,
    R: RouteSource,
    D: DepotSource,
    S: KeyValueStore,
{
    /// The depot nearest to `center` within `radius_m` metres, with its
    /// distance filled in.
    ///
    /// Live depots outside the radius are ignored. If none remain, the
    /// nearest fallback depot is returned.
    pub async fn nearest_depot(&self, center: Coordinate, radius_m: u32) -> Option<Depot> {
        if !center.is_valid() {
            warn!(%center, "Rejecting depot lookup for invalid coordinate");
            return None;
        }

        let key = keys::depot_key(center, radius_m);
        if let Some(cached) = self.cache.get::<Depot>(&key).await {
            return Some(cached);
        }

        let unnamed = self.config.unnamed_depot();
        let outcome = self
            .fetch_live(SourceKind::Overpass, || {
                self.sources.depots.depots_near(center, radius_m)
            })
            .await
            .and_then(|candidates| {
                let depots = normalize_depots(candidates, &unnamed);
                match rank_by_distance(center, depots, Some(f64::from(radius_m)), 1).pop() {
                    Some(depot) => FetchOutcome::Success(depot),
                    None => FetchOutcome::Empty,
                }
            });

        match outcome {
            FetchOutcome::Success(depot) => {
                debug!(id = %depot.id, distance = ?depot.distance, "Live depot");
                self.cache.set(&key, &depot).await;
                Some(depot)
            }
            other => {
                warn!(outcome = other.label(), "Serving fallback depot");
                self.fallback_depot(center, radius_m)
            }
        }
    }

    /// Nearest fallback depot to `center`. Never cached.
    pub fn fallback_depot(&self, center: Coordinate, radius_m: u32) -> Option<Depot> {
        let radius = self
            .config
            .enforce_fallback_radius
            .then_some(f64::from(radius_m));

        rank_by_distance(center, self.fallback.depots.iter().cloned(), radius, 1).pop()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use crate::cache::KeyValueStore;
    use crate::geo::distance_km;
    use crate::sources::DepotCandidate;

    fn candidate(id: &str, name: Option<&str>, lat: f64, lng: f64) -> DepotCandidate {
        DepotCandidate {
            id: Some(id.to_string()),
            name: name.map(str::to_string),
            network: None,
            address: None,
            facilities: vec![],
            position: coord(lat, lng),
        }
    }

    fn depots_only(depots: Vec<DepotCandidate>) -> TestLookup {
        lookup(Scripted::down(), Scripted::down(), Scripted::always(depots))
    }

    #[tokio::test(start_paused = true)]
    async fn offline_returns_nearest_fallback_depot() {
        let lookup = offline();
        let center = coord(10.5, 76.2);

        let depot = lookup.nearest_depot(center, 50_000).await.unwrap();
        assert_eq!(depot.id, "depot_2");
        assert_eq!(depot.distance, Some(distance_km(center, depot.position)));

        let key = super::keys::depot_key(center, 50_000);
        assert_eq!(lookup.cache().store().get(&key).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_radius_cutoff_when_enabled() {
        let mut lookup = offline();
        lookup.config.enforce_fallback_radius = true;

        assert!(lookup.nearest_depot(coord(12.0, 75.0), 10_000).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn live_nearest_within_radius_is_cached() {
        let lookup = depots_only(vec![
            candidate("far", Some("Far Depot"), 10.3, 76.0),
            candidate("near", None, 10.05, 76.0),
        ]);
        let center = coord(10.0, 76.0);

        let depot = lookup.nearest_depot(center, 50_000).await.unwrap();
        assert_eq!(depot.id, "near");
        assert_eq!(depot.name, "KSRTC Depot");
        assert!(depot.distance.unwrap() > 5.0 && depot.distance.unwrap() < 6.0);

        let again = lookup.nearest_depot(center, 50_000).await.unwrap();
        assert_eq!(again, depot);
        assert_eq!(lookup.sources.depots.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn live_depots_outside_radius_fall_back() {
        let lookup = depots_only(vec![candidate("far", Some("Far Depot"), 11.0, 76.0)]);

        let depot = lookup.nearest_depot(coord(10.0, 76.3), 5_000).await.unwrap();
        assert_eq!(depot.id, "depot_1");
    }

    #[tokio::test(start_paused = true)]
    async fn empty_live_answer_falls_back() {
        let lookup = depots_only(vec![]);
        let depot = lookup.nearest_depot(coord(10.0, 76.3), 5_000).await.unwrap();
        assert_eq!(depot.id, "depot_1");
    }
}
