//! Nearby stops lookup.

use tracing::{debug, warn};

use crate::cache::KeyValueStore;
use crate::domain::{BusStop, Coordinate};
use crate::geo::rank_by_distance;
use crate::sources::{DepotSource, RouteSource, StopSource};
use crate::status::SourceKind;

use super::normalize::{name_unnamed, normalize_stops};
use super::{BusLookup, FetchOutcome, keys};

impl<P, R, D, S> BusLookup<P, R, D, S>
where
    P: StopSource,
    R: RouteSource,
    D: DepotSource,
    S: KeyValueStore,
{
    /// Up to `max_stops` stops within `radius_m` metres of `center`,
    /// nearest first.
    ///
    /// An empty live answer is a valid (cached) result; failures resolve to
    /// the fallback stops ranked by distance.
    pub async fn nearby_stops(&self, center: Coordinate, radius_m: u32) -> Vec<BusStop> {
        if !center.is_valid() {
            warn!(%center, "Rejecting stop lookup for invalid coordinate");
            return Vec::new();
        }

        let limit = self.config.max_stops;
        let key = keys::stops_key(center, radius_m);

        if let Some(cached) = self.cache.get::<Vec<BusStop>>(&key).await {
            return cached.into_iter().take(limit).collect();
        }

        let outcome = self
            .fetch_live(SourceKind::Overpass, || {
                self.sources.stops.stops_near(center, radius_m, limit)
            })
            .await
            .and_then(|candidates| FetchOutcome::Success(normalize_stops(center, candidates, limit)));

        match outcome {
            FetchOutcome::Success(stops) => {
                debug!(count = stops.len(), "Live stops");
                self.cache.set(&key, &stops).await;
                stops
            }
            other => {
                warn!(outcome = other.label(), "Serving fallback stops");
                self.fallback_stops(center, radius_m)
            }
        }
    }

    /// Fallback stops ranked around `center`. Never cached.
    pub fn fallback_stops(&self, center: Coordinate, radius_m: u32) -> Vec<BusStop> {
        let radius = self
            .config
            .enforce_fallback_radius
            .then_some(f64::from(radius_m));

        let ranked = rank_by_distance(
            center,
            self.fallback.stops.iter().cloned(),
            radius,
            self.config.max_stops,
        );
        name_unnamed(ranked)
    }
}
