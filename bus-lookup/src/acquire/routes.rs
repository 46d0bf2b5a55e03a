//! Route search between two named places.

use tracing::{debug, info, warn};

use crate::cache::KeyValueStore;
use crate::domain::Bus;
use crate::sources::{DepotSource, RouteResponse, RouteSource, StopSource};
use crate::status::SourceKind;

use super::normalize::normalize_routes;
use super::{BusLookup, FetchOutcome, keys};

impl<P, R, D, S> BusLookup<P, R, D, S>
where
    P: StopSource,
    R: RouteSource,
    D: DepotSource,
    S: KeyValueStore,
{
    /// Buses running between `from` and `to`.
    ///
    /// A definitive "not found" from the route source is answered with an
    /// empty list; it is neither cached nor replaced by fallback routes.
    pub async fn find_routes(&self, from: &str, to: &str) -> Vec<Bus> {
        let (from, to) = (from.trim(), to.trim());
        if from.is_empty() || to.is_empty() {
            return Vec::new();
        }

        let key = keys::routes_key(from, to);
        if let Some(cached) = self.cache.get::<Vec<Bus>>(&key).await {
            return cached;
        }

        let outcome = self
            .fetch_live(SourceKind::Routes, || self.sources.routes.routes(from, to))
            .await
            .and_then(|response| match response {
                RouteResponse::NotFound => FetchOutcome::NotFound,
                RouteResponse::Found(candidates) => {
                    FetchOutcome::non_empty(normalize_routes(from, to, candidates), Vec::is_empty)
                }
            });

        match outcome {
            FetchOutcome::Success(buses) => {
                debug!(count = buses.len(), from, to, "Live routes");
                self.cache.set(&key, &buses).await;
                buses
            }
            FetchOutcome::NotFound => {
                info!(from, to, "No routes between places");
                Vec::new()
            }
            other => {
                warn!(outcome = other.label(), from, to, "Serving fallback routes");
                self.fallback.routes_between(from, to)
            }
        }
    }
}
