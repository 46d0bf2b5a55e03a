//! Acquisition core: decides, per request, whether to answer from the
//! cache, the live sources or the fallback dataset.
//!
//! Every lookup follows the same path:
//!
//! 1. Cache check on a key built from the rounded inputs.
//! 2. Rate-limiter permit (a refusal counts as a failure).
//! 3. Retried live request.
//! 4. Normalization and distance ranking.
//! 5. Cache write of the live answer.
//!
//! Anything short of usable live data resolves to the fallback dataset,
//! which is never cached. Lookups never return an error.

mod config;
mod depots;
pub mod keys;
pub mod normalize;
mod outcome;
mod routes;
mod stops;

#[cfg(test)]
mod testing;

use std::future::Future;
use std::sync::Arc;

use tracing::warn;

use crate::cache::{ExpiringCache, KeyValueStore};
use crate::fallback::FallbackDataset;
use crate::rate_limit::RateLimiter;
use crate::retry::with_retry;
use crate::sources::{DepotSource, RouteSource, SourceError, StopSource};
use crate::status::{SourceKind, StatusBoard, StatusSnapshot};

pub use config::{AcquisitionConfig, DEFAULT_RADIUS_M, MAX_STOPS};
pub use outcome::FetchOutcome;

/// The live sources a [`BusLookup`] draws from.
#[derive(Debug, Clone)]
pub struct Sources<P, R, D> {
    pub stops: P,
    pub routes: R,
    pub depots: D,
}

/// Stop, route and depot lookups with caching, rate limiting, retries and
/// fallback.
///
/// All state is owned by the instance, so independent lookups (e.g. in
/// tests) never share a cache or a rate window unless handed clones of the
/// same ones.
pub struct BusLookup<P, R, D, S> {
    sources: Sources<P, R, D>,
    cache: ExpiringCache<S>,
    limiter: RateLimiter,
    fallback: Arc<FallbackDataset>,
    status: StatusBoard,
    config: AcquisitionConfig,
}

impl<P, R, D, S> BusLookup<P, R, D, S>
where
    P: StopSource,
    R: RouteSource,
    D: DepotSource,
    S: KeyValueStore,
{
    /// Create a lookup with a fresh rate window, the bundled fallback data
    /// and an idle status board.
    pub fn new(sources: Sources<P, R, D>, cache: ExpiringCache<S>, config: AcquisitionConfig) -> Self {
        Self {
            sources,
            cache,
            limiter: RateLimiter::default(),
            fallback: Arc::new(FallbackDataset::bundled()),
            status: StatusBoard::new(),
            config,
        }
    }

    /// Use a specific (possibly shared) rate limiter.
    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Use a different fallback dataset.
    pub fn with_fallback(mut self, fallback: FallbackDataset) -> Self {
        self.fallback = Arc::new(fallback);
        self
    }

    /// Report into a specific (possibly shared) status board.
    pub fn with_status(mut self, status: StatusBoard) -> Self {
        self.status = status;
        self
    }

    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    pub fn cache(&self) -> &ExpiringCache<S> {
        &self.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn fallback(&self) -> &FallbackDataset {
        &self.fallback
    }

    /// Current source statuses and the request count for this window.
    pub fn status(&self) -> StatusSnapshot {
        self.status.snapshot(self.limiter.requests_this_window())
    }

    /// Gate, retry and report one live request.
    async fn fetch_live<T, F, Fut>(&self, kind: SourceKind, operation: F) -> FetchOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        if !self.limiter.try_acquire() {
            warn!(source = ?kind, "Rate limit reached, skipping live request");
            return FetchOutcome::Denied;
        }

        self.status.mark_loading(kind);
        match with_retry(&self.config.retry, operation).await {
            Ok(value) => {
                self.status.mark_success(kind);
                FetchOutcome::Success(value)
            }
            Err(e) => {
                self.status.mark_error(kind, e.is_unreachable());
                FetchOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::testing::*;
    use crate::rate_limit::RateLimiter;
    use crate::status::{ApiStatus, StatusBoard};

    #[tokio::test(start_paused = true)]
    async fn shared_limiter_and_board_span_lookups() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let board = StatusBoard::new();
        let first = offline()
            .with_limiter(limiter.clone())
            .with_status(board.clone());
        let second = offline()
            .with_limiter(limiter.clone())
            .with_status(board.clone());
        let center = coord(10.0, 76.3);

        first.nearby_stops(center, 5_000).await;
        second.find_routes("Ernakulam", "Kozhikode").await;
        assert_eq!(limiter.requests_this_window(), 2);
        assert_eq!(first.status().requests_this_minute, 2);
        assert_eq!(second.status().overpass.status, ApiStatus::Error);
        assert_eq!(first.status().routes.status, ApiStatus::Error);

        // Window exhausted by the other lookup: no request goes out.
        let stops = first.nearby_stops(center, 5_000).await;
        assert_eq!(stops.len(), first.fallback().stops.len());
        assert_eq!(first.sources.stops.calls(), 3);

        tokio::time::advance(Duration::from_secs(61)).await;
        second.nearby_stops(center, 5_000).await;
        assert_eq!(second.sources.stops.calls(), 3);
        assert_eq!(limiter.requests_this_window(), 1);
    }
}
