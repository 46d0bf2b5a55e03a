//! Scripted sources for exercising the acquisition core.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::cache::{CacheConfig, ExpiringCache, MemoryStore};
use crate::domain::Coordinate;
use crate::retry::RetryPolicy;
use crate::sources::{
    DepotCandidate, DepotSource, RouteResponse, RouteSource, SourceError, StopCandidate,
    StopSource,
};

use super::{AcquisitionConfig, BusLookup, Sources};

/// Replays queued answers in order; once drained, every call fails.
pub struct Scripted<T> {
    answers: Mutex<VecDeque<Result<T, SourceError>>>,
    calls: AtomicUsize,
}

impl<T: Clone> Scripted<T> {
    /// A source that always fails.
    pub fn down() -> Self {
        Self::new(vec![])
    }

    /// A source that answers `value` every time.
    pub fn always(value: T) -> Self {
        Self::new((0..64).map(|_| Ok(value.clone())).collect())
    }

    pub fn new(answers: Vec<Result<T, SourceError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> Result<T, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }
}

pub fn unavailable() -> SourceError {
    SourceError::Api {
        status: 503,
        message: "Service Unavailable".to_string(),
    }
}

impl StopSource for Scripted<Vec<StopCandidate>> {
    async fn stops_near(
        &self,
        _center: Coordinate,
        _radius_m: u32,
        _limit: usize,
    ) -> Result<Vec<StopCandidate>, SourceError> {
        self.next()
    }
}

impl RouteSource for Scripted<RouteResponse> {
    async fn routes(&self, _from: &str, _to: &str) -> Result<RouteResponse, SourceError> {
        self.next()
    }
}

impl DepotSource for Scripted<Vec<DepotCandidate>> {
    async fn depots_near(
        &self,
        _center: Coordinate,
        _radius_m: u32,
    ) -> Result<Vec<DepotCandidate>, SourceError> {
        self.next()
    }
}

pub type TestLookup = BusLookup<
    Scripted<Vec<StopCandidate>>,
    Scripted<RouteResponse>,
    Scripted<Vec<DepotCandidate>>,
    MemoryStore,
>;

/// Retry policy with the real attempt count but short delays.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(10))
}

pub fn lookup(
    stops: Scripted<Vec<StopCandidate>>,
    routes: Scripted<RouteResponse>,
    depots: Scripted<Vec<DepotCandidate>>,
) -> TestLookup {
    BusLookup::new(
        Sources {
            stops,
            routes,
            depots,
        },
        ExpiringCache::new(MemoryStore::new(), &CacheConfig::default()),
        AcquisitionConfig::new(fast_retry()),
    )
}

/// A lookup whose every source is down.
pub fn offline() -> TestLookup {
    lookup(Scripted::down(), Scripted::down(), Scripted::down())
}

pub fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).unwrap()
}
