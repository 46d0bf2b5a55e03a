//! Device location with a fixed fallback point.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::domain::Coordinate;
use crate::status::LOCATION_UNAVAILABLE;

/// Ernakulam city centre, used when the device position is unknown.
pub const DEFAULT_LOCATION: Coordinate = Coordinate::from_degrees(9.9816, 76.2999);

/// How long to wait for the device before giving up.
pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from a location provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Source of the device's current position.
pub trait LocationProvider: Send + Sync {
    fn current_position(&self) -> impl Future<Output = Result<Coordinate, LocationError>> + Send;
}

/// Provider that always reports the same point.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }
}

/// A position ready for lookups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedLocation {
    pub position: Coordinate,

    /// Message for the user when `position` is the default rather than the
    /// device's own fix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

impl ResolvedLocation {
    pub fn is_default(&self) -> bool {
        self.notice.is_some()
    }

    fn fallback() -> Self {
        Self {
            position: DEFAULT_LOCATION,
            notice: Some(LOCATION_UNAVAILABLE),
        }
    }
}

/// Ask `provider` for a position, substituting [`DEFAULT_LOCATION`] on
/// error, timeout or an out-of-range fix. Never fails.
pub async fn resolve_location<P: LocationProvider>(provider: &P, timeout: Duration) -> ResolvedLocation {
    match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(Ok(position)) if position.is_valid() => ResolvedLocation {
            position,
            notice: None,
        },
        Ok(Ok(position)) => {
            warn!(%position, "Ignoring out-of-range device location");
            ResolvedLocation::fallback()
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Device location failed, using default");
            ResolvedLocation::fallback()
        }
        Err(_) => {
            warn!(?timeout, "Device location timed out, using default");
            ResolvedLocation::fallback()
        }
    }
}
