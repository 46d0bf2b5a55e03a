//! Live status of each upstream source, for display by the caller.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

/// Shown when the stop/depot source fails.
pub const STOPS_UNAVAILABLE: &str = "Bus stop data unavailable. Using cached data...";
/// Shown when the route source fails.
pub const ROUTES_UNAVAILABLE: &str = "Route information temporarily unavailable";
/// Shown when the device location could not be read.
pub const LOCATION_UNAVAILABLE: &str = "Enable location services for accurate results";
/// Shown when a source could not be reached at all.
pub const NETWORK_REQUIRED: &str = "Network connection required";

/// Which upstream a status refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Geospatial source for stops and depots.
    Overpass,
    /// Route source.
    Routes,
}

impl SourceKind {
    pub fn failure_message(&self) -> &'static str {
        match self {
            SourceKind::Overpass => STOPS_UNAVAILABLE,
            SourceKind::Routes => ROUTES_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Status of one source plus the message to show for it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SourceState {
    pub status: ApiStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Point-in-time copy of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub overpass: SourceState,
    pub routes: SourceState,
    pub requests_this_minute: u32,
}

#[derive(Debug, Default)]
struct Board {
    overpass: SourceState,
    routes: SourceState,
}

impl Board {
    fn slot(&mut self, kind: SourceKind) -> &mut SourceState {
        match kind {
            SourceKind::Overpass => &mut self.overpass,
            SourceKind::Routes => &mut self.routes,
        }
    }
}

/// Shared status board. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    inner: Arc<Mutex<Board>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_loading(&self, kind: SourceKind) {
        self.set(kind, ApiStatus::Loading, None);
    }

    pub fn mark_success(&self, kind: SourceKind) {
        self.set(kind, ApiStatus::Success, None);
    }

    /// Record a failure. `unreachable` selects the network message.
    pub fn mark_error(&self, kind: SourceKind, unreachable: bool) {
        let message = if unreachable {
            NETWORK_REQUIRED
        } else {
            kind.failure_message()
        };
        self.set(kind, ApiStatus::Error, Some(message));
    }

    pub fn get(&self, kind: SourceKind) -> SourceState {
        let mut board = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        board.slot(kind).clone()
    }

    pub fn snapshot(&self, requests_this_minute: u32) -> StatusSnapshot {
        let board = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        StatusSnapshot {
            overpass: board.overpass.clone(),
            routes: board.routes.clone(),
            requests_this_minute,
        }
    }

    fn set(&self, kind: SourceKind, status: ApiStatus, message: Option<&'static str>) {
        let mut board = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *board.slot(kind) = SourceState { status, message };
    }
}
