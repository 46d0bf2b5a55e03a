//! Application state for the web layer.

use std::sync::Arc;

use crate::acquire::BusLookup;
use crate::cache::AnyStore;
use crate::sources::{AnyRouteSource, OverpassClient};

/// The lookup wired to the real upstream clients.
pub type AppLookup = BusLookup<OverpassClient, AnyRouteSource, OverpassClient, AnyStore>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<AppLookup>,
}

impl AppState {
    pub fn new(lookup: AppLookup) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }
}
