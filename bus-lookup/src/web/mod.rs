//! JSON HTTP surface over the bus lookup.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppLookup, AppState};
