//! Domain types for the bus lookup client.
//!
//! Records are immutable values built fresh for every request, either from
//! normalized live data or from the fallback dataset. Ranking replaces a
//! record with a copy carrying its distance; nothing is mutated in place.

mod bus;
mod coordinate;
mod depot;
mod error;
mod stop;

pub use bus::{Bus, BusCategory, same_place};
pub use coordinate::Coordinate;
pub use depot::Depot;
pub use error::DomainError;
pub use stop::BusStop;
