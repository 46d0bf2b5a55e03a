//! Source-neutral candidates and the traits the acquisition core calls.
//!
//! Sources report what they found with as little interpretation as
//! possible; naming, id and category defaults are applied by the core.

use std::future::Future;

use crate::domain::Coordinate;

use super::error::SourceError;

/// A stop as reported by a stop source.
#[derive(Debug, Clone, PartialEq)]
pub struct StopCandidate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub position: Coordinate,
}

/// A depot facility as reported by a depot source.
#[derive(Debug, Clone, PartialEq)]
pub struct DepotCandidate {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Operator network label, used as the depot type.
    pub network: Option<String>,
    pub address: Option<String>,
    pub facilities: Vec<String>,
    pub position: Coordinate,
}

/// A route record as reported by a route source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteCandidate {
    pub id: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Category label as published (e.g. "AC", "Fast Passenger").
    pub category_label: Option<String>,
    pub is_express: bool,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub stops: Vec<String>,
    pub stop_locations: Vec<Coordinate>,
    pub fare: Option<f64>,
    pub duration: Option<String>,
    pub bus_number: Option<String>,
}

/// Answer from a route source.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteResponse {
    /// Records found (possibly none usable).
    Found(Vec<RouteCandidate>),
    /// The source explicitly has no route for this pair.
    NotFound,
}

/// Something that lists bus stops around a point.
pub trait StopSource: Send + Sync {
    /// Stops within `radius_m` metres of `center`, at most `limit` of them.
    fn stops_near(
        &self,
        center: Coordinate,
        radius_m: u32,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<StopCandidate>, SourceError>> + Send;
}

/// Something that lists scheduled trips between two places.
pub trait RouteSource: Send + Sync {
    /// Trips from `from` to `to`. Names are already trimmed.
    fn routes(
        &self,
        from: &str,
        to: &str,
    ) -> impl Future<Output = Result<RouteResponse, SourceError>> + Send;
}

/// Something that lists operator depots around a point.
pub trait DepotSource: Send + Sync {
    /// Depots within `radius_m` metres of `center`.
    fn depots_near(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> impl Future<Output = Result<Vec<DepotCandidate>, SourceError>> + Send;
}
