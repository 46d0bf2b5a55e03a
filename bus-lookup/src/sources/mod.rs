//! Upstream data sources.
//!
//! - An Overpass-class geospatial service answers stop and depot queries.
//! - A route source answers trip lookups by place name, either as JSON or
//!   (for some deployments) as an HTML timetable.
//!
//! Clients report raw candidates; the acquisition core owns naming
//! defaults, ranking and fallback.

mod error;
mod html;
mod kbuses;
mod overpass;
mod traits;
mod types;

pub use error::SourceError;
pub use html::{HtmlRouteClient, HtmlRouteConfig, parse_timetable};
pub use kbuses::{RouteClient, RouteClientConfig, parse_routes};
pub use overpass::{
    OverpassClient, OverpassConfig, depot_candidate, depots_query, stop_candidate, stops_query,
};
pub use traits::{
    DepotCandidate, DepotSource, RouteCandidate, RouteResponse, RouteSource, StopCandidate,
    StopSource,
};
pub use types::{OverpassElement, OverpassResponse, RouteBody, RouteDto};

/// Route backend selected at runtime from configuration.
#[derive(Debug, Clone)]
pub enum AnyRouteSource {
    Json(RouteClient),
    Html(HtmlRouteClient),
}

impl RouteSource for AnyRouteSource {
    async fn routes(&self, from: &str, to: &str) -> Result<RouteResponse, SourceError> {
        match self {
            AnyRouteSource::Json(client) => client.routes(from, to).await,
            AnyRouteSource::Html(client) => client.routes(from, to).await,
        }
    }
}
