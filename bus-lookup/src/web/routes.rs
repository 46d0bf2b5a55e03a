//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::warn;

use crate::domain::{Coordinate, DomainError};
use crate::location::{
    DEFAULT_LOCATION_TIMEOUT, LocationError, LocationProvider, ResolvedLocation, resolve_location,
};
use crate::status::StatusSnapshot;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stops/nearby", get(nearby_stops))
        .route("/api/depots/nearest", get(nearest_depot))
        .route("/api/nearby", get(nearby))
        .route("/api/routes", get(find_routes))
        .route("/api/status", get(status))
        .route("/api/location", get(location))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn nearby_stops(
    State(state): State<AppState>,
    Query(req): Query<NearbyRequest>,
) -> Result<Json<StopsResponse>, AppError> {
    let center = req.center()?;
    let radius = req.radius.unwrap_or(state.lookup.config().default_radius_m);

    let stops = state.lookup.nearby_stops(center, radius).await;
    Ok(Json(stops.into()))
}

async fn nearest_depot(
    State(state): State<AppState>,
    Query(req): Query<NearbyRequest>,
) -> Result<Json<DepotResponse>, AppError> {
    let center = req.center()?;
    let radius = req.radius.unwrap_or(state.lookup.config().default_radius_m);

    let depot = state.lookup.nearest_depot(center, radius).await;
    Ok(Json(DepotResponse {
        depot: depot.map(DepotResult::from),
    }))
}

/// Stops and nearest depot in one round trip.
async fn nearby(
    State(state): State<AppState>,
    Query(req): Query<NearbyRequest>,
) -> Result<Json<NearbyResponse>, AppError> {
    let center = req.center()?;
    let radius = req.radius.unwrap_or(state.lookup.config().default_radius_m);

    let (stops, depot) = futures::join!(
        state.lookup.nearby_stops(center, radius),
        state.lookup.nearest_depot(center, radius),
    );

    Ok(Json(NearbyResponse {
        stops: stops.into(),
        depot: depot.map(DepotResult::from),
    }))
}

async fn find_routes(
    State(state): State<AppState>,
    Query(req): Query<RouteRequest>,
) -> Result<Json<RoutesResponse>, AppError> {
    let (from, to) = (req.from.trim(), req.to.trim());
    if from.is_empty() || to.is_empty() {
        return Err(AppError::BadRequest {
            message: "Both from and to are required".to_string(),
        });
    }

    let routes = state.lookup.find_routes(from, to).await;
    Ok(Json(RoutesResponse {
        from: from.to_string(),
        to: to.to_string(),
        routes,
    }))
}

async fn status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.lookup.status())
}

/// Resolve the position the client reported, or the default location.
async fn location(Query(req): Query<LocationRequest>) -> Json<ResolvedLocation> {
    let reported = ReportedLocation(req.lat.zip(req.lng));
    Json(resolve_location(&reported, DEFAULT_LOCATION_TIMEOUT).await)
}

/// A position handed over by the client instead of read from a device.
struct ReportedLocation(Option<(f64, f64)>);

impl LocationProvider for ReportedLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        let (lat, lng) = self
            .0
            .ok_or_else(|| LocationError::Unavailable("no position reported".to_string()))?;
        Coordinate::new(lat, lng).map_err(|e| LocationError::Unavailable(e.to_string()))
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
        };

        warn!(%status, %message, "Request rejected");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
