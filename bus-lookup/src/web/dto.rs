//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Bus, BusStop, Coordinate, Depot, DomainError};

/// Query for the coordinate-based lookups.
#[derive(Debug, Deserialize)]
pub struct NearbyRequest {
    pub lat: f64,
    pub lng: f64,

    /// Search radius in metres (defaults to the lookup's configured radius)
    pub radius: Option<u32>,
}

impl NearbyRequest {
    pub fn center(&self) -> Result<Coordinate, DomainError> {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Query for a route search.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub from: String,
    pub to: String,
}

/// Device position reported by the client, if it has one.
#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct StopsResponse {
    pub count: usize,
    pub stops: Vec<BusStop>,
}

impl From<Vec<BusStop>> for StopsResponse {
    fn from(stops: Vec<BusStop>) -> Self {
        Self {
            count: stops.len(),
            stops,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub from: String,
    pub to: String,
    pub routes: Vec<Bus>,
}

/// A depot plus a link for turn-by-turn directions.
#[derive(Debug, Serialize)]
pub struct DepotResult {
    #[serde(flatten)]
    pub depot: Depot,
    pub directions_url: String,
}

impl From<Depot> for DepotResult {
    fn from(depot: Depot) -> Self {
        Self {
            directions_url: depot.directions_url(),
            depot,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DepotResponse {
    pub depot: Option<DepotResult>,
}

/// Stops and nearest depot for one point.
#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub stops: StopsResponse,
    pub depot: Option<DepotResult>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn depot() -> Depot {
        Depot {
            id: "depot_1".to_string(),
            name: "KSRTC Ernakulam Depot".to_string(),
            kind: "main".to_string(),
            address: "MG Road, Ernakulam".to_string(),
            facilities: BTreeSet::from(["restroom".to_string()]),
            position: Coordinate::new(9.9816, 76.2999).unwrap(),
            distance: Some(1.25),
        }
    }

    #[test]
    fn depot_result_is_flat() {
        let json = serde_json::to_value(DepotResult::from(depot())).unwrap();
        assert_eq!(json["id"], "depot_1");
        assert_eq!(json["type"], "main");
        assert_eq!(json["lat"], 9.9816);
        assert_eq!(json["distance"], 1.25);
        assert_eq!(
            json["directions_url"],
            "https://www.google.com/maps/dir/?api=1&destination=9.9816,76.2999"
        );
    }

    #[test]
    fn stops_response_counts() {
        let stop = BusStop::new("s1", "Aluva", Coordinate::new(10.1, 76.35).unwrap());
        let json = serde_json::to_value(StopsResponse::from(vec![stop])).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["stops"][0]["name"], "Aluva");
    }

    #[test]
    fn nearby_request_validates() {
        let ok = NearbyRequest {
            lat: 10.0,
            lng: 76.0,
            radius: None,
        };
        assert!(ok.center().is_ok());

        let bad = NearbyRequest {
            lat: -91.0,
            lng: 76.0,
            radius: None,
        };
        assert_eq!(bad.center(), Err(DomainError::LatitudeOutOfRange(-91.0)));
    }
}
