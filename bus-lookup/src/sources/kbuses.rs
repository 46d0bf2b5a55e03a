//! JSON route source.
//!
//! Looks up trips by origin and destination name via
//! `/v3/Find/source/{from}/destination/{to}/type/all/timing/all`.

use std::time::Duration;

use reqwest::Url;
use reqwest::header::{ACCEPT, CACHE_CONTROL, HeaderMap, HeaderValue};

use crate::domain::Coordinate;

use super::error::SourceError;
use super::traits::{RouteCandidate, RouteResponse, RouteSource};
use super::types::{RouteBody, RouteDto};

/// Default route source base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.kbuses.in";

/// Configuration for the route client.
#[derive(Debug, Clone)]
pub struct RouteClientConfig {
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl RouteClientConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for RouteClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the lookup URL, percent-encoding both place names.
pub(crate) fn find_url(base_url: &str, from: &str, to: &str) -> Result<Url, SourceError> {
    let mut url = Url::parse(base_url).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| SourceError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend([
            "v3", "Find", "source", from, "destination", to, "type", "all", "timing", "all",
        ]);
    Ok(url)
}

/// Client for the JSON route source.
#[derive(Debug, Clone)]
pub struct RouteClient {
    http: reqwest::Client,
    base_url: String,
}

impl RouteClient {
    pub fn new(config: RouteClientConfig) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }
}

impl RouteSource for RouteClient {
    async fn routes(&self, from: &str, to: &str) -> Result<RouteResponse, SourceError> {
        let url = find_url(&self.base_url, from, to)?;

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(RouteResponse::NotFound);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;
        parse_routes(&body)
    }
}

/// Decode a route source body.
pub fn parse_routes(body: &str) -> Result<RouteResponse, SourceError> {
    let parsed: RouteBody = serde_json::from_str(body).map_err(|e| SourceError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })?;

    let records = match parsed {
        RouteBody::List(records) => records,
        RouteBody::Wrapped {
            routes: Some(records),
            ..
        } => records,
        RouteBody::Wrapped {
            routes: None,
            status,
        } => {
            let not_found = status
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains("not found") || s.trim() == "404");
            if not_found {
                return Ok(RouteResponse::NotFound);
            }
            Vec::new()
        }
    };

    Ok(RouteResponse::Found(
        records
            .into_iter()
            .filter_map(RouteDto::from_value)
            .map(route_candidate)
            .collect(),
    ))
}

fn route_candidate(dto: RouteDto) -> RouteCandidate {
    let id = dto.id.as_ref().and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });

    RouteCandidate {
        id,
        from: dto.source,
        to: dto.destination,
        category_label: dto.kind,
        is_express: dto.is_express.unwrap_or(false),
        departure: dto.departure_time,
        arrival: dto.arrival_time,
        stops: dto.intermediate_stops.unwrap_or_default(),
        stop_locations: dto
            .stop_locations
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| Coordinate::new(p.lat, p.lng).ok())
            .collect(),
        fare: dto.fare,
        duration: dto.duration,
        bus_number: dto.bus_number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = RouteClientConfig::new()
            .with_base_url("http://localhost:9000")
            .with_timeout(3);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn client_creation() {
        assert!(RouteClient::new(RouteClientConfig::default()).is_ok());
    }

    #[test]
    fn find_url_encodes_names() {
        let url = find_url("https://www.kbuses.in", "Thiruvananthapuram Central", "Kozhikode/KSRTC").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.kbuses.in/v3/Find/source/Thiruvananthapuram%20Central/destination/Kozhikode%2FKSRTC/type/all/timing/all"
        );
    }

    #[test]
    fn find_url_keeps_base_path() {
        let url = find_url("http://localhost:9000/api/", "A", "B").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/api/v3/Find/source/A/destination/B/type/all/timing/all"
        );
    }

    #[test]
    fn find_url_rejects_garbage() {
        assert!(matches!(
            find_url("not a url", "A", "B"),
            Err(SourceError::InvalidUrl(_))
        ));
    }

    #[test]
    fn parse_list() {
        let body = r#"[
            {"id": 7, "source": "Ernakulam", "destination": "Kottayam", "isExpress": true,
             "departureTime": "6:00 AM", "arrivalTime": "7:40 AM",
             "stopLocations": [{"lat": 9.9, "lng": 76.3}, {"lat": 500, "lng": 0}]},
            {"id": "8", "type": "AC"}
        ]"#;
        let RouteResponse::Found(routes) = parse_routes(body).unwrap() else {
            panic!("expected routes");
        };
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].id, Some(7));
        assert!(routes[0].is_express);
        assert_eq!(routes[0].stop_locations.len(), 1);
        assert_eq!(routes[1].id, Some(8));
        assert_eq!(routes[1].category_label.as_deref(), Some("AC"));
        assert!(routes[1].stops.is_empty());
    }

    #[test]
    fn off_type_fields_do_not_discard_the_body() {
        let body = r#"[
            {"id": 1, "source": "Ernakulam", "destination": "Kottayam", "departureTime": "6:00 AM"},
            {"id": 2, "source": "Ernakulam", "destination": "Kottayam", "duration": 150, "fare": "120"},
            {"id": 3, "intermediateStops": "Vyttila"},
            42
        ]"#;
        let RouteResponse::Found(routes) = parse_routes(body).unwrap() else {
            panic!("expected routes");
        };
        let ids: Vec<_> = routes.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
        assert_eq!(routes[1].duration.as_deref(), Some("150"));
        assert_eq!(routes[1].fare, Some(120.0));
    }

    #[test]
    fn numeric_not_found_status() {
        assert_eq!(parse_routes(r#"{"status": 404}"#).unwrap(), RouteResponse::NotFound);
    }

    #[test]
    fn parse_structured_not_found() {
        assert_eq!(
            parse_routes(r#"{"status": "Route not found"}"#).unwrap(),
            RouteResponse::NotFound
        );
        assert_eq!(parse_routes(r#"{"status": "404"}"#).unwrap(), RouteResponse::NotFound);
    }

    #[test]
    fn parse_wrapper_without_routes_is_empty() {
        assert_eq!(
            parse_routes(r#"{"status": "ok"}"#).unwrap(),
            RouteResponse::Found(vec![])
        );
    }

    #[test]
    fn parse_garbage_fails() {
        let err = parse_routes("<html>oops</html>").unwrap_err();
        assert!(matches!(err, SourceError::Json { body: Some(_), .. }));
    }
}
