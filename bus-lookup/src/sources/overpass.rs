//! Overpass-class geospatial source for bus stops and depots.
//!
//! Queries are sent as Overpass QL in a plain-text POST body; responses are
//! requested as JSON.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::domain::Coordinate;

use super::error::SourceError;
use super::traits::{DepotCandidate, DepotSource, StopCandidate, StopSource};
use super::types::{OverpassElement, OverpassResponse};

/// Default public Overpass interpreter endpoint.
pub const DEFAULT_BASE_URL: &str = "https://overpass-api.de/api/interpreter";

/// Operator whose bus stations count as depots.
pub const DEFAULT_OPERATOR: &str = "KSRTC";

/// Facility tags we understand, mapped to our facility names.
const FACILITY_TAGS: [(&str, &str); 5] = [
    ("toilets", "restroom"),
    ("shelter", "shelter"),
    ("bench", "seating"),
    ("drinking_water", "drinking_water"),
    ("wheelchair", "wheelchair_access"),
];

/// Configuration for the Overpass client.
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Interpreter URL
    pub base_url: String,
    /// Operator name matched (case-insensitively) for depot queries
    pub operator: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl OverpassConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            operator: DEFAULT_OPERATOR.to_string(),
            timeout_secs: 25,
        }
    }

    /// Set a custom interpreter URL (for testing or a private instance).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the depot operator.
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Overpass API client.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    base_url: String,
    operator: String,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            operator: config.operator,
        })
    }

    /// Run an Overpass QL query and decode the JSON response.
    pub async fn query(&self, ql: String) -> Result<OverpassResponse, SourceError> {
        let response = self.http.post(&self.base_url).body(ql).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| SourceError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl StopSource for OverpassClient {
    async fn stops_near(
        &self,
        center: Coordinate,
        radius_m: u32,
        limit: usize,
    ) -> Result<Vec<StopCandidate>, SourceError> {
        let response = self.query(stops_query(center, radius_m, limit)).await?;
        Ok(response.elements.iter().filter_map(stop_candidate).collect())
    }
}

impl DepotSource for OverpassClient {
    async fn depots_near(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<DepotCandidate>, SourceError> {
        let response = self
            .query(depots_query(center, radius_m, &self.operator))
            .await?;
        Ok(response.elements.iter().filter_map(depot_candidate).collect())
    }
}

/// Bus stop nodes and ways around a point, capped at `limit` results.
pub fn stops_query(center: Coordinate, radius_m: u32, limit: usize) -> String {
    let around = format!("around:{},{},{}", radius_m, center.lat, center.lng);
    format!(
        "[out:json];\n(\n  node[\"highway\"=\"bus_stop\"]({around});\n  way[\"highway\"=\"bus_stop\"]({around});\n);\nout center {limit};\n"
    )
}

/// Bus stations run by `operator` around a point.
pub fn depots_query(center: Coordinate, radius_m: u32, operator: &str) -> String {
    let around = format!("around:{},{},{}", radius_m, center.lat, center.lng);
    let operator = escape_ql(operator);
    format!(
        "[out:json];\n(\n  node[\"amenity\"=\"bus_station\"][\"operator\"~\"{operator}\",i]({around});\n  way[\"amenity\"=\"bus_station\"][\"operator\"~\"{operator}\",i]({around});\n);\nout center;\n"
    )
}

fn escape_ql(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Convert an element to a stop candidate, skipping anything unplaceable.
pub fn stop_candidate(element: &OverpassElement) -> Option<StopCandidate> {
    let position = element_position(element)?;
    Some(StopCandidate {
        id: element.qualified_id(),
        name: element.tag("name").map(str::to_string),
        position,
    })
}

/// Convert an element to a depot candidate, skipping anything unplaceable.
pub fn depot_candidate(element: &OverpassElement) -> Option<DepotCandidate> {
    let position = element_position(element)?;

    let address = element
        .tag("address")
        .or_else(|| element.tag("addr:full"))
        .map(str::to_string)
        .or_else(|| {
            let parts: Vec<&str> = ["addr:street", "addr:city"]
                .iter()
                .filter_map(|key| element.tag(key))
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        });

    let facilities = FACILITY_TAGS
        .iter()
        .filter(|(tag, _)| element.tag(tag).is_some_and(|v| v != "no"))
        .map(|(_, facility)| facility.to_string())
        .collect();

    Some(DepotCandidate {
        id: element.qualified_id(),
        name: element.tag("name").map(str::to_string),
        network: element.tag("network").map(str::to_string),
        address,
        facilities,
        position,
    })
}

fn element_position(element: &OverpassElement) -> Option<Coordinate> {
    let (lat, lon) = element.lat_lon()?;
    Coordinate::new(lat, lon).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements(json: &str) -> Vec<OverpassElement> {
        serde_json::from_str::<OverpassResponse>(json).unwrap().elements
    }

    #[test]
    fn config_builder() {
        let config = OverpassConfig::new()
            .with_base_url("http://localhost:8080")
            .with_operator("KURTC")
            .with_timeout(5);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.operator, "KURTC");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn config_defaults() {
        let config = OverpassConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.operator, "KSRTC");
        assert_eq!(config.timeout_secs, 25);
    }

    #[test]
    fn client_creation() {
        assert!(OverpassClient::new(OverpassConfig::default()).is_ok());
    }

    #[test]
    fn stops_query_shape() {
        let q = stops_query(Coordinate::new(9.9816, 76.2999).unwrap(), 50_000, 30);
        assert!(q.starts_with("[out:json];"));
        assert!(q.contains("node[\"highway\"=\"bus_stop\"](around:50000,9.9816,76.2999);"));
        assert!(q.contains("way[\"highway\"=\"bus_stop\"](around:50000,9.9816,76.2999);"));
        assert!(q.contains("out center 30;"));
    }

    #[test]
    fn depots_query_matches_operator_case_insensitively() {
        let q = depots_query(Coordinate::new(10.0, 76.0).unwrap(), 20_000, "KSRTC");
        assert!(q.contains("[\"amenity\"=\"bus_station\"][\"operator\"~\"KSRTC\",i](around:20000,10,76)"));
    }

    #[test]
    fn depots_query_escapes_quotes() {
        let q = depots_query(Coordinate::new(0.0, 0.0).unwrap(), 1, "a\"b");
        assert!(q.contains("~\"a\\\"b\",i"));
    }

    #[test]
    fn stop_candidates_skip_unplaceable() {
        let els = elements(
            r#"{"elements": [
                {"type": "node", "id": 1, "lat": 9.9, "lon": 76.2, "tags": {"name": "Kaloor"}},
                {"type": "node", "id": 2, "lat": 9.8, "lon": 76.1},
                {"type": "way", "id": 3},
                {"type": "node", "id": 4, "lat": 99.0, "lon": 76.1}
            ]}"#,
        );
        let stops: Vec<_> = els.iter().filter_map(stop_candidate).collect();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].id.as_deref(), Some("1"));
        assert_eq!(stops[0].name.as_deref(), Some("Kaloor"));
        assert_eq!(stops[1].name, None);
    }

    #[test]
    fn depot_candidate_reads_tags() {
        let els = elements(
            r#"{"elements": [{
                "type": "node", "id": 9, "lat": 10.52, "lon": 76.21,
                "tags": {
                    "name": "KSRTC Thrissur", "network": "KSRTC",
                    "addr:street": "Shornur Road", "addr:city": "Thrissur",
                    "toilets": "yes", "shelter": "no"
                }
            }]}"#,
        );
        let depot = depot_candidate(&els[0]).unwrap();
        assert_eq!(depot.name.as_deref(), Some("KSRTC Thrissur"));
        assert_eq!(depot.network.as_deref(), Some("KSRTC"));
        assert_eq!(depot.address.as_deref(), Some("Shornur Road, Thrissur"));
        assert_eq!(depot.facilities, vec!["restroom".to_string()]);
    }

    #[test]
    fn depot_candidate_without_tags() {
        let els = elements(r#"{"elements": [{"type": "node", "id": 9, "lat": 10.5, "lon": 76.2}]}"#);
        let depot = depot_candidate(&els[0]).unwrap();
        assert_eq!(depot.name, None);
        assert_eq!(depot.address, None);
        assert!(depot.facilities.is_empty());
    }
}
