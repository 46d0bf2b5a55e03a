//! Upstream response DTOs.
//!
//! These map directly to the JSON the sources send. Fields are optional
//! because both sources omit rather than null out missing data.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Response from the Overpass interpreter with `[out:json]`.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

/// A node or way returned by Overpass.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    /// "node", "way" or "relation".
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// OSM id, unique per element type.
    pub id: Option<u64>,

    /// Present on nodes.
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    /// Present on ways when the query asks for `out center`.
    pub center: Option<OverpassCenter>,

    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Centroid of a way or relation.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassCenter {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassElement {
    /// Element position, preferring the node's own point over a centroid.
    pub fn lat_lon(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon, self.center) {
            (Some(lat), Some(lon), _) => Some((lat, lon)),
            (_, _, Some(center)) => Some((center.lat, center.lon)),
            _ => None,
        }
    }

    /// A non-blank tag value.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Id qualified by element type, so a node and a way never collide.
    pub fn qualified_id(&self) -> Option<String> {
        let id = self.id?;
        Some(match self.kind.as_deref() {
            Some("node") | None => id.to_string(),
            Some(kind) => format!("{kind}/{id}"),
        })
    }
}

/// Body of a route source JSON response.
///
/// Most responses are a bare array; some deployments wrap it with a status.
/// Records are kept as raw JSON so one malformed trip cannot sink the rest;
/// see [`RouteDto::from_value`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RouteBody {
    List(Vec<Value>),
    Wrapped {
        #[serde(default, deserialize_with = "loose_string")]
        status: Option<String>,
        #[serde(default, alias = "data", alias = "buses")]
        routes: Option<Vec<Value>>,
    },
}

/// One trip from the route source.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    /// Numeric id, sometimes sent as a string.
    pub id: Option<Value>,

    pub source: Option<String>,

    pub destination: Option<String>,

    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Boolean, or "true"/"false" as text.
    #[serde(default, deserialize_with = "loose_bool")]
    pub is_express: Option<bool>,

    pub departure_time: Option<String>,

    pub arrival_time: Option<String>,

    pub intermediate_stops: Option<Vec<String>>,

    pub stop_locations: Option<Vec<LatLngDto>>,

    /// Number, or a number as text.
    #[serde(default, deserialize_with = "loose_f64")]
    pub fare: Option<f64>,

    /// Text, or a bare number (minutes).
    #[serde(default, deserialize_with = "loose_string")]
    pub duration: Option<String>,

    pub bus_number: Option<String>,
}

impl RouteDto {
    /// Decode one raw record, or `None` if it is not a usable trip object.
    pub fn from_value(value: Value) -> Option<Self> {
        match serde_json::from_value(value) {
            Ok(dto) => Some(dto),
            Err(e) => {
                warn!(error = %e, "Skipping malformed route record");
                None
            }
        }
    }
}

fn loose_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn loose_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => s.trim().to_ascii_lowercase().parse().ok(),
        Some(Value::Number(n)) => n.as_i64().map(|n| n != 0),
        _ => None,
    })
}

fn loose_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A `{lat, lng}` pair.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLngDto {
    pub lat: f64,
    pub lng: f64,
}
