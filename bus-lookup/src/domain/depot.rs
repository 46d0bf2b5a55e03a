//! Transit operator depots.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Coordinate;
use crate::geo::Located;

/// A depot or bus station run by the transit operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    pub id: String,

    pub name: String,

    /// Category label such as "main" or the operator network name.
    #[serde(rename = "type")]
    pub kind: String,

    pub address: String,

    /// Facility tags (e.g. "restroom", "canteen").
    #[serde(default)]
    pub facilities: BTreeSet<String>,

    #[serde(flatten)]
    pub position: Coordinate,

    /// Distance in kilometres from the reference point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Depot {
    /// Maps directions link ending at this depot.
    pub fn directions_url(&self) -> String {
        format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}",
            self.position.lat, self.position.lng
        )
    }
}

impl Located for Depot {
    fn position(&self) -> Coordinate {
        self.position
    }

    fn with_distance(self, km: f64) -> Self {
        Self {
            distance: Some(km),
            ..self
        }
    }
}
