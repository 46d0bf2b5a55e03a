//! Bus stop records.

use serde::{Deserialize, Serialize};

use super::Coordinate;
use crate::geo::Located;

/// A bus stop near a query point.
///
/// `distance` is derived from whichever reference point produced the record
/// and is absent until ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusStop {
    /// Identifier, unique within one result set.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Stop position.
    #[serde(flatten)]
    pub position: Coordinate,

    /// Distance in kilometres from the reference point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl BusStop {
    /// Create a stop without a computed distance.
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            distance: None,
        }
    }

    /// Placeholder name for the stop at `index` in a ranked list.
    pub fn placeholder_name(index: usize) -> String {
        format!("Bus Stop {}", index + 1)
    }
}

impl Located for BusStop {
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
