//! Scheduled bus trips between two named places.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Coordinate, DomainError};

/// Service category of a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BusCategory {
    /// Air-conditioned service.
    #[serde(rename = "AC")]
    Ac,
    /// Limited-stop express.
    Express,
    /// Stopping service.
    #[default]
    Ordinary,
}

impl BusCategory {
    /// The label used on the wire and in the UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            BusCategory::Ac => "AC",
            BusCategory::Express => "Express",
            BusCategory::Ordinary => "Ordinary",
        }
    }

    /// Pick a category from upstream signals.
    ///
    /// An explicit `AC` label wins, then any express signal; everything else
    /// is `Ordinary`.
    pub fn from_signals(label: Option<&str>, is_express: bool) -> Self {
        let label = label.map(str::trim).unwrap_or_default();
        if label.eq_ignore_ascii_case("ac") {
            BusCategory::Ac
        } else if is_express || label.eq_ignore_ascii_case("express") {
            BusCategory::Express
        } else {
            BusCategory::Ordinary
        }
    }
}

impl FromStr for BusCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ac" => Ok(BusCategory::Ac),
            "express" => Ok(BusCategory::Express),
            "ordinary" => Ok(BusCategory::Ordinary),
            _ => Err(DomainError::UnknownCategory(s.to_string())),
        }
    }
}

impl fmt::Display for BusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled bus trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    pub id: i64,

    /// Origin place name.
    pub from: String,

    /// Destination place name.
    pub to: String,

    #[serde(rename = "type")]
    pub category: BusCategory,

    /// Departure time of day as published (e.g. "10:30 AM").
    pub departure: String,

    /// Arrival time of day as published.
    pub arrival: String,

    /// Intermediate stop names in travel order.
    #[serde(default)]
    pub stops: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_locations: Option<Vec<Coordinate>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fare: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus_number: Option<String>,
}

impl Bus {
    /// Whether this trip runs between `from` and `to`, in either direction.
    ///
    /// Comparison is case-insensitive on trimmed names.
    pub fn connects(&self, from: &str, to: &str) -> bool {
        let direct = same_place(&self.from, from) && same_place(&self.to, to);
        let reversed = same_place(&self.from, to) && same_place(&self.to, from);
        direct || reversed
    }

    /// Whether `place` is one of the endpoints or an intermediate stop.
    pub fn serves(&self, place: &str) -> bool {
        same_place(&self.from, place)
            || same_place(&self.to, place)
            || self.stops.iter().any(|s| same_place(s, place))
    }
}

/// Case-insensitive comparison of two place names, ignoring outer whitespace.
pub fn same_place(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
