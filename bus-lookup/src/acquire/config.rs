//! Tunables for the acquisition core.

use crate::retry::RetryPolicy;

/// Most stops returned by a nearby-stops lookup.
pub const MAX_STOPS: usize = 30;

/// Default search radius in metres.
pub const DEFAULT_RADIUS_M: u32 = 50_000;

/// Configuration for [`BusLookup`](super::BusLookup).
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionConfig {
    /// Cap on stops requested from the source and returned to callers.
    pub max_stops: usize,

    /// Radius used when the caller has no preference.
    pub default_radius_m: u32,

    /// Retry policy for each upstream call.
    pub retry: RetryPolicy,

    /// Drop fallback stops and depots beyond the requested radius.
    pub enforce_fallback_radius: bool,

    /// Operator name used to label unnamed live depots.
    pub operator: String,
}

impl AcquisitionConfig {
    pub fn new(retry: RetryPolicy) -> Self {
        Self {
            retry,
            ..Self::default()
        }
    }

    /// Enable or disable the radius cutoff on fallback data.
    pub fn with_fallback_radius(mut self, enforce: bool) -> Self {
        self.enforce_fallback_radius = enforce;
        self
    }

    /// Set the operator used for depot naming.
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    /// Placeholder name for a live depot without one.
    pub fn unnamed_depot(&self) -> String {
        format!("{} Depot", self.operator)
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            max_stops: MAX_STOPS,
            default_radius_m: DEFAULT_RADIUS_M,
            retry: RetryPolicy::default(),
            enforce_fallback_radius: false,
            operator: "KSRTC".to_string(),
        }
    }
}
