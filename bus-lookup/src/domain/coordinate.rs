//! Geographic coordinate type.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// A WGS84 point in decimal degrees.
///
/// Serializes as `{"lat": .., "lng": ..}` so it can be flattened into the
/// records that carry a position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, -90 to 90.
    pub lat: f64,
    /// Longitude in degrees, -180 to 180.
    pub lng: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// # Examples
    ///
    /// ```
    /// use bus_lookup::domain::Coordinate;
    ///
    /// let kochi = Coordinate::new(9.9816, 76.2999).unwrap();
    /// assert_eq!(kochi.lat, 9.9816);
    ///
    /// assert!(Coordinate::new(91.0, 0.0).is_err());
    /// assert!(Coordinate::new(0.0, f64::NAN).is_err());
    /// ```
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::LatitudeOutOfRange(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Build a coordinate from compile-time constants.
    ///
    /// Only for values known to be in range (bundled data, defaults).
    pub(crate) const fn from_degrees(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite and within range.
    pub fn is_valid(&self) -> bool {
        Self::new(self.lat, self.lng).is_ok()
    }

    /// Key fragment with both components rounded to 4 decimal places (~11 m).
    pub fn cache_fragment(&self) -> String {
        format!("{:.4}_{:.4}", self.lat, self.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundaries() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(DomainError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.1),
            Err(DomainError::LongitudeOutOfRange(-180.1))
        );
        assert!(Coordinate::new(f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn cache_fragment_rounds_to_four_places() {
        let a = Coordinate::new(9.981_62, 76.299_94).unwrap();
        let b = Coordinate::new(9.981_58, 76.299_86).unwrap();
        assert_eq!(a.cache_fragment(), "9.9816_76.2999");
        assert_eq!(a.cache_fragment(), b.cache_fragment());
    }

    #[test]
    fn display() {
        let c = Coordinate::new(10.5276, 76.2144).unwrap();
        assert_eq!(c.to_string(), "10.5276, 76.2144");
    }

    #[test]
    fn serializes_as_lat_lng() {
        let c = Coordinate::new(1.5, 2.5).unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"lat":1.5,"lng":2.5}"#);
    }
}
