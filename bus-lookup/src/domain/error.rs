//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from upstream and storage errors.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Latitude outside -90..=90 or not finite
    #[error("latitude out of range: {0}")]
    LatitudeOutOfRange(f64),

    /// Longitude outside -180..=180 or not finite
    #[error("longitude out of range: {0}")]
    LongitudeOutOfRange(f64),

    /// Unrecognised bus category label
    #[error("unknown bus category: {0}")]
    UnknownCategory(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::LatitudeOutOfRange(91.0);
        assert_eq!(err.to_string(), "latitude out of range: 91");

        let err = DomainError::LongitudeOutOfRange(-200.5);
        assert_eq!(err.to_string(), "longitude out of range: -200.5");

        let err = DomainError::UnknownCategory("Sleeper".into());
        assert_eq!(err.to_string(), "unknown bus category: Sleeper");
    }
}
