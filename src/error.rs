//! Unified error handling for track accuracy evaluation.
//!
//! Structural problems (empty inputs, mismatched spatial frames, invalid
//! coordinates) abort an evaluation and are surfaced to the caller. They
//! indicate a caller or data bug, so nothing here is retried.

use thiserror::Error;

use crate::projection::UtmProjection;

/// Errors raised while converting between geographic and planar coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// Coordinate is not finite or outside the geographic range
    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Latitude is outside the band covered by UTM (80°S to 84°N)
    #[error("latitude {latitude} is outside the UTM band")]
    OutsideUtmBand { latitude: f64 },

    /// Longitude is too far from the zone's central meridian
    #[error("longitude {longitude} is outside UTM zone {zone}")]
    OutsideZone { longitude: f64, zone: u8 },

    /// Zone number is not in 1..=60
    #[error("invalid UTM zone {0}")]
    InvalidZone(u8),

    /// Easting/northing is not finite or outside the invertible range
    #[error("invalid UTM coordinate ({x}, {y})")]
    InvalidPlanar { x: f64, y: f64 },
}

/// Unified error type for evaluation operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A point could not be projected
    #[error("projection failed: {0}")]
    Projection(#[from] ProjectionError),

    /// Route has fewer than two distinct points
    #[error("route has {point_count} distinct points, minimum 2 required")]
    EmptyRoute { point_count: usize },

    /// Track has no points
    #[error("track has no points")]
    EmptyTrack,

    /// Route and track were projected with different parameters
    #[error("route projected as {route}, track projected as {track}")]
    ProjectionMismatch {
        route: UtmProjection,
        track: UtmProjection,
    },

    /// Track carries no usable start/end timestamps
    #[error("track has no timestamps, duration unavailable")]
    MissingTimestamps,
}

/// Result type alias for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Extension trait for converting Option to EvalError.
pub trait OptionExt<T> {
    /// Convert Option to Result with a missing timestamps error.
    fn ok_or_missing_timestamps(self) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_missing_timestamps(self) -> Result<T> {
        self.ok_or(EvalError::MissingTimestamps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{Ellipsoid, Hemisphere};

    #[test]
    fn test_error_display() {
        let err = EvalError::EmptyRoute { point_count: 1 };
        assert!(err.to_string().contains("1 distinct points"));

        let err: EvalError = ProjectionError::InvalidZone(61).into();
        assert!(err.to_string().contains("zone 61"));
    }

    #[test]
    fn test_mismatch_display() {
        let route = UtmProjection::new(32, Hemisphere::North, Ellipsoid::Wgs84).unwrap();
        let track = UtmProjection::new(33, Hemisphere::North, Ellipsoid::Wgs84).unwrap();
        let err = EvalError::ProjectionMismatch { route, track };
        let msg = err.to_string();
        assert!(msg.contains("32N"));
        assert!(msg.contains("33N"));
    }

    #[test]
    fn test_option_ext() {
        let none: Option<f64> = None;
        assert_eq!(none.ok_or_missing_timestamps(), Err(EvalError::MissingTimestamps));
    }
}
