//! # Track Accuracy
//!
//! GPS accuracy scoring: how closely did a recorded track follow a reference route?
//!
//! This library provides:
//! - UTM projection of geographic points into a planar frame in meters
//! - R-tree nearest-vertex search over the reference route
//! - Perpendicular-foot geometry against nearby route segments
//! - Per-point lateral error samples and summary statistics (mean, median, 95th percentile)
//! - Parallel per-point evaluation for long tracks
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel evaluation with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use track_accuracy::{evaluate, EvaluationConfig, GeoPoint, Route, Track};
//! use track_accuracy::projection::{Ellipsoid, UtmProjection};
//!
//! // Reference route heading north through Munich
//! let route_points: Vec<GeoPoint> = (0..10)
//!     .map(|i| GeoPoint::new(48.130 + i as f64 * 0.001, 11.570))
//!     .collect();
//! // Recorded track a few meters east of it
//! let track_points: Vec<GeoPoint> = (0..9)
//!     .map(|i| GeoPoint::new(48.1305 + i as f64 * 0.001, 11.57005))
//!     .collect();
//!
//! let utm = UtmProjection::for_point(&route_points[0], Ellipsoid::Wgs84).unwrap();
//! let route = Route::from_geo(&route_points, utm).unwrap();
//! let track = Track::from_geo(&track_points, utm).unwrap();
//!
//! let result = evaluate(&route, &track, &EvaluationConfig::default()).unwrap();
//! println!("Mean error: {:.2}m", result.mean);
//! assert!(result.mean < 5.0);
//! ```

use chrono::{DateTime, Utc};
use geo::{Coord, Distance, Euclidean, Haversine, Point};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{EvalError, OptionExt, ProjectionError, Result};

// UTM projection (geographic <-> planar)
pub mod projection;
pub use projection::{Ellipsoid, Hemisphere, UtmProjection};

// Evaluation configuration
pub mod config;
pub use config::{EvaluationConfig, OnSegmentTest};

// Route and track models
pub mod track;
pub use track::{Route, Track, TrackPoint};

// R-tree nearest-vertex index over the route
pub mod spatial_index;
pub use spatial_index::RouteIndex;

// Perpendicular foot / segment intersection geometry
pub mod geometry;
pub use geometry::{foot_of_perpendicular, foot_of_perpendicular_with};

// Summary statistics
pub mod stats;

// Result records
pub mod result;
pub use result::{ErrorSample, EvaluationResult, MatchKind};

// Track evaluation
pub mod evaluator;
pub use evaluator::evaluate;
#[cfg(feature = "parallel")]
pub use evaluator::evaluate_parallel;

// Error-bar output for visual inspection
pub mod diagnostics;

// ============================================================================
// Core Types
// ============================================================================

/// A geographic position with an optional recording time.
///
/// # Example
/// ```
/// use track_accuracy::GeoPoint;
/// let point = GeoPoint::new(48.1374, 11.5755); // Munich
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Recording time, if the source provided one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl GeoPoint {
    /// Create a new point without a timestamp.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: None,
        }
    }

    /// Create a new point recorded at `timestamp`.
    pub fn with_time(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: Some(timestamp),
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Great-circle distance to `other` in meters.
    pub fn haversine_distance(&self, other: &GeoPoint) -> f64 {
        let p1 = Point::new(self.longitude, self.latitude);
        let p2 = Point::new(other.longitude, other.latitude);
        Haversine::distance(p1, p2)
    }
}

/// A position in a planar frame, in meters (UTM easting / northing).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` in meters.
    #[inline]
    pub fn distance(&self, other: &PlanarPoint) -> f64 {
        Euclidean::distance(Point::from(*self), Point::from(*other))
    }
}

impl From<PlanarPoint> for Coord<f64> {
    fn from(p: PlanarPoint) -> Self {
        Coord { x: p.x, y: p.y }
    }
}

impl From<PlanarPoint> for Point<f64> {
    fn from(p: PlanarPoint) -> Self {
        Point::new(p.x, p.y)
    }
}

impl From<Coord<f64>> for PlanarPoint {
    fn from(c: Coord<f64>) -> Self {
        PlanarPoint::new(c.x, c.y)
    }
}

// ============================================================================
// Tests
// ============================================================================
