//! Reference routes and recorded tracks in a planar frame.
//!
//! Both are built once per evaluation and never mutated. Construction
//! projects the input, removes consecutive duplicates and enforces the
//! structural preconditions (a route needs two distinct points, a track
//! needs at least one).

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};
use crate::projection::UtmProjection;
use crate::{GeoPoint, PlanarPoint};

/// Total planar length of a polyline in meters.
fn polyline_length(points: impl Iterator<Item = PlanarPoint>) -> f64 {
    let mut total = 0.0;
    let mut prev: Option<PlanarPoint> = None;
    for p in points {
        if let Some(q) = prev {
            total += q.distance(&p);
        }
        prev = Some(p);
    }
    total
}

/// The reference polyline a participant was asked to follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    name: Option<String>,
    points: Vec<PlanarPoint>,
    projection: UtmProjection,
}

impl Route {
    /// Project geographic points and build a route.
    ///
    /// Fails with [`EvalError::Projection`] if any point is outside the
    /// projection's domain, or [`EvalError::EmptyRoute`] if fewer than two
    /// distinct points remain after removing consecutive duplicates.
    pub fn from_geo(points: &[GeoPoint], projection: UtmProjection) -> Result<Self> {
        let planar = points
            .iter()
            .map(|p| projection.project(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::from_planar(planar, projection)
    }

    /// Build a route from points already projected with `projection`.
    pub fn from_planar(mut points: Vec<PlanarPoint>, projection: UtmProjection) -> Result<Self> {
        let before = points.len();
        points.dedup();
        if points.len() < before {
            debug!(
                "[Route] Removed {} consecutive duplicate points",
                before - points.len()
            );
        }

        if points.len() < 2 {
            return Err(EvalError::EmptyRoute {
                point_count: points.len(),
            });
        }

        Ok(Self {
            name: None,
            points,
            projection,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn points(&self) -> &[PlanarPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn projection(&self) -> UtmProjection {
        self.projection
    }

    /// Endpoints of segment `j` (vertices `j` and `j + 1`).
    pub fn segment(&self, j: usize) -> Option<(PlanarPoint, PlanarPoint)> {
        Some((*self.points.get(j)?, *self.points.get(j + 1)?))
    }

    /// Total planar length in meters.
    pub fn length(&self) -> f64 {
        polyline_length(self.points.iter().copied())
    }
}

/// A recorded position in the planar frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub position: PlanarPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// The recorded path a participant actually traversed.
///
/// Consecutive points are dropped only when both position and timestamp
/// repeat. A stationary receiver reporting the same position at different
/// times keeps every fix, unlike [`Route`], which collapses repeated
/// positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    name: Option<String>,
    points: Vec<TrackPoint>,
    projection: UtmProjection,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
}

impl Track {
    /// Project recorded points and build a track.
    ///
    /// Fails with [`EvalError::Projection`] if any point is outside the
    /// projection's domain, or [`EvalError::EmptyTrack`] on empty input.
    pub fn from_geo(points: &[GeoPoint], projection: UtmProjection) -> Result<Self> {
        let planar = points
            .iter()
            .map(|p| -> Result<TrackPoint> {
                Ok(TrackPoint {
                    position: projection.project(p)?,
                    timestamp: p.timestamp,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_planar(planar, projection)
    }

    /// Build a track from points already projected with `projection`.
    ///
    /// Consecutive points identical in position and timestamp are removed.
    pub fn from_planar(mut points: Vec<TrackPoint>, projection: UtmProjection) -> Result<Self> {
        let before = points.len();
        points.dedup();
        if points.len() < before {
            debug!(
                "[Track] Removed {} consecutive duplicate points",
                before - points.len()
            );
        }
        if points.is_empty() {
            return Err(EvalError::EmptyTrack);
        }

        let start_time = points.iter().find_map(|p| p.timestamp);
        let end_time = points.iter().rev().find_map(|p| p.timestamp);

        Ok(Self {
            name: None,
            points,
            projection,
            start_time,
            end_time,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn projection(&self) -> UtmProjection {
        self.projection
    }

    /// First available timestamp.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Last available timestamp.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Seconds between the first and last timestamp, if both exist.
    pub fn duration(&self) -> Option<f64> {
        let (start, end) = (self.start_time?, self.end_time?);
        Some((end - start).num_milliseconds() as f64 / 1000.0)
    }

    /// Seconds between consecutive points where both carry a timestamp.
    pub fn sample_intervals(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .filter_map(|w| {
                let (a, b) = (w[0].timestamp?, w[1].timestamp?);
                Some((b - a).num_milliseconds() as f64 / 1000.0)
            })
            .collect()
    }

    /// Total planar length in meters.
    pub fn length(&self) -> f64 {
        polyline_length(self.points.iter().map(|p| p.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{Ellipsoid, Hemisphere};
    use chrono::TimeZone;

    fn utm() -> UtmProjection {
        UtmProjection::new(32, Hemisphere::North, Ellipsoid::Wgs84).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_route_removes_consecutive_duplicates() {
        let points = vec![
            PlanarPoint::new(0.0, 0.0),
            PlanarPoint::new(0.0, 0.0),
            PlanarPoint::new(10.0, 0.0),
            PlanarPoint::new(10.0, 0.0),
            PlanarPoint::new(0.0, 0.0),
        ];
        let route = Route::from_planar(points, utm()).unwrap();
        assert_eq!(route.len(), 3);
        assert!((route.length() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_route_needs_two_distinct_points() {
        assert_eq!(
            Route::from_planar(vec![], utm()),
            Err(EvalError::EmptyRoute { point_count: 0 })
        );
        let same = vec![PlanarPoint::new(1.0, 1.0); 4];
        assert_eq!(
            Route::from_planar(same, utm()),
            Err(EvalError::EmptyRoute { point_count: 1 })
        );
    }

    #[test]
    fn test_route_from_geo_propagates_projection_error() {
        let london = vec![GeoPoint::new(51.5, -0.12), GeoPoint::new(51.6, -0.12)];
        assert!(matches!(
            Route::from_geo(&london, utm()),
            Err(EvalError::Projection(_))
        ));
    }

    #[test]
    fn test_segment_access() {
        let route = Route::from_planar(
            vec![PlanarPoint::new(0.0, 0.0), PlanarPoint::new(1.0, 0.0)],
            utm(),
        )
        .unwrap();
        assert!(route.segment(0).is_some());
        assert!(route.segment(1).is_none());
    }

    #[test]
    fn test_empty_track() {
        assert_eq!(Track::from_geo(&[], utm()), Err(EvalError::EmptyTrack));
        assert_eq!(Track::from_planar(vec![], utm()), Err(EvalError::EmptyTrack));
    }

    #[test]
    fn test_track_time_bounds() {
        let points = vec![
            GeoPoint::new(48.0, 9.0),
            GeoPoint::with_time(48.001, 9.0, at(10)),
            GeoPoint::with_time(48.002, 9.0, at(15)),
            GeoPoint::with_time(48.003, 9.0, at(40)),
            GeoPoint::new(48.004, 9.0),
        ];
        let track = Track::from_geo(&points, utm()).unwrap();
        assert_eq!(track.start_time(), Some(at(10)));
        assert_eq!(track.end_time(), Some(at(40)));
        assert_eq!(track.duration(), Some(30.0));
        assert_eq!(track.sample_intervals(), vec![5.0, 25.0]);
    }

    #[test]
    fn test_track_without_timestamps_has_no_duration() {
        let points = vec![GeoPoint::new(48.0, 9.0), GeoPoint::new(48.001, 9.0)];
        let track = Track::from_geo(&points, utm()).unwrap();
        assert_eq!(track.duration(), None);
        assert!(track.sample_intervals().is_empty());
    }

    #[test]
    fn test_track_dedup_matches_for_geo_and_planar_input() {
        let geo = vec![
            GeoPoint::with_time(48.0, 9.0, at(0)),
            GeoPoint::with_time(48.0, 9.0, at(0)),
            GeoPoint::with_time(48.0, 9.0, at(1)),
            GeoPoint::with_time(48.001, 9.0, at(2)),
            GeoPoint::with_time(48.001, 9.0, at(2)),
        ];
        let from_geo = Track::from_geo(&geo, utm()).unwrap();
        assert_eq!(from_geo.len(), 3);

        let planar = geo
            .iter()
            .map(|p| TrackPoint {
                position: utm().project(p).unwrap(),
                timestamp: p.timestamp,
            })
            .collect();
        assert_eq!(Track::from_planar(planar, utm()).unwrap(), from_geo);
    }

    #[test]
    fn test_track_keeps_stationary_points_with_distinct_times() {
        let points = vec![
            GeoPoint::with_time(48.0, 9.0, at(0)),
            GeoPoint::with_time(48.0, 9.0, at(0)),
            GeoPoint::with_time(48.0, 9.0, at(1)),
        ];
        let track = Track::from_geo(&points, utm()).unwrap();
        assert_eq!(track.len(), 2);
    }
}
