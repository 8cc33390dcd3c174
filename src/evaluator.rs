//! # Track Evaluator
//!
//! Scores a recorded track against its reference route.
//!
//! For every track point:
//! 1. The R-tree finds the nearest route vertex `i` (distance `d0`)
//! 2. Segments in a small window around `i` are checked for a closer
//!    perpendicular foot
//! 3. The minimum becomes that point's [`ErrorSample`]
//!
//! The window assumes route vertices are dense relative to the route's
//! curvature, so the true closest point is never more than a couple of
//! segments away from the nearest vertex. Widen
//! [`EvaluationConfig::search_window`] for sparse routes.
//!
//! Evaluation is a pure function of (route, track, config): the index is
//! built per call and dropped on return.

use log::{debug, info, warn};

use crate::config::EvaluationConfig;
use crate::error::{EvalError, Result};
use crate::geometry::foot_of_perpendicular_with;
use crate::result::{ErrorSample, EvaluationResult, MatchKind};
use crate::spatial_index::RouteIndex;
use crate::track::{Route, Track};
use crate::PlanarPoint;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Read-only state shared by all per-point queries of one evaluation.
struct Evaluator<'a> {
    route: &'a Route,
    index: RouteIndex,
    config: &'a EvaluationConfig,
}

impl<'a> Evaluator<'a> {
    fn new(route: &'a Route, track: &Track, config: &'a EvaluationConfig) -> Result<Self> {
        if route.projection() != track.projection() {
            return Err(EvalError::ProjectionMismatch {
                route: route.projection(),
                track: track.projection(),
            });
        }
        if track.is_empty() {
            return Err(EvalError::EmptyTrack);
        }

        let index = RouteIndex::build(route.points())?;
        debug!(
            "[Evaluator] Indexed {} route vertices, {} track points, window={}",
            index.len(),
            track.len(),
            config.search_window
        );

        Ok(Self {
            route,
            index,
            config,
        })
    }

    /// Lateral error of a single track point.
    fn sample(&self, track_index: usize, point: &PlanarPoint) -> ErrorSample {
        let (nearest, d0) = self.index.nearest(point);

        let mut best = ErrorSample {
            track_index,
            point: *point,
            distance: d0,
            closest: self.route.points()[nearest],
            route_index: nearest,
            kind: MatchKind::Vertex,
        };

        let Some((first, last)) = self.config.segment_window(nearest, self.route.len()) else {
            return best;
        };
        for j in first..=last {
            let Some((a, b)) = self.route.segment(j) else {
                continue;
            };
            if let Some((foot, d)) = foot_of_perpendicular_with(point, &a, &b, self.config.on_segment)
            {
                if d < best.distance {
                    best.distance = d;
                    best.closest = foot;
                    best.route_index = j;
                    best.kind = MatchKind::Segment;
                }
            }
        }

        best
    }
}

/// Evaluate `track` against `route`.
///
/// Fails with [`EvalError::ProjectionMismatch`] if the two were projected
/// with different parameters. A track without timestamps is not an error:
/// the result carries `duration = None`.
///
/// # Example
/// ```
/// use track_accuracy::{evaluate, EvaluationConfig, PlanarPoint, Route, Track, TrackPoint};
/// use track_accuracy::projection::{Ellipsoid, Hemisphere, UtmProjection};
///
/// let utm = UtmProjection::new(32, Hemisphere::North, Ellipsoid::Wgs84).unwrap();
/// let route = Route::from_planar(
///     vec![PlanarPoint::new(0.0, 0.0), PlanarPoint::new(100.0, 0.0)],
///     utm,
/// ).unwrap();
/// let track = Track::from_planar(
///     vec![TrackPoint { position: PlanarPoint::new(50.0, 3.0), timestamp: None }],
///     utm,
/// ).unwrap();
///
/// let result = evaluate(&route, &track, &EvaluationConfig::default()).unwrap();
/// assert_eq!(result.mean, 3.0);
/// assert_eq!(result.duration, None);
/// ```
pub fn evaluate(route: &Route, track: &Track, config: &EvaluationConfig) -> Result<EvaluationResult> {
    let evaluator = Evaluator::new(route, track, config)?;

    let samples = track
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| evaluator.sample(i, &p.position))
        .collect::<Vec<_>>();

    summarize(route, track, samples)
}

/// Evaluate using parallel processing.
///
/// Same result as [`evaluate`], with per-point queries spread across the
/// rayon thread pool. Samples keep track order. Tracks shorter than
/// `config.parallel_min_points` are evaluated sequentially.
#[cfg(feature = "parallel")]
pub fn evaluate_parallel(
    route: &Route,
    track: &Track,
    config: &EvaluationConfig,
) -> Result<EvaluationResult> {
    if track.len() < config.parallel_min_points {
        return evaluate(route, track, config);
    }

    let evaluator = Evaluator::new(route, track, config)?;

    let samples = track
        .points()
        .par_iter()
        .enumerate()
        .map(|(i, p)| evaluator.sample(i, &p.position))
        .collect::<Vec<_>>();

    summarize(route, track, samples)
}

fn summarize(route: &Route, track: &Track, samples: Vec<ErrorSample>) -> Result<EvaluationResult> {
    let result = EvaluationResult::from_samples(route, track, samples)?;

    if result.duration.is_none() {
        warn!(
            "[Evaluator] Track '{}' has no timestamps, duration omitted",
            track.name().unwrap_or("unnamed")
        );
    }
    info!(
        "[Evaluator] Evaluated {} points: mean={:.2}m median={:.2}m p95={:.2}m",
        result.samples.len(),
        result.mean,
        result.median,
        result.p95
    );

    Ok(result)
}
