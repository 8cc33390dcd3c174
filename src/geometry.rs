//! # Segment Intersection Solver
//!
//! Finds the foot of the perpendicular from a point onto a route segment's
//! supporting line and decides whether that foot lies on the segment.
//!
//! The line is handled in slope/intercept form. Vertical and horizontal
//! segments are separate branches chosen before any division, so no
//! degenerate slope ever reaches the general solution.

use crate::config::OnSegmentTest;
use crate::PlanarPoint;

/// Absolute slack in meters for the bounding-rectangle test, absorbing
/// rounding in the closed-form foot.
const BBOX_SLACK: f64 = 1e-9;

/// Foot of the perpendicular from `point` onto segment `seg_start`-`seg_end`,
/// with the bounding-rectangle on-segment test.
///
/// Returns the foot and its Euclidean distance from `point`, or `None` if
/// the foot falls outside the segment or the segment has zero length.
///
/// # Example
/// ```
/// use track_accuracy::{foot_of_perpendicular, PlanarPoint};
///
/// let (foot, d) = foot_of_perpendicular(
///     &PlanarPoint::new(3.0, 5.0),
///     &PlanarPoint::new(0.0, 0.0),
///     &PlanarPoint::new(0.0, 10.0),
/// ).unwrap();
/// assert_eq!(foot, PlanarPoint::new(0.0, 5.0));
/// assert_eq!(d, 3.0);
/// ```
pub fn foot_of_perpendicular(
    point: &PlanarPoint,
    seg_start: &PlanarPoint,
    seg_end: &PlanarPoint,
) -> Option<(PlanarPoint, f64)> {
    foot_of_perpendicular_with(point, seg_start, seg_end, OnSegmentTest::BoundingBox)
}

/// Same as [`foot_of_perpendicular`] with an explicit on-segment test.
pub fn foot_of_perpendicular_with(
    point: &PlanarPoint,
    seg_start: &PlanarPoint,
    seg_end: &PlanarPoint,
    test: OnSegmentTest,
) -> Option<(PlanarPoint, f64)> {
    let foot = match test {
        OnSegmentTest::BoundingBox => {
            let foot = line_foot(point, seg_start, seg_end)?;
            if !within_bounds(&foot, seg_start, seg_end) {
                return None;
            }
            foot
        }
        OnSegmentTest::Parametric => parametric_foot(point, seg_start, seg_end)?,
    };
    Some((foot, point.distance(&foot)))
}

/// Foot of the perpendicular onto the infinite line through `a` and `b`.
///
/// `None` only when `a == b`.
pub fn line_foot(point: &PlanarPoint, a: &PlanarPoint, b: &PlanarPoint) -> Option<PlanarPoint> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;

    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    // Due N-S: x from the segment, y from the point
    if dx == 0.0 {
        return Some(PlanarPoint::new(a.x, point.y));
    }
    // Due E-W: x from the point, y from the segment
    if dy == 0.0 {
        return Some(PlanarPoint::new(point.x, a.y));
    }

    let slope = dy / dx;
    let slope_sq = slope * slope;
    if !slope_sq.is_finite() {
        return Some(PlanarPoint::new(a.x, point.y));
    }
    if slope_sq == 0.0 {
        return Some(PlanarPoint::new(point.x, a.y));
    }

    // Relative to `a` the line is y = slope * x (intercept 0). The
    // perpendicular through the point has slope -1/slope; solving both
    // line equations gives x = (px + slope * py) / (1 + slope^2).
    let px = point.x - a.x;
    let py = point.y - a.y;
    let x = (px + slope * py) / (1.0 + slope_sq);
    let y = slope * x;
    Some(PlanarPoint::new(a.x + x, a.y + y))
}

/// Whether `foot` lies inside the rectangle spanned by `a` and `b`.
fn within_bounds(foot: &PlanarPoint, a: &PlanarPoint, b: &PlanarPoint) -> bool {
    foot.x >= a.x.min(b.x) - BBOX_SLACK
        && foot.x <= a.x.max(b.x) + BBOX_SLACK
        && foot.y >= a.y.min(b.y) - BBOX_SLACK
        && foot.y <= a.y.max(b.y) + BBOX_SLACK
}

/// Foot via the projection parameter `t` along `a -> b`, accepted for `t` in [0, 1].
fn parametric_foot(point: &PlanarPoint, a: &PlanarPoint, b: &PlanarPoint) -> Option<PlanarPoint> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return None;
    }
    let t = ((point.x - a.x) * dx + (point.y - a.y) * dy) / len_sq;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(PlanarPoint::new(a.x + t * dx, a.y + t * dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> PlanarPoint {
        PlanarPoint::new(x, y)
    }

    /// Distance from `q` to the line through `a` and `b` via the cross product.
    fn line_distance(q: &PlanarPoint, a: &PlanarPoint, b: &PlanarPoint) -> f64 {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        ((q.x - a.x) * dy - (q.y - a.y) * dx).abs() / (dx * dx + dy * dy).sqrt()
    }

    #[test]
    fn test_vertical_segment() {
        let (foot, d) = foot_of_perpendicular(&p(3.0, 5.0), &p(0.0, 0.0), &p(0.0, 10.0)).unwrap();
        assert_eq!(foot, p(0.0, 5.0));
        assert_eq!(d, 3.0);
    }

    #[test]
    fn test_horizontal_segment() {
        let (foot, d) = foot_of_perpendicular(&p(5.0, 4.0), &p(0.0, 0.0), &p(10.0, 0.0)).unwrap();
        assert_eq!(foot, p(5.0, 0.0));
        assert_eq!(d, 4.0);
    }

    #[test]
    fn test_diagonal_segment() {
        let (foot, d) = foot_of_perpendicular(&p(0.0, 10.0), &p(0.0, 0.0), &p(10.0, 10.0)).unwrap();
        assert_relative_eq!(foot.x, 5.0, epsilon = 1e-12);
        assert_relative_eq!(foot.y, 5.0, epsilon = 1e-12);
        assert_relative_eq!(d, 50f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn test_foot_beyond_segment_rejected() {
        // Perpendicular foot lands at (15, 15), past the end
        assert!(foot_of_perpendicular(&p(10.0, 20.0), &p(0.0, 0.0), &p(10.0, 10.0)).is_none());
        // Vertical segment, point beyond the top
        assert!(foot_of_perpendicular(&p(3.0, 12.0), &p(0.0, 0.0), &p(0.0, 10.0)).is_none());
        // Horizontal segment, point before the start
        assert!(foot_of_perpendicular(&p(-1.0, 4.0), &p(0.0, 0.0), &p(10.0, 0.0)).is_none());
    }

    #[test]
    fn test_endpoint_foot_accepted() {
        let (foot, d) = foot_of_perpendicular(&p(10.0, 3.0), &p(0.0, 0.0), &p(10.0, 0.0)).unwrap();
        assert_eq!(foot, p(10.0, 0.0));
        assert_eq!(d, 3.0);
    }

    #[test]
    fn test_degenerate_segment() {
        assert!(foot_of_perpendicular(&p(1.0, 1.0), &p(2.0, 2.0), &p(2.0, 2.0)).is_none());
        assert!(
            foot_of_perpendicular_with(&p(1.0, 1.0), &p(2.0, 2.0), &p(2.0, 2.0), OnSegmentTest::Parametric)
                .is_none()
        );
    }

    #[test]
    fn test_near_vertical_slope_has_no_overflow() {
        let a = p(0.0, 0.0);
        let b = p(1e-200, 10.0);
        let (foot, d) = foot_of_perpendicular(&p(3.0, 5.0), &a, &b).unwrap();
        assert!(foot.x.is_finite() && foot.y.is_finite());
        assert_relative_eq!(d, 3.0, max_relative = 1e-9);
    }

    #[test]
    fn test_distance_matches_cross_product_at_utm_scale() {
        let a = p(691_650.25, 5_334_754.5);
        let b = p(691_650.75, 5_334_854.5); // nearly due north
        let q = p(691_655.0, 5_334_800.0);
        let (_, d) = foot_of_perpendicular(&q, &a, &b).unwrap();
        assert_relative_eq!(d, line_distance(&q, &a, &b), max_relative = 1e-9);
    }

    #[test]
    fn test_bounding_box_and_parametric_agree() {
        let a = p(0.0, 0.0);
        let b = p(40.0, 9.0);
        // Feet range from before the start to past the end
        for i in -20..60 {
            let q = p(i as f64, 20.0 - i as f64 * 0.7);
            let bbox = foot_of_perpendicular_with(&q, &a, &b, OnSegmentTest::BoundingBox);
            let param = foot_of_perpendicular_with(&q, &a, &b, OnSegmentTest::Parametric);
            match (bbox, param) {
                (Some((f1, d1)), Some((f2, d2))) => {
                    assert_relative_eq!(f1.x, f2.x, epsilon = 1e-9);
                    assert_relative_eq!(f1.y, f2.y, epsilon = 1e-9);
                    assert_relative_eq!(d1, d2, epsilon = 1e-9);
                }
                (None, None) => {}
                other => panic!("tests disagree for {:?}: {:?}", q, other),
            }
        }
    }

    #[test]
    fn test_line_foot_is_perpendicular() {
        let a = p(2.0, 1.0);
        let b = p(7.0, 4.0);
        let q = p(-3.0, 8.0);
        let foot = line_foot(&q, &a, &b).unwrap();
        let dot = (q.x - foot.x) * (b.x - a.x) + (q.y - foot.y) * (b.y - a.y);
        assert!(dot.abs() < 1e-9);
    }
}
