//! Configuration for track evaluation.

use serde::{Deserialize, Serialize};

/// How the segment solver decides whether a perpendicular foot lies on a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OnSegmentTest {
    /// Foot must lie inside the segment's bounding rectangle.
    ///
    /// Accepts feet up to 1e-9 m outside the rectangle to absorb rounding.
    /// Published accuracy figures were produced with this test.
    #[default]
    BoundingBox,
    /// Foot's projection parameter `t` along the segment must be in [0, 1].
    Parametric,
}

/// Configuration for track evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Number of segments inspected on each side of the nearest route vertex.
    /// A window of `w` checks segments `[i - w, i + w - 1]` around vertex `i`.
    /// Assumes route vertices are dense relative to curvature.
    /// Default: 2
    pub search_window: usize,

    /// On-segment test applied to each perpendicular foot.
    /// Default: BoundingBox
    pub on_segment: OnSegmentTest,

    /// Minimum track length before `evaluate_parallel` spreads work across threads.
    /// Shorter tracks are evaluated sequentially. Default: 1000
    pub parallel_min_points: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            search_window: 2,
            on_segment: OnSegmentTest::BoundingBox,
            parallel_min_points: 1000,
        }
    }
}

impl EvaluationConfig {
    pub fn with_search_window(mut self, search_window: usize) -> Self {
        self.search_window = search_window;
        self
    }

    pub fn with_on_segment(mut self, on_segment: OnSegmentTest) -> Self {
        self.on_segment = on_segment;
        self
    }

    pub fn with_parallel_min_points(mut self, parallel_min_points: usize) -> Self {
        self.parallel_min_points = parallel_min_points;
        self
    }

    /// Inclusive range of segment start indices to inspect around `nearest`
    /// on a route of `route_len` vertices. `None` when there is nothing to check.
    pub(crate) fn segment_window(&self, nearest: usize, route_len: usize) -> Option<(usize, usize)> {
        if self.search_window == 0 || route_len < 2 {
            return None;
        }
        let first = nearest.saturating_sub(self.search_window);
        let last = nearest
            .saturating_add(self.search_window - 1)
            .min(route_len - 2);
        (first <= last).then_some((first, last))
    }
}
