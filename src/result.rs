//! Evaluation output records consumed by reporting.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, OptionExt, Result};
use crate::stats;
use crate::track::{Route, Track};
use crate::PlanarPoint;

/// Which part of the route produced the closest point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Closest point is route vertex `route_index`
    Vertex,
    /// Closest point is interpolated on segment `route_index -> route_index + 1`
    Segment,
}

/// Lateral error of one track point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorSample {
    /// Position of the point in the track
    pub track_index: usize,
    /// The track point
    pub point: PlanarPoint,
    /// Minimal lateral distance to the route in meters
    pub distance: f64,
    /// Closest point on the route
    pub closest: PlanarPoint,
    /// Vertex index, or segment start index for `MatchKind::Segment`
    pub route_index: usize,
    pub kind: MatchKind,
}

/// Accuracy summary of one track against its route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Track name, if known
    pub name: Option<String>,
    /// First recorded timestamp
    pub start_time: Option<DateTime<Utc>>,
    /// Last recorded timestamp
    pub end_time: Option<DateTime<Utc>>,
    /// Seconds from start to end; `None` when the track has no timestamps
    pub duration: Option<f64>,
    /// Mean lateral error in meters
    pub mean: f64,
    /// Median lateral error in meters
    pub median: f64,
    /// 95th percentile lateral error in meters
    pub p95: f64,
    /// Largest lateral error in meters
    pub max: f64,
    /// Planar length of the track in meters
    pub track_length: f64,
    /// Planar length of the route in meters
    pub route_length: f64,
    /// Mean seconds between timestamped samples
    pub sample_interval_mean: Option<f64>,
    /// Longest gap in seconds between timestamped samples
    pub sample_interval_max: Option<f64>,
    /// One sample per track point, in track order
    pub samples: Vec<ErrorSample>,
}

impl EvaluationResult {
    pub(crate) fn from_samples(
        route: &Route,
        track: &Track,
        samples: Vec<ErrorSample>,
    ) -> Result<Self> {
        let distances: Vec<f64> = samples.iter().map(|s| s.distance).collect();
        let summary = stats::summarize(&distances).ok_or(EvalError::EmptyTrack)?;

        let intervals = track.sample_intervals();
        let sample_interval_max = intervals.iter().copied().reduce(f64::max);

        Ok(Self {
            name: track.name().map(str::to_string),
            start_time: track.start_time(),
            end_time: track.end_time(),
            duration: track.duration(),
            mean: summary.mean,
            median: summary.median,
            p95: summary.p95,
            max: summary.max,
            track_length: track.length(),
            route_length: route.length(),
            sample_interval_mean: stats::mean(&intervals),
            sample_interval_max,
            samples,
        })
    }

    /// Duration in seconds, or [`EvalError::MissingTimestamps`].
    pub fn require_duration(&self) -> Result<f64> {
        self.duration.ok_or_missing_timestamps()
    }

    /// Error distances in track order.
    pub fn errors(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.distance)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_dash<T: fmt::Display>(value: Option<T>) -> String {
            value.map_or_else(|| "-".to_string(), |v| v.to_string())
        }

        writeln!(f, "name:              \t{}", self.name.as_deref().unwrap_or("-"))?;
        writeln!(f, "start_time:        \t{}", or_dash(self.start_time))?;
        writeln!(f, "end_time:          \t{}", or_dash(self.end_time))?;
        match self.duration {
            Some(d) => writeln!(f, "time:              \t{:.2}s", d)?,
            None => writeln!(f, "time:              \t-")?,
        }
        writeln!(f, "errors.mean        \t{:.2}m", self.mean)?;
        writeln!(f, "errors.median      \t{:.2}m", self.median)?;
        write!(f, "errors.percentile  \t{:.2}m", self.p95)
    }
}
