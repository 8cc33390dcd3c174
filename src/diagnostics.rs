//! Error-bar output for visual inspection.

use crate::error::Result;
use crate::projection::UtmProjection;
use crate::result::EvaluationResult;
use crate::GeoPoint;

/// Single polyline tracing every error bar of `result`.
///
/// For each sample the polyline visits the track point, the closest route
/// point and returns to the track point, so drawing it over a map shows
/// one whisker per recorded position. `projection` must be the one the
/// evaluated route and track were built with.
pub fn error_bars(result: &EvaluationResult, projection: &UtmProjection) -> Result<Vec<GeoPoint>> {
    let mut bars = Vec::with_capacity(result.samples.len() * 3);
    for sample in &result.samples {
        let track_point = projection.unproject(&sample.point)?;
        let closest = projection.unproject(&sample.closest)?;
        bars.extend([track_point, closest, track_point]);
    }
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvaluationConfig;
    use crate::evaluator::evaluate;
    use crate::projection::Ellipsoid;
    use crate::track::{Route, Track};

    #[test]
    fn test_error_bars_trace_each_sample() {
        let route_points: Vec<GeoPoint> = (0..6)
            .map(|i| GeoPoint::new(48.130 + i as f64 * 0.001, 11.570))
            .collect();
        let track_points = vec![
            GeoPoint::new(48.1305, 11.5701),
            GeoPoint::new(48.1325, 11.5699),
            GeoPoint::new(48.1342, 11.5702),
        ];
        let utm = UtmProjection::for_point(&route_points[0], Ellipsoid::Wgs84).unwrap();
        let route = Route::from_geo(&route_points, utm).unwrap();
        let track = Track::from_geo(&track_points, utm).unwrap();
        let result = evaluate(&route, &track, &EvaluationConfig::default()).unwrap();

        let bars = error_bars(&result, &utm).unwrap();
        assert_eq!(bars.len(), 9);

        for (k, original) in track_points.iter().enumerate() {
            let start = bars[k * 3];
            let end = bars[k * 3 + 2];
            assert_eq!(start, end);
            assert!((start.latitude - original.latitude).abs() < 1e-6);
            assert!((start.longitude - original.longitude).abs() < 1e-6);

            // Ground length of the bar agrees with the planar error up to
            // the UTM scale factor
            let ground = start.haversine_distance(&bars[k * 3 + 1]);
            let planar = result.samples[k].distance;
            assert!(
                (ground - planar).abs() < planar * 0.01,
                "bar {}: ground {} vs planar {}",
                k,
                ground,
                planar
            );
        }
    }
}
