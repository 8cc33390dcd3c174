//! # Geographic Projection
//!
//! Converts WGS84-style latitude/longitude into a locally planar frame in
//! meters so that Euclidean distance and line geometry are valid, and back.
//!
//! The projection is Universal Transverse Mercator on the WGS84 ellipsoid.
//! The series math comes from the `utm` crate; this module owns the
//! parameter value, the hemisphere convention and the domain checks.
//!
//! Projection parameters are always an explicit [`UtmProjection`] value.
//! Route and track must be projected with the same value for their planar
//! coordinates to be comparable.
//!
//! ## Example
//!
//! ```rust
//! use track_accuracy::{GeoPoint, projection::{Ellipsoid, UtmProjection}};
//!
//! let munich = GeoPoint::new(48.1374, 11.5755);
//! let utm = UtmProjection::for_point(&munich, Ellipsoid::Wgs84).unwrap();
//! assert_eq!(utm.zone(), 32);
//!
//! let planar = utm.project(&munich).unwrap();
//! let back = utm.unproject(&planar).unwrap();
//! assert!((back.latitude - munich.latitude).abs() < 1e-6);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::{GeoPoint, PlanarPoint};

const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// UTM latitude band limits in degrees.
const MIN_LATITUDE: f64 = -80.0;
const MAX_LATITUDE: f64 = 84.0;

/// Maximum distance from the central meridian, in degrees, accepted for a zone.
/// Half a zone is 3°, so this admits one full zone width of overlap.
const MAX_MERIDIAN_OFFSET: f64 = 6.0;

/// Reference ellipsoid for the projection.
///
/// Kept as part of the parameter value so that planar coordinates record
/// the datum they were produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Ellipsoid {
    #[default]
    Wgs84,
}

impl fmt::Display for Ellipsoid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ellipsoid::Wgs84 => write!(f, "WGS84"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
}

/// Parameters of a UTM projection: zone, hemisphere and ellipsoid.
///
/// Two planar coordinates are only comparable when they were produced by
/// equal `UtmProjection` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtmProjection {
    zone: u8,
    hemisphere: Hemisphere,
    ellipsoid: Ellipsoid,
}

impl UtmProjection {
    /// Create projection parameters for an explicit zone.
    ///
    /// Fails with [`ProjectionError::InvalidZone`] unless `zone` is in 1..=60.
    pub fn new(
        zone: u8,
        hemisphere: Hemisphere,
        ellipsoid: Ellipsoid,
    ) -> Result<Self, ProjectionError> {
        if !(1..=60).contains(&zone) {
            return Err(ProjectionError::InvalidZone(zone));
        }
        Ok(Self {
            zone,
            hemisphere,
            ellipsoid,
        })
    }

    /// Pick the standard UTM zone and hemisphere containing `point`.
    ///
    /// Honors the southwest Norway (32V) and Svalbard (31X-37X) exceptions.
    pub fn for_point(point: &GeoPoint, ellipsoid: Ellipsoid) -> Result<Self, ProjectionError> {
        if !point.is_valid() {
            return Err(ProjectionError::InvalidCoordinate {
                latitude: point.latitude,
                longitude: point.longitude,
            });
        }
        let (lat, lon) = (point.latitude, point.longitude);
        let zone = utm::lat_lon_to_zone_number(lat, lon).min(60);

        let hemisphere = if lat >= 0.0 {
            Hemisphere::North
        } else {
            Hemisphere::South
        };
        Self::new(zone, hemisphere, ellipsoid)
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    pub fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    /// Longitude of the zone's central meridian in degrees.
    pub fn central_meridian(&self) -> f64 {
        self.zone as f64 * 6.0 - 183.0
    }

    fn false_northing(&self) -> f64 {
        match self.hemisphere {
            Hemisphere::North => 0.0,
            Hemisphere::South => FALSE_NORTHING_SOUTH,
        }
    }

    /// Project a geographic point to UTM easting (x) / northing (y) in meters.
    pub fn project(&self, point: &GeoPoint) -> Result<PlanarPoint, ProjectionError> {
        self.check_domain(point.latitude, point.longitude)?;

        let (northing, easting, _convergence) = utm::to_utm_wgs84(
            point.latitude.to_radians(),
            point.longitude.to_radians(),
            self.zone,
        );
        // Signed distance from the equator, whatever offset was applied
        let northing = if point.latitude < 0.0 && northing > 0.0 {
            northing - FALSE_NORTHING_SOUTH
        } else {
            northing
        };

        Ok(PlanarPoint::new(easting, northing + self.false_northing()))
    }

    /// Convert UTM easting/northing back to latitude/longitude.
    ///
    /// The returned point carries no timestamp.
    pub fn unproject(&self, point: &PlanarPoint) -> Result<GeoPoint, ProjectionError> {
        if !(1..=60).contains(&self.zone) {
            return Err(ProjectionError::InvalidZone(self.zone));
        }
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(ProjectionError::InvalidPlanar {
                x: point.x,
                y: point.y,
            });
        }

        // Band letters only select the hemisphere: N and above is north
        let signed = point.y - self.false_northing();
        let (northing, letter) = if signed < 0.0 {
            (signed + FALSE_NORTHING_SOUTH, 'M')
        } else {
            (signed, 'N')
        };
        let (latitude, longitude) = utm::wsg84_utm_to_lat_lon(point.x, northing, self.zone, letter)
            .map_err(|_| ProjectionError::InvalidPlanar {
                x: point.x,
                y: point.y,
            })?;

        let longitude = if longitude > 180.0 {
            longitude - 360.0
        } else if longitude < -180.0 {
            longitude + 360.0
        } else {
            longitude
        };
        self.check_domain(latitude, longitude)?;
        Ok(GeoPoint::new(latitude, longitude))
    }

    fn check_domain(&self, latitude: f64, longitude: f64) -> Result<(), ProjectionError> {
        if !(1..=60).contains(&self.zone) {
            return Err(ProjectionError::InvalidZone(self.zone));
        }
        if !GeoPoint::new(latitude, longitude).is_valid() {
            return Err(ProjectionError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            return Err(ProjectionError::OutsideUtmBand { latitude });
        }
        // Wrap so zones adjacent to the antimeridian measure the short way round
        let mut offset = longitude - self.central_meridian();
        if offset > 180.0 {
            offset -= 360.0;
        } else if offset < -180.0 {
            offset += 360.0;
        }
        if offset.abs() > MAX_MERIDIAN_OFFSET {
            return Err(ProjectionError::OutsideZone {
                longitude,
                zone: self.zone,
            });
        }
        Ok(())
    }
}

impl fmt::Display for UtmProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hemisphere = match self.hemisphere {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        };
        write!(f, "UTM {}{} ({})", self.zone, hemisphere, self.ellipsoid)
    }
}

/// Project a geographic point under explicit projection parameters.
pub fn project(point: &GeoPoint, params: &UtmProjection) -> Result<PlanarPoint, ProjectionError> {
    params.project(point)
}

/// Unproject a planar point under explicit projection parameters.
pub fn unproject(point: &PlanarPoint, params: &UtmProjection) -> Result<GeoPoint, ProjectionError> {
    params.unproject(point)
}
