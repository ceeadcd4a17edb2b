// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spherical Mercator projection and local recentering
//!
//! Footprints arrive as lon/lat rings; everything downstream works in a
//! planar east/north frame in meters, centered on one reference
//! location so Float32 buffers keep their precision.

use nalgebra::{Point2, Point3};

/// Earth radius used by the spherical Mercator projection, in meters
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Project a lon/lat coordinate (degrees) to spherical Mercator.
///
/// x is the east axis (longitude term), y the north axis (Mercator
/// latitude term), z the input height.
///
/// Pure numeric function: latitudes at or beyond ±90° produce non-finite
/// output, which callers must treat as out of the supported domain.
#[inline]
pub fn mercator(lon_deg: f64, lat_deg: f64, height: f64) -> Point3<f64> {
    let radius = EARTH_RADIUS + height;
    let x = lon_deg.to_radians() * radius;
    let phi = lat_deg.to_radians();
    let y = radius / 2.0 * ((1.0 + phi.sin()) / (1.0 - phi.sin())).ln();

    Point3::new(x, y, height)
}

/// Projects lon/lat coordinates into a plane recentered on a reference
/// location (the reference itself maps to the origin).
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    reference: Point3<f64>,
}

impl Projector {
    /// Create a projector centered on the given reference location
    pub fn new(ref_lon: f64, ref_lat: f64) -> Self {
        Self {
            reference: mercator(ref_lon, ref_lat, 0.0),
        }
    }

    /// Project one coordinate into the local east/north plane
    #[inline]
    pub fn to_local(&self, lon: f64, lat: f64) -> Point2<f64> {
        let projected = mercator(lon, lat, 0.0);
        Point2::new(
            projected.x - self.reference.x,
            projected.y - self.reference.y,
        )
    }

    /// Project a whole lon/lat ring into local planar coordinates
    pub fn project_ring(&self, ring: &[[f64; 2]]) -> Vec<Point2<f64>> {
        ring.iter()
            .map(|&[lon, lat]| self.to_local(lon, lat))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_maps_to_origin() {
        let projector = Projector::new(114.3, 30.6);
        let origin = projector.to_local(114.3, 30.6);
        assert_relative_eq!(origin.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(origin.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_equator_longitude_scale() {
        // One degree of longitude at the equator is R * pi/180 meters
        let p = mercator(1.0, 0.0, 0.0);
        assert_relative_eq!(p.x, EARTH_RADIUS * std::f64::consts::PI / 180.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_latitude_symmetry() {
        // Mercator northing is antisymmetric about the equator
        let north = mercator(0.0, 45.0, 0.0);
        let south = mercator(0.0, -45.0, 0.0);
        assert_relative_eq!(north.y, -south.y, epsilon = 1e-6);
    }

    #[test]
    fn test_height_scales_radius() {
        let ground = mercator(1.0, 0.0, 0.0);
        let raised = mercator(1.0, 0.0, 1000.0);
        assert!(raised.x > ground.x);
        assert_relative_eq!(
            raised.x / ground.x,
            (EARTH_RADIUS + 1000.0) / EARTH_RADIUS,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_pole_is_out_of_domain() {
        // lat = 90° makes the log argument blow up; the projection
        // reports that as a non-finite value, not a panic
        let pole = mercator(0.0, 90.0, 0.0);
        assert!(!pole.y.is_finite());
    }

    #[test]
    fn test_local_frame_orientation() {
        let projector = Projector::new(114.3, 30.6);
        let east = projector.to_local(114.31, 30.6);
        let north = projector.to_local(114.3, 30.61);
        assert!(east.x > 0.0 && east.y.abs() < 1e-6);
        assert!(north.y > 0.0 && north.x.abs() < 1e-6);
    }
}
