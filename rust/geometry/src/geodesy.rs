// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geographic math on a spherical Earth
//!
//! Degrees-minutes-seconds conversion, planar distance/bearing in the model
//! frame, and the direct and inverse geodesic problems.

/// Mean Earth radius in metres (IUGG)
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Convert an IfcCompoundPlaneAngleMeasure to decimal degrees.
///
/// Components are degrees, minutes, seconds and optionally millionths of a
/// second. All components carry the same sign.
pub fn dms_to_decimal(components: &[f64]) -> Option<f64> {
    let degrees = *components.first()?;
    let minutes = components.get(1).copied().unwrap_or(0.0);
    let seconds = components.get(2).copied().unwrap_or(0.0);
    let millionths = components.get(3).copied().unwrap_or(0.0);

    let value = degrees + minutes / 60.0 + (seconds + millionths / 1e6) / 3600.0;
    value.is_finite().then_some(value)
}

/// Euclidean length of a planar offset
#[inline]
pub fn planar_distance(dx: f64, dy: f64) -> f64 {
    dx.hypot(dy)
}

/// Compass bearing in degrees (clockwise from +Y, range 0..360) of a planar
/// offset. The mathematical angle `atan2(dy, dx)` is complemented to 90°.
#[inline]
pub fn planar_bearing(dx: f64, dy: f64) -> f64 {
    let math_angle = dy.atan2(dx).to_degrees();
    (90.0 - math_angle).rem_euclid(360.0)
}

/// Direct geodesic problem: destination from `origin` after travelling
/// `distance_m` metres on initial compass bearing `bearing_deg`.
pub fn destination(origin: LatLon, bearing_deg: f64, distance_m: f64) -> LatLon {
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lon.to_radians();
    let theta = bearing_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let (sin_delta, cos_delta) = delta.sin_cos();

    let sin_phi2 = (sin_phi1 * cos_delta + cos_phi1 * sin_delta * theta.cos()).clamp(-1.0, 1.0);
    let phi2 = sin_phi2.asin();
    let y = theta.sin() * sin_delta * cos_phi1;
    let x = cos_delta - sin_phi1 * sin_phi2;
    let lambda2 = lambda1 + y.atan2(x);

    LatLon {
        lat: phi2.to_degrees(),
        lon: (lambda2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0,
    }
}

/// Inverse geodesic problem: great-circle distance in metres (haversine)
/// and initial compass bearing in degrees from `from` to `to`.
pub fn inverse(from: LatLon, to: LatLon) -> (f64, f64) {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let d_phi = phi2 - phi1;
    let d_lambda = (to.lon - from.lon).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let distance = 2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);

    (distance, bearing)
}

/// Great-circle distance in metres
#[inline]
pub fn distance(from: LatLon, to: LatLon) -> f64 {
    inverse(from, to).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_dms_to_decimal() {
        assert_abs_diff_eq!(dms_to_decimal(&[48.0, 8.0, 15.0]).unwrap(), 48.1375, epsilon = 1e-12);
        assert_abs_diff_eq!(
            dms_to_decimal(&[11.0, 34.0, 30.0, 500_000.0]).unwrap(),
            11.0 + 34.0 / 60.0 + 30.5 / 3600.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(dms_to_decimal(&[-33.0, -52.0, 0.0]).unwrap(), -33.866_666_666, epsilon = 1e-8);
        assert!(dms_to_decimal(&[]).is_none());
        assert!(dms_to_decimal(&[f64::NAN, 1.0]).is_none());
    }

    #[test]
    fn test_planar_bearing() {
        assert_abs_diff_eq!(planar_bearing(0.0, 1.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(planar_bearing(1.0, 0.0), 90.0, epsilon = 1e-12);
        assert_abs_diff_eq!(planar_bearing(0.0, -1.0), 180.0, epsilon = 1e-12);
        assert_abs_diff_eq!(planar_bearing(-1.0, 0.0), 270.0, epsilon = 1e-12);
        assert_abs_diff_eq!(planar_distance(3.0, 4.0), 5.0);
    }

    #[test]
    fn test_destination_due_north() {
        let origin = LatLon::new(0.0, 0.0);
        let dest = destination(origin, 0.0, EARTH_RADIUS_M * 1f64.to_radians());
        assert_abs_diff_eq!(dest.lat, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(dest.lon, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_geodetic_round_trip() {
        let origin = LatLon::new(48.137_154, 11.576_124);
        for (bearing, dist) in [(37.5, 25.0), (210.0, 143.2), (359.0, 0.75), (90.0, 1_000.0)] {
            let dest = destination(origin, bearing, dist);
            // Coordinates are handed on at 1e-9 degree precision
            let dest = LatLon::new(
                (dest.lat * 1e9).round() / 1e9,
                (dest.lon * 1e9).round() / 1e9,
            );
            let (back, initial) = inverse(origin, dest);
            assert_abs_diff_eq!(back, dist, epsilon = 1e-3);
            assert_abs_diff_eq!(initial, bearing, epsilon = 0.05);
        }
    }
}
