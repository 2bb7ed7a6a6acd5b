// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Linear algebra primitives: rotation builders and orthonormal bases.

use nalgebra::{Matrix3, Vector2, Vector3};

/// Lengths below this are treated as zero when normalizing
const NORM_EPSILON: f64 = 1e-12;

/// Rotation about the X axis by `angle` radians
#[inline]
pub fn rotation_x(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
}

/// Rotation about the Y axis by `angle` radians
#[inline]
pub fn rotation_y(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c)
}

/// Rotation about the Z (vertical) axis by `angle` radians
#[inline]
pub fn rotation_z(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Orthonormal basis from a vertical axis and a reference direction.
///
/// Gram-Schmidt against the axis: `x = ref - (ref·z) z`, `y = z × x`.
/// The returned matrix has x, y, z as its columns, so it maps local
/// coordinates into the parent frame. Returns `None` when either vector is
/// zero or the two are parallel.
pub fn basis_from_axes(axis: &Vector3<f64>, ref_direction: &Vector3<f64>) -> Option<Matrix3<f64>> {
    let z_norm = axis.norm();
    if !(z_norm > NORM_EPSILON) {
        return None;
    }
    let z = axis / z_norm;

    let x = ref_direction - z * ref_direction.dot(&z);
    let x_norm = x.norm();
    if !(x_norm > NORM_EPSILON) {
        return None;
    }
    let x = x / x_norm;
    let y = z.cross(&x).normalize();

    Some(Matrix3::from_columns(&[x, y, z]))
}

/// Signed angle in radians that rotates `from` onto `to`, counter-clockwise
/// positive.
#[inline]
pub fn signed_angle(from: &Vector2<f64>, to: &Vector2<f64>) -> f64 {
    let cross = from.x * to.y - from.y * to.x;
    let dot = from.dot(to);
    cross.atan2(dot)
}

/// True when all columns are unit length and pairwise orthogonal
pub fn is_orthonormal(matrix: &Matrix3<f64>, tolerance: f64) -> bool {
    let columns = [matrix.column(0), matrix.column(1), matrix.column(2)];
    for (i, a) in columns.iter().enumerate() {
        if (a.norm() - 1.0).abs() > tolerance {
            return false;
        }
        for b in columns.iter().skip(i + 1) {
            if a.dot(b).abs() > tolerance {
                return false;
            }
        }
    }
    true
}
