// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extracted shapes as lists of rings.
//!
//! Point-set boolean operations here work on vertex coincidence only. A
//! DIFFERENCE removes every vertex of the first operand that also occurs in
//! the second; this matches true solid subtraction only where the operand
//! boundaries share vertices.

use nalgebra::{Matrix3, Point3, Vector3};

/// Loop delimiter in flat point sequences
pub const SENTINEL: [f64; 3] = [-99.0, -99.0, -99.0];

/// Default tolerance for vertex coincidence
pub const DEFAULT_POINT_TOLERANCE: f64 = 1e-6;

/// One loop of points
pub type Ring = Vec<Point3<f64>>;

#[inline]
pub fn is_sentinel(point: &Point3<f64>) -> bool {
    point.x == SENTINEL[0] && point.y == SENTINEL[1] && point.z == SENTINEL[2]
}

#[inline]
fn sentinel_point() -> Point3<f64> {
    Point3::new(SENTINEL[0], SENTINEL[1], SENTINEL[2])
}

#[inline]
fn coincident(a: &Point3<f64>, b: &Point3<f64>, tolerance: f64) -> bool {
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance && (a.z - b.z).abs() <= tolerance
}

/// Geometry of one object: zero or more rings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub rings: Vec<Ring>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ring(ring: Ring) -> Self {
        let mut shape = Self::new();
        shape.push_ring(ring);
        shape
    }

    /// Add a ring; empty rings are ignored
    pub fn push_ring(&mut self, ring: Ring) {
        if !ring.is_empty() {
            self.rings.push(ring);
        }
    }

    /// True when the shape holds no points at all
    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(|ring| ring.is_empty())
    }

    pub fn point_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }

    pub fn points(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.rings.iter().flatten()
    }

    /// All coordinates are finite (no NaN from failed numeric parses)
    pub fn is_finite(&self) -> bool {
        self.points()
            .all(|p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite())
    }

    pub fn contains_point(&self, point: &Point3<f64>, tolerance: f64) -> bool {
        self.points().any(|p| coincident(p, point, tolerance))
    }

    /// Split a flat, sentinel-delimited sequence into rings
    pub fn from_flat(points: &[Point3<f64>]) -> Self {
        let mut shape = Self::new();
        for chunk in points.split(is_sentinel) {
            shape.push_ring(chunk.to_vec());
        }
        shape
    }

    /// Flatten into one sequence, each ring terminated by the sentinel
    pub fn to_flat(&self) -> Vec<Point3<f64>> {
        let mut flat = Vec::with_capacity(self.point_count() + self.rings.len());
        for ring in &self.rings {
            flat.extend_from_slice(ring);
            flat.push(sentinel_point());
        }
        flat
    }

    /// Vertex-coincidence DIFFERENCE: drop every point that also occurs in
    /// `other`. Rings left without points disappear.
    pub fn difference(&self, other: &Shape, tolerance: f64) -> Shape {
        self.retain_points(|p| !other.contains_point(p, tolerance))
    }

    /// Vertex-coincidence INTERSECTION: keep only points that also occur in
    /// `other`.
    pub fn intersection(&self, other: &Shape, tolerance: f64) -> Shape {
        self.retain_points(|p| other.contains_point(p, tolerance))
    }

    /// UNION: rings of both shapes, `self` first
    pub fn union(mut self, other: Shape) -> Shape {
        self.rings.extend(other.rings.into_iter().filter(|r| !r.is_empty()));
        self
    }

    /// Subtract an opening from a host shape.
    ///
    /// The host loses every vertex shared with the opening; opening vertices
    /// that matched nothing in the host are appended as one extra ring.
    pub fn subtract_opening(&self, opening: &Shape, tolerance: f64) -> Shape {
        let mut result = self.difference(opening, tolerance);
        let leftover: Ring = opening
            .points()
            .filter(|p| !self.contains_point(p, tolerance))
            .copied()
            .collect();
        result.push_ring(leftover);
        result
    }

    /// Apply `rotation * p + translation` to every point
    pub fn transformed(&self, rotation: &Matrix3<f64>, translation: &Vector3<f64>) -> Shape {
        Shape {
            rings: self
                .rings
                .iter()
                .map(|ring| ring.iter().map(|p| Point3::from(rotation * p.coords + translation)).collect())
                .collect(),
        }
    }

    fn retain_points(&self, keep: impl Fn(&Point3<f64>) -> bool) -> Shape {
        let mut result = Shape::new();
        for ring in &self.rings {
            result.push_ring(ring.iter().filter(|p| keep(p)).copied().collect());
        }
        result
    }
}

/// Close a ring by repeating its first point, unless already closed
pub fn close_ring(ring: &mut Ring) {
    let needs_closing = match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => ring.len() > 1 && first != last,
        _ => false,
    };
    if needs_closing {
        let first = ring[0];
        ring.push(first);
    }
}
