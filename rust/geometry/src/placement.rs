// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement resolution: IfcLocalPlacement chains folded into one rigid
//! object-to-root transform.

use ifc_indoor_core::{DecodedEntity, EntityGraph};
use nalgebra::{Matrix3, Point3, Vector3};

use crate::error::{Error, Result};
use crate::helpers::{cartesian_point, direction};
use crate::math::basis_from_axes;
use crate::shape::Shape;

/// Chains deeper than this are treated as cyclic
pub const MAX_PLACEMENT_DEPTH: usize = 100;

/// Rigid transform: `p' = rotation * p + translation`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

impl Placement {
    pub fn new(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    /// Compose with a placement expressed inside this one.
    ///
    /// The result maps `inner`'s local coordinates straight into this
    /// placement's parent frame.
    #[inline]
    pub fn then(&self, inner: &Placement) -> Placement {
        Placement {
            rotation: self.rotation * inner.rotation,
            translation: self.rotation * inner.translation + self.translation,
        }
    }

    #[inline]
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * point.coords + self.translation)
    }

    pub fn apply_shape(&self, shape: &Shape) -> Shape {
        shape.transformed(&self.rotation, &self.translation)
    }
}

/// Resolves object placements up to a stated root placement.
///
/// The root placement's own frame is not applied: results are expressed in
/// the root's local coordinates. Without a root the full chain is folded.
pub struct PlacementResolver<'g> {
    graph: &'g dyn EntityGraph,
    root: Option<u32>,
}

impl<'g> PlacementResolver<'g> {
    pub fn new(graph: &'g dyn EntityGraph, root: Option<u32>) -> Self {
        Self { graph, root }
    }

    /// Object-to-root transform of a product's ObjectPlacement
    pub fn resolve_product(&self, product: &DecodedEntity) -> Result<Placement> {
        let placement = self
            .graph
            .resolve(product, "ObjectPlacement")
            .ok_or_else(|| Error::missing(product.id, "ObjectPlacement"))?;
        self.resolve(placement, Placement::identity())
    }

    /// Fold `placement` and its parents into `accumulator`.
    ///
    /// `accumulator` is a transform into `placement`'s local frame; the
    /// returned value maps the same coordinates into the root frame.
    pub fn resolve(&self, placement: &DecodedEntity, accumulator: Placement) -> Result<Placement> {
        let mut chain = Vec::new();
        let mut current = Some(placement);

        while let Some(entity) = current {
            if Some(entity.id) == self.root {
                break;
            }
            if chain.len() >= MAX_PLACEMENT_DEPTH {
                return Err(Error::PlacementTooDeep(MAX_PLACEMENT_DEPTH));
            }
            chain.push(self.local(entity)?);
            current = self.graph.resolve(entity, "PlacementRelTo");
        }

        // Outermost first
        let outer = chain
            .iter()
            .rev()
            .fold(Placement::identity(), |outer, local| outer.then(local));
        Ok(outer.then(&accumulator))
    }

    /// Transform of one IfcLocalPlacement relative to its parent.
    ///
    /// Location, Axis and RefDirection are all required here; a chain with
    /// a missing attribute fails instead of falling back to identity.
    pub fn local(&self, placement: &DecodedEntity) -> Result<Placement> {
        if !placement.is("IFCLOCALPLACEMENT") {
            return Err(Error::UnexpectedType {
                entity: placement.id,
                expected: "IFCLOCALPLACEMENT",
                found: placement.type_name.clone(),
            });
        }

        let relative = self
            .graph
            .resolve(placement, "RelativePlacement")
            .ok_or_else(|| Error::missing(placement.id, "RelativePlacement"))?;

        let location = self
            .graph
            .resolve(relative, "Location")
            .and_then(cartesian_point)
            .ok_or_else(|| Error::missing(relative.id, "Location"))?;

        let axis = if relative.is("IFCAXIS2PLACEMENT3D") {
            self.graph
                .resolve(relative, "Axis")
                .and_then(direction)
                .ok_or_else(|| Error::missing(relative.id, "Axis"))?
        } else if relative.is("IFCAXIS2PLACEMENT2D") {
            Vector3::z()
        } else {
            return Err(Error::UnexpectedType {
                entity: relative.id,
                expected: "IFCAXIS2PLACEMENT3D",
                found: relative.type_name.clone(),
            });
        };

        let ref_direction = self
            .graph
            .resolve(relative, "RefDirection")
            .and_then(direction)
            .ok_or_else(|| Error::missing(relative.id, "RefDirection"))?;

        let rotation = basis_from_axes(&axis, &ref_direction).ok_or_else(|| {
            Error::degenerate(format!("#{}: Axis and RefDirection are parallel", relative.id))
        })?;

        Ok(Placement::new(rotation, location.coords))
    }
}
