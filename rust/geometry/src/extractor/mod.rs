// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry extractor
//!
//! Turns a classified shape representation into local points grouped in
//! rings. Dispatch is split by concern across submodules, each adding
//! methods to [`GeometryExtractor`]:
//! - `brep`: faceted boundary representations
//! - `boolean`: boolean results and their operands
//! - `extrusion`: extruded-area solids and their profiles
//! - `curve`: polylines, composite and trimmed curves
//!
//! Every method answers `Option<_>`. `None` means "no usable shape" and is
//! never an error: the caller drops the object and carries on.

mod boolean;
mod brep;
mod curve;
mod extrusion;

#[cfg(test)]
mod tests;

pub use boolean::BooleanOperator;

use ifc_indoor_core::{DecodedEntity, EntityGraph};
use nalgebra::Vector3;

use crate::helpers::cartesian_point;
use crate::representation::{item_kind, ItemKind, RepresentationIdentifier, ShapeRepresentation};
use crate::shape::{Shape, DEFAULT_POINT_TOLERANCE};

/// Nested boolean operands and composite curves deeper than this are
/// abandoned
pub(crate) const MAX_NESTING_DEPTH: usize = 32;

/// Shape extraction over one entity graph
pub struct GeometryExtractor<'g> {
    graph: &'g dyn EntityGraph,
    tolerance: f64,
}

impl<'g> GeometryExtractor<'g> {
    pub fn new(graph: &'g dyn EntityGraph) -> Self {
        Self::with_tolerance(graph, DEFAULT_POINT_TOLERANCE)
    }

    /// Vertex-coincidence tolerance for boolean operations
    pub fn with_tolerance(graph: &'g dyn EntityGraph, tolerance: f64) -> Self {
        Self { graph, tolerance }
    }

    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Local shape of a representation.
    ///
    /// Every usable item contributes its rings; the result is `None` when the
    /// representation is not fully classified or no item is usable.
    pub fn extract(&self, representation: &ShapeRepresentation) -> Option<Shape> {
        let Some((identifier, _)) = representation.kinds() else {
            tracing::debug!(
                representation = representation.entity_id,
                "Skipping unclassified representation"
            );
            return None;
        };
        let entity = self.graph.entity(representation.entity_id)?;

        let mut shape = Shape::new();
        for item in self.graph.resolve_list(entity, "Items") {
            let Some(kind) = item_kind(representation, item) else {
                continue;
            };
            match self.extract_item(identifier, kind, item) {
                Some(part) => shape = shape.union(part),
                None => tracing::debug!(
                    representation = representation.entity_id,
                    item = item.id,
                    kind = ?kind,
                    "Item yielded no usable shape"
                ),
            }
        }

        (!shape.is_empty()).then_some(shape)
    }

    /// Shape of one permitted item under a representation identifier
    pub fn extract_item(
        &self,
        identifier: RepresentationIdentifier,
        kind: ItemKind,
        item: &DecodedEntity,
    ) -> Option<Shape> {
        match identifier {
            RepresentationIdentifier::Box => match kind {
                ItemKind::BoundingBox => self.extract_bounding_box(item),
                _ => None,
            },
            RepresentationIdentifier::Body => self.extract_solid(kind, item, 0),
            RepresentationIdentifier::Axis | RepresentationIdentifier::FootPrint => {
                self.extract_curve(item).map(Shape::from_ring)
            }
            other => {
                tracing::info!(
                    item = item.id,
                    identifier = ?other,
                    "Representation identifier not supported"
                );
                None
            }
        }
    }

    /// Body items, dispatched by concrete kind
    pub(crate) fn extract_solid(&self, kind: ItemKind, item: &DecodedEntity, depth: usize) -> Option<Shape> {
        match kind {
            ItemKind::FacetedBrep | ItemKind::FacetedBrepWithVoids => self.extract_brep(item),
            ItemKind::BooleanResult | ItemKind::BooleanClippingResult => {
                self.extract_boolean(item, depth)
            }
            ItemKind::ExtrudedAreaSolid => self.extract_extrusion(item),
            ItemKind::BoundingBox => self.extract_bounding_box(item),
            ItemKind::AdvancedBrep
            | ItemKind::RevolvedAreaSolid
            | ItemKind::SweptDiskSolid
            | ItemKind::TriangulatedFaceSet
            | ItemKind::PolygonalFaceSet
            | ItemKind::MappedItem
            | ItemKind::ShellBasedSurfaceModel
            | ItemKind::FaceBasedSurfaceModel => {
                tracing::info!(item = item.id, kind = ?kind, "Unsupported solid kind");
                None
            }
            ItemKind::Polyline
            | ItemKind::CompositeCurve
            | ItemKind::TrimmedCurve
            | ItemKind::IndexedPolyCurve
            | ItemKind::Circle => None,
        }
    }

    /// IfcBoundingBox as a closed rectangle at the corner's height
    pub(crate) fn extract_bounding_box(&self, item: &DecodedEntity) -> Option<Shape> {
        let corner = self.graph.resolve(item, "Corner").and_then(cartesian_point)?;
        let x = item.get_float("XDim")?;
        let y = item.get_float("YDim")?;

        let ring = vec![
            corner,
            corner + Vector3::new(x, 0.0, 0.0),
            corner + Vector3::new(x, y, 0.0),
            corner + Vector3::new(0.0, y, 0.0),
            corner,
        ];
        Some(Shape::from_ring(ring))
    }
}
