// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boolean results
//!
//! Operands are reduced to point sets and combined by vertex coincidence
//! (see [`Shape::difference`]). A second operand that yields nothing leaves
//! the first operand as it is.

use ifc_indoor_core::DecodedEntity;

use super::{GeometryExtractor, MAX_NESTING_DEPTH};
use crate::helpers::item_position;
use crate::representation::ItemKind;
use crate::shape::Shape;

/// IfcBooleanOperator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperator {
    Difference,
    Union,
    Intersection,
}

impl BooleanOperator {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "DIFFERENCE" => Some(BooleanOperator::Difference),
            "UNION" => Some(BooleanOperator::Union),
            "INTERSECTION" => Some(BooleanOperator::Intersection),
            _ => None,
        }
    }
}

/// Closed set of boolean operand kinds
enum Operand<'a> {
    Solid(ItemKind, &'a DecodedEntity),
    PolygonalBoundedHalfSpace(&'a DecodedEntity),
    HalfSpace(&'a DecodedEntity),
    Unsupported(&'a DecodedEntity),
}

impl<'a> Operand<'a> {
    fn classify(entity: &'a DecodedEntity) -> Self {
        match entity.type_name.as_str() {
            "IFCPOLYGONALBOUNDEDHALFSPACE" => Operand::PolygonalBoundedHalfSpace(entity),
            "IFCHALFSPACESOLID" | "IFCBOXEDHALFSPACE" => Operand::HalfSpace(entity),
            name => match ItemKind::from_type_name(name) {
                Some(
                    kind @ (ItemKind::ExtrudedAreaSolid
                    | ItemKind::RevolvedAreaSolid
                    | ItemKind::SweptDiskSolid
                    | ItemKind::FacetedBrep
                    | ItemKind::FacetedBrepWithVoids
                    | ItemKind::AdvancedBrep
                    | ItemKind::BooleanResult
                    | ItemKind::BooleanClippingResult
                    | ItemKind::TriangulatedFaceSet
                    | ItemKind::PolygonalFaceSet),
                ) => Operand::Solid(kind, entity),
                _ => Operand::Unsupported(entity),
            },
        }
    }
}

impl GeometryExtractor<'_> {
    pub(crate) fn extract_boolean(&self, result: &DecodedEntity, depth: usize) -> Option<Shape> {
        if depth > MAX_NESTING_DEPTH {
            tracing::warn!(entity = result.id, "Boolean nesting too deep");
            return None;
        }

        let operator = result
            .attr("Operator")
            .and_then(|v| v.as_enum())
            .and_then(BooleanOperator::from_label)?;

        let first = self.graph.resolve(result, "FirstOperand")?;
        let first = self.extract_operand(first, depth + 1)?;

        let second = self
            .graph
            .resolve(result, "SecondOperand")
            .and_then(|operand| self.extract_operand(operand, depth + 1));
        let Some(second) = second else {
            tracing::debug!(entity = result.id, "Second operand unusable, keeping first");
            return Some(first);
        };

        let combined = match operator {
            BooleanOperator::Difference => first.difference(&second, self.tolerance),
            BooleanOperator::Intersection => first.intersection(&second, self.tolerance),
            BooleanOperator::Union => first.union(second),
        };
        (!combined.is_empty()).then_some(combined)
    }

    fn extract_operand(&self, operand: &DecodedEntity, depth: usize) -> Option<Shape> {
        match Operand::classify(operand) {
            Operand::Solid(kind, entity) => self.extract_solid(kind, entity, depth),
            Operand::PolygonalBoundedHalfSpace(entity) => self.extract_bounded_half_space(entity),
            Operand::HalfSpace(entity) => {
                tracing::info!(entity = entity.id, "Unbounded half-space has no boundary points");
                None
            }
            Operand::Unsupported(entity) => {
                tracing::info!(
                    entity = entity.id,
                    operand_type = %entity.type_name,
                    "Unsupported boolean operand"
                );
                None
            }
        }
    }

    /// Boundary polygon placed by the half-space's Position
    fn extract_bounded_half_space(&self, half_space: &DecodedEntity) -> Option<Shape> {
        let boundary = self.graph.resolve(half_space, "PolygonalBoundary")?;
        let shape = Shape::from_ring(self.extract_curve(boundary)?);

        match self.graph.resolve(half_space, "Position") {
            Some(position) => {
                let (rotation, translation) = item_position(self.graph, position)?;
                Some(shape.transformed(&rotation, &translation))
            }
            None => Some(shape),
        }
    }
}
