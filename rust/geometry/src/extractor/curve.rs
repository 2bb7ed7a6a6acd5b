// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curve flattening for profiles, half-space boundaries and axis
//! representations.

use ifc_indoor_core::DecodedEntity;

use super::{GeometryExtractor, MAX_NESTING_DEPTH};
use crate::helpers::point_list;
use crate::representation::ItemKind;
use crate::shape::Ring;

impl GeometryExtractor<'_> {
    /// Points of a bounded curve, or `None` for unsupported curve kinds
    pub(crate) fn extract_curve(&self, curve: &DecodedEntity) -> Option<Ring> {
        self.extract_curve_at(curve, 0)
    }

    fn extract_curve_at(&self, curve: &DecodedEntity, depth: usize) -> Option<Ring> {
        if depth > MAX_NESTING_DEPTH {
            tracing::warn!(curve = curve.id, "Curve nesting too deep");
            return None;
        }

        match ItemKind::from_type_name(&curve.type_name) {
            Some(ItemKind::Polyline) => {
                let points = point_list(self.graph, curve, "Points")?;
                (!points.is_empty()).then_some(points)
            }
            Some(ItemKind::CompositeCurve) => self.extract_composite_curve(curve, depth),
            // Trim parameters are ignored: the whole basis curve is used
            Some(ItemKind::TrimmedCurve) => {
                let basis = self.graph.resolve(curve, "BasisCurve")?;
                self.extract_curve_at(basis, depth + 1)
            }
            _ => {
                tracing::info!(
                    curve = curve.id,
                    curve_type = %curve.type_name,
                    "Unsupported curve kind"
                );
                None
            }
        }
    }

    /// Segments joined end to end. Every segment must be usable.
    fn extract_composite_curve(&self, curve: &DecodedEntity, depth: usize) -> Option<Ring> {
        let mut ring = Ring::new();

        for segment in self.graph.resolve_list(curve, "Segments") {
            let parent = self.graph.resolve(segment, "ParentCurve")?;
            let mut points = self.extract_curve_at(parent, depth + 1)?;
            if segment.attr("SameSense").and_then(|v| v.as_bool()) == Some(false) {
                points.reverse();
            }

            // Shared joint points appear once
            let skip = usize::from(ring.last() == points.first());
            ring.extend(points.into_iter().skip(skip));
        }

        (!ring.is_empty()).then_some(ring)
    }
}
