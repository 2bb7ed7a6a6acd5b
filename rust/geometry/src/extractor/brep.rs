// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Faceted boundary representations: shell → face → bound → poly loop.

use ifc_indoor_core::DecodedEntity;

use super::GeometryExtractor;
use crate::helpers::point_list;
use crate::shape::{close_ring, Shape};

impl GeometryExtractor<'_> {
    /// Every poly loop of the outer shell (and void shells) as a closed ring
    pub(crate) fn extract_brep(&self, brep: &DecodedEntity) -> Option<Shape> {
        let mut shells = vec![self.graph.resolve(brep, "Outer")?];
        if brep.is("IFCFACETEDBREPWITHVOIDS") {
            shells.extend(self.graph.resolve_list(brep, "Voids"));
        }

        let mut shape = Shape::new();
        for shell in shells {
            for face in self.graph.resolve_list(shell, "CfsFaces") {
                for bound in self.graph.resolve_list(face, "Bounds") {
                    let Some(poly_loop) = self.graph.resolve(bound, "Bound") else {
                        continue;
                    };
                    if !poly_loop.is("IFCPOLYLOOP") {
                        tracing::info!(
                            brep = brep.id,
                            bound = poly_loop.id,
                            loop_type = %poly_loop.type_name,
                            "Unsupported face bound loop"
                        );
                        continue;
                    }
                    // A loop with an unreadable vertex spoils the brep
                    let mut ring = point_list(self.graph, poly_loop, "Polygon")?;
                    close_ring(&mut ring);
                    shape.push_ring(ring);
                }
            }
        }

        (!shape.is_empty()).then_some(shape)
    }
}
