// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extruded-area solids
//!
//! Only the swept profile is kept: the footprint of the solid in its own
//! Position frame. Depth and extrusion direction do not contribute points.

use ifc_indoor_core::DecodedEntity;
use nalgebra::Point3;

use super::GeometryExtractor;
use crate::helpers::item_position;
use crate::shape::{close_ring, Ring, Shape};

impl GeometryExtractor<'_> {
    pub(crate) fn extract_extrusion(&self, solid: &DecodedEntity) -> Option<Shape> {
        let profile = self.graph.resolve(solid, "SweptArea")?;
        let shape = self.extract_profile(profile)?;

        match self.graph.resolve(solid, "Position") {
            Some(position) => {
                let (rotation, translation) = item_position(self.graph, position)?;
                Some(shape.transformed(&rotation, &translation))
            }
            None => Some(shape),
        }
    }

    fn extract_profile(&self, profile: &DecodedEntity) -> Option<Shape> {
        match profile.type_name.as_str() {
            "IFCRECTANGLEPROFILEDEF" => self.rectangle_profile(profile).map(Shape::from_ring),
            "IFCARBITRARYCLOSEDPROFILEDEF" => {
                let outer = self.graph.resolve(profile, "OuterCurve")?;
                self.extract_curve(outer).map(Shape::from_ring)
            }
            "IFCARBITRARYPROFILEDEFWITHVOIDS" => {
                let outer = self.graph.resolve(profile, "OuterCurve")?;
                let mut shape = Shape::from_ring(self.extract_curve(outer)?);
                for inner in self.graph.resolve_list(profile, "InnerCurves") {
                    shape.push_ring(self.extract_curve(inner)?);
                }
                Some(shape)
            }
            other => {
                tracing::info!(profile = profile.id, profile_type = %other, "Unsupported profile");
                None
            }
        }
    }

    /// Closed 5-point rectangle centered on the profile origin
    fn rectangle_profile(&self, profile: &DecodedEntity) -> Option<Ring> {
        let half_x = profile.get_float("XDim")? / 2.0;
        let half_y = profile.get_float("YDim")? / 2.0;

        let mut ring: Ring = vec![
            Point3::new(-half_x, -half_y, 0.0),
            Point3::new(half_x, -half_y, 0.0),
            Point3::new(half_x, half_y, 0.0),
            Point3::new(-half_x, half_y, 0.0),
        ];
        close_ring(&mut ring);

        if let Some(position) = self.graph.resolve(profile, "Position") {
            let (rotation, translation) = item_position(self.graph, position)?;
            for point in ring.iter_mut() {
                *point = Point3::from(rotation * point.coords + translation);
            }
        }
        Some(ring)
    }
}
