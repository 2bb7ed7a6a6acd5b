// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared readers for points, directions and item-level placements.

use ifc_indoor_core::{DecodedEntity, EntityGraph};
use nalgebra::{Matrix3, Point3, Vector3};

use crate::math::basis_from_axes;

/// Coordinates of an IfcCartesianPoint (2D points get z = 0)
#[inline]
pub(crate) fn cartesian_point(entity: &DecodedEntity) -> Option<Point3<f64>> {
    if !entity.is("IFCCARTESIANPOINT") {
        return None;
    }
    let [x, y, z] = entity.attr("Coordinates")?.as_triple()?;
    Some(Point3::new(x, y, z))
}

/// Direction ratios of an IfcDirection
#[inline]
pub(crate) fn direction(entity: &DecodedEntity) -> Option<Vector3<f64>> {
    if !entity.is("IFCDIRECTION") {
        return None;
    }
    let [x, y, z] = entity.attr("DirectionRatios")?.as_triple()?;
    Some(Vector3::new(x, y, z))
}

/// Points of a list-of-IfcCartesianPoint attribute. Any unreadable point
/// fails the whole list.
pub(crate) fn point_list(
    graph: &dyn EntityGraph,
    entity: &DecodedEntity,
    attribute: &str,
) -> Option<Vec<Point3<f64>>> {
    entity
        .get_ref_list(attribute)
        .into_iter()
        .map(|id| graph.entity(id).and_then(cartesian_point))
        .collect()
}

/// Rotation and translation of an item-level IfcAxis2Placement3D or
/// IfcAxis2Placement2D.
///
/// Unlike the object placement chain, item positions follow the schema
/// defaults: a missing Axis is +Z and a missing RefDirection is +X.
pub(crate) fn item_position(
    graph: &dyn EntityGraph,
    placement: &DecodedEntity,
) -> Option<(Matrix3<f64>, Vector3<f64>)> {
    let location = graph
        .resolve(placement, "Location")
        .and_then(cartesian_point)?
        .coords;

    let axis = if placement.is("IFCAXIS2PLACEMENT3D") {
        match graph.resolve(placement, "Axis") {
            Some(axis) => direction(axis)?,
            None => Vector3::z(),
        }
    } else if placement.is("IFCAXIS2PLACEMENT2D") {
        Vector3::z()
    } else {
        return None;
    };

    let ref_direction = match graph.resolve(placement, "RefDirection") {
        Some(reference) => direction(reference)?,
        None => Vector3::x(),
    };

    let rotation = basis_from_axes(&axis, &ref_direction)?;
    Some((rotation, location))
}
