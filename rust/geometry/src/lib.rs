// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Indoor Geometry
//!
//! Local geometry for indoor import: placement chains folded into rigid
//! transforms, shape representations reduced to rings of points, and the
//! spherical geodesy used to put those points on the map. nalgebra carries
//! all vector and matrix math.

pub mod error;
pub mod extractor;
pub mod geodesy;
mod helpers;
pub mod math;
pub mod placement;
pub mod representation;
pub mod shape;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix3, Point3, Vector2, Vector3};

pub use error::{Error, Result};
pub use extractor::{BooleanOperator, GeometryExtractor};
pub use geodesy::{destination, distance, dms_to_decimal, inverse, LatLon, EARTH_RADIUS_M};
pub use math::{basis_from_axes, rotation_x, rotation_y, rotation_z, signed_angle};
pub use placement::{Placement, PlacementResolver, MAX_PLACEMENT_DEPTH};
pub use representation::{
    classify, item_kind, representations_of, ItemKind, RepresentationIdentifier,
    RepresentationType, ShapeRepresentation,
};
pub use shape::{close_ring, Ring, Shape, DEFAULT_POINT_TOLERANCE, SENTINEL};
