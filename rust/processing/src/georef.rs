// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Georeferencing: building origin, north offset and the projection of
//! root-frame points to latitude/longitude.

use ifc_indoor_core::{DecodedEntity, EntityGraph, LengthUnit};
use ifc_indoor_geometry::geodesy::{planar_bearing, planar_distance};
use ifc_indoor_geometry::{
    destination, dms_to_decimal, representations_of, rotation_z, signed_angle, GeometryExtractor,
    LatLon, Matrix3, Point3, RepresentationIdentifier, Shape, Vector2,
};

use crate::error::{ImportError, Result};

/// Rotates root-frame points onto true north and projects them around the
/// building origin
#[derive(Debug, Clone, Copy)]
pub struct GeodeticTransformer {
    origin: LatLon,
    rotation: Matrix3<f64>,
    scale: f64,
}

impl GeodeticTransformer {
    /// `true_north` and `project_north` are plan directions in the root
    /// frame; the model turns by the signed angle between them.
    pub fn new(origin: LatLon, true_north: Vector2<f64>, project_north: Vector2<f64>, unit: LengthUnit) -> Self {
        let angle = signed_angle(&true_north, &project_north);
        Self {
            origin,
            rotation: rotation_z(angle),
            scale: unit.to_metres(),
        }
    }

    pub fn origin(&self) -> LatLon {
        self.origin
    }

    pub fn project_point(&self, point: &Point3<f64>) -> LatLon {
        let rotated = self.rotation * point.coords;
        let distance = planar_distance(rotated.x, rotated.y) * self.scale;
        if distance == 0.0 {
            return self.origin;
        }
        destination(self.origin, planar_bearing(rotated.x, rotated.y), distance)
    }

    /// One list of positions per ring
    pub fn project_shape(&self, shape: &Shape) -> Vec<Vec<LatLon>> {
        shape
            .rings
            .iter()
            .map(|ring| ring.iter().map(|p| self.project_point(p)).collect())
            .collect()
    }
}

/// Decimal latitude/longitude of the site's reference point
fn site_reference(site: &DecodedEntity) -> Option<LatLon> {
    let component = |name: &str| -> Option<f64> {
        let parts: Vec<f64> = site
            .get_list(name)?
            .iter()
            .map(|v| v.as_float().unwrap_or(f64::NAN))
            .collect();
        dms_to_decimal(&parts)
    };
    Some(LatLon::new(component("RefLatitude")?, component("RefLongitude")?))
}

impl GeodeticTransformer {
    /// Transformer around the building origin of `site`.
    ///
    /// The origin is the site's reference point, moved back from the site's
    /// bounding-box corner to the local origin when the site has a Box
    /// representation. The corner goes through the same north rotation as
    /// every other point, so it projects onto the reference point.
    pub fn for_site(
        graph: &dyn EntityGraph,
        site: &DecodedEntity,
        true_north: Vector2<f64>,
        project_north: Vector2<f64>,
        unit: LengthUnit,
    ) -> Result<Self> {
        let reference = site_reference(site).ok_or(ImportError::MissingGeoreference(site.id))?;
        let mut transformer = Self::new(reference, true_north, project_north, unit);
        if let Some(corner) = site_box_corner(graph, site) {
            transformer.origin = transformer.origin_behind(&corner);
        }
        Ok(transformer)
    }

    /// Position such that `corner` projects onto the current origin
    fn origin_behind(&self, corner: &Point3<f64>) -> LatLon {
        let rotated = self.rotation * corner.coords;
        let distance = planar_distance(rotated.x, rotated.y) * self.scale;
        if distance == 0.0 {
            return self.origin;
        }
        destination(self.origin, planar_bearing(-rotated.x, -rotated.y), distance)
    }
}

/// First corner of the site's Box representation
fn site_box_corner(graph: &dyn EntityGraph, site: &DecodedEntity) -> Option<Point3<f64>> {
    let extractor = GeometryExtractor::new(graph);
    let corner = representations_of(graph, site)
        .iter()
        .filter(|rep| rep.identifier == Some(RepresentationIdentifier::Box))
        .find_map(|rep| extractor.extract(rep))
        .and_then(|shape| shape.points().next().copied())?;

    if !(corner.x.is_finite() && corner.y.is_finite()) {
        return None;
    }
    tracing::debug!(site = site.id, x = corner.x, y = corner.y, "Correcting origin by site box corner");
    Some(corner)
}

/// True north in the root frame, from the first geometric representation
/// context that declares one. Defaults to +Y.
pub fn true_north(graph: &dyn EntityGraph) -> Vector2<f64> {
    graph
        .entities_of_type("IFCGEOMETRICREPRESENTATIONCONTEXT")
        .into_iter()
        .filter_map(|context| graph.resolve(context, "TrueNorth"))
        .filter_map(|direction| direction.attr("DirectionRatios")?.as_triple())
        .map(|[x, y, _]| Vector2::new(x, y))
        .find(|v| v.x.is_finite() && v.y.is_finite() && v.norm() > 0.0)
        .unwrap_or_else(|| Vector2::new(0.0, 1.0))
}
