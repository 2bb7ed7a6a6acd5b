// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Representation identifier
//!
//! Classifies an IfcShapeRepresentation by its RepresentationIdentifier and
//! RepresentationType labels, and checks each item against the item types
//! the representation type permits. Anything outside these closed sets is
//! the graceful-degradation boundary: it reads as "no usable shape".

use ifc_indoor_core::{DecodedEntity, EntityGraph};
use smallvec::SmallVec;

/// RepresentationIdentifier labels (case-sensitive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepresentationIdentifier {
    Body,
    Box,
    Axis,
    FootPrint,
    Profile,
    Surface,
    Annotation,
    Clearance,
    CoG,
    Lighting,
    Reference,
}

impl RepresentationIdentifier {
    pub fn from_label(label: &str) -> Option<Self> {
        use RepresentationIdentifier::*;
        Some(match label {
            "Body" => Body,
            "Box" => Box,
            "Axis" => Axis,
            "FootPrint" => FootPrint,
            "Profile" => Profile,
            "Surface" => Surface,
            "Annotation" => Annotation,
            "Clearance" => Clearance,
            "CoG" => CoG,
            "Lighting" => Lighting,
            "Reference" => Reference,
            _ => return None,
        })
    }
}

/// RepresentationType labels (case-sensitive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepresentationType {
    SweptSolid,
    AdvancedSweptSolid,
    BoundingBox,
    Brep,
    AdvancedBrep,
    Csg,
    Clipping,
    Curve,
    Curve2D,
    Curve3D,
    GeometricSet,
    GeometricCurveSet,
    SurfaceModel,
    Tessellation,
    MappedRepresentation,
    SectionedSpine,
    Point,
    PointCloud,
    Annotation2D,
}

impl RepresentationType {
    pub fn from_label(label: &str) -> Option<Self> {
        use RepresentationType::*;
        Some(match label {
            "SweptSolid" => SweptSolid,
            "AdvancedSweptSolid" => AdvancedSweptSolid,
            "BoundingBox" => BoundingBox,
            "Brep" => Brep,
            "AdvancedBrep" => AdvancedBrep,
            "CSG" => Csg,
            "Clipping" => Clipping,
            "Curve" => Curve,
            "Curve2D" => Curve2D,
            "Curve3D" => Curve3D,
            "GeometricSet" => GeometricSet,
            "GeometricCurveSet" => GeometricCurveSet,
            "SurfaceModel" => SurfaceModel,
            "Tessellation" => Tessellation,
            "MappedRepresentation" => MappedRepresentation,
            "SectionedSpine" => SectionedSpine,
            "Point" => Point,
            "PointCloud" => PointCloud,
            "Annotation2D" => Annotation2D,
            _ => return None,
        })
    }

    /// Item types this representation type may contain
    pub fn permitted_items(self) -> SmallVec<[ItemKind; 8]> {
        use ItemKind::*;
        let items: &[ItemKind] = match self {
            RepresentationType::SweptSolid => &[ExtrudedAreaSolid, RevolvedAreaSolid],
            RepresentationType::AdvancedSweptSolid => &[SweptDiskSolid],
            RepresentationType::BoundingBox => &[BoundingBox],
            RepresentationType::Brep => &[FacetedBrep, FacetedBrepWithVoids],
            RepresentationType::AdvancedBrep => &[AdvancedBrep],
            RepresentationType::Csg => &[BooleanResult, BooleanClippingResult],
            RepresentationType::Clipping => &[BooleanClippingResult],
            RepresentationType::Curve
            | RepresentationType::Curve2D
            | RepresentationType::Curve3D
            | RepresentationType::GeometricCurveSet
            | RepresentationType::GeometricSet => {
                &[Polyline, CompositeCurve, TrimmedCurve, IndexedPolyCurve, Circle]
            }
            RepresentationType::SurfaceModel => &[ShellBasedSurfaceModel, FaceBasedSurfaceModel],
            RepresentationType::Tessellation => &[TriangulatedFaceSet, PolygonalFaceSet],
            RepresentationType::MappedRepresentation => &[MappedItem],
            RepresentationType::SectionedSpine
            | RepresentationType::Point
            | RepresentationType::PointCloud
            | RepresentationType::Annotation2D => &[],
        };
        SmallVec::from_slice(items)
    }
}

/// Concrete representation item types the extractor knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    ExtrudedAreaSolid,
    RevolvedAreaSolid,
    SweptDiskSolid,
    BoundingBox,
    FacetedBrep,
    FacetedBrepWithVoids,
    AdvancedBrep,
    BooleanResult,
    BooleanClippingResult,
    Polyline,
    CompositeCurve,
    TrimmedCurve,
    IndexedPolyCurve,
    Circle,
    ShellBasedSurfaceModel,
    FaceBasedSurfaceModel,
    TriangulatedFaceSet,
    PolygonalFaceSet,
    MappedItem,
}

impl ItemKind {
    /// Map an upper-case STEP type name
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        use ItemKind::*;
        Some(match type_name {
            "IFCEXTRUDEDAREASOLID" => ExtrudedAreaSolid,
            "IFCREVOLVEDAREASOLID" => RevolvedAreaSolid,
            "IFCSWEPTDISKSOLID" => SweptDiskSolid,
            "IFCBOUNDINGBOX" => BoundingBox,
            "IFCFACETEDBREP" => FacetedBrep,
            "IFCFACETEDBREPWITHVOIDS" => FacetedBrepWithVoids,
            "IFCADVANCEDBREP" | "IFCADVANCEDBREPWITHVOIDS" => AdvancedBrep,
            "IFCBOOLEANRESULT" => BooleanResult,
            "IFCBOOLEANCLIPPINGRESULT" => BooleanClippingResult,
            "IFCPOLYLINE" => Polyline,
            "IFCCOMPOSITECURVE" => CompositeCurve,
            "IFCTRIMMEDCURVE" => TrimmedCurve,
            "IFCINDEXEDPOLYCURVE" => IndexedPolyCurve,
            "IFCCIRCLE" => Circle,
            "IFCSHELLBASEDSURFACEMODEL" => ShellBasedSurfaceModel,
            "IFCFACEBASEDSURFACEMODEL" => FaceBasedSurfaceModel,
            "IFCTRIANGULATEDFACESET" => TriangulatedFaceSet,
            "IFCPOLYGONALFACESET" => PolygonalFaceSet,
            "IFCMAPPEDITEM" => MappedItem,
            _ => return None,
        })
    }
}

/// A classified IfcShapeRepresentation.
///
/// Either label may be unset when it did not match; check
/// [`ShapeRepresentation::kinds`] before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRepresentation {
    pub identifier: Option<RepresentationIdentifier>,
    pub rep_type: Option<RepresentationType>,
    /// Id of the IfcShapeRepresentation entity
    pub entity_id: u32,
    /// Id of the product owning the representation
    pub root_id: u32,
}

impl ShapeRepresentation {
    /// Both labels, if the representation is fully classified
    pub fn kinds(&self) -> Option<(RepresentationIdentifier, RepresentationType)> {
        Some((self.identifier?, self.rep_type?))
    }

    pub fn is_classified(&self) -> bool {
        self.kinds().is_some()
    }
}

/// Remove quoting and enum delimiters around a label
fn strip_delimiters(label: &str) -> &str {
    label.trim_matches(|c: char| c == '\'' || c == '"' || c == '.' || c.is_whitespace())
}

/// Classify a representation entity owned by `root_id`
pub fn classify(entity: &DecodedEntity, root_id: u32) -> ShapeRepresentation {
    let label = |name: &str| entity.get_string(name).map(strip_delimiters);

    ShapeRepresentation {
        identifier: label("RepresentationIdentifier").and_then(RepresentationIdentifier::from_label),
        rep_type: label("RepresentationType").and_then(RepresentationType::from_label),
        entity_id: entity.id,
        root_id,
    }
}

/// Classified representations of a product, in file order.
///
/// Follows Representation → IfcProductDefinitionShape → Representations.
pub fn representations_of(graph: &dyn EntityGraph, product: &DecodedEntity) -> Vec<ShapeRepresentation> {
    let definition = match graph.resolve(product, "Representation") {
        Some(definition) => definition,
        None => return Vec::new(),
    };
    graph
        .resolve_list(definition, "Representations")
        .into_iter()
        .filter(|rep| rep.is("IFCSHAPEREPRESENTATION"))
        .map(|rep| classify(rep, product.id))
        .collect()
}

/// Concrete item type, if the representation type permits it.
///
/// Unsupported combinations are logged and answer `None`.
pub fn item_kind(representation: &ShapeRepresentation, item: &DecodedEntity) -> Option<ItemKind> {
    let rep_type = representation.rep_type?;
    let kind = ItemKind::from_type_name(&item.type_name);

    match kind {
        Some(kind) if rep_type.permitted_items().contains(&kind) => Some(kind),
        _ => {
            tracing::info!(
                representation = representation.entity_id,
                item = item.id,
                item_type = %item.type_name,
                rep_type = ?rep_type,
                "Item type not permitted for representation type"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_indoor_core::AttributeValue;

    fn representation(identifier: &str, rep_type: &str) -> DecodedEntity {
        DecodedEntity::new(
            10,
            "IFCSHAPEREPRESENTATION",
            vec![
                AttributeValue::EntityRef(1),
                AttributeValue::String(identifier.to_string()),
                AttributeValue::String(rep_type.to_string()),
                AttributeValue::List(vec![AttributeValue::EntityRef(11)]),
            ],
        )
    }

    #[test]
    fn test_classify() {
        let rep = classify(&representation("Body", "SweptSolid"), 99);
        assert_eq!(
            rep.kinds(),
            Some((RepresentationIdentifier::Body, RepresentationType::SweptSolid))
        );
        assert_eq!(rep.root_id, 99);

        let rep = classify(&representation("'Box'", "CSG"), 99);
        assert_eq!(
            rep.kinds(),
            Some((RepresentationIdentifier::Box, RepresentationType::Csg))
        );
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        let rep = classify(&representation("body", "SweptSolid"), 1);
        assert!(rep.identifier.is_none());
        assert_eq!(rep.rep_type, Some(RepresentationType::SweptSolid));
        assert!(!rep.is_classified());
    }

    #[test]
    fn test_item_kind_permission() {
        let rep = classify(&representation("Body", "SweptSolid"), 1);
        let extrusion = DecodedEntity::new(11, "IFCEXTRUDEDAREASOLID", vec![]);
        let brep = DecodedEntity::new(12, "IFCFACETEDBREP", vec![]);
        assert_eq!(item_kind(&rep, &extrusion), Some(ItemKind::ExtrudedAreaSolid));
        assert_eq!(item_kind(&rep, &brep), None);

        let unknown = DecodedEntity::new(13, "IFCSECTIONEDSOLID", vec![]);
        let rep = classify(&representation("Body", "Brep"), 1);
        assert_eq!(item_kind(&rep, &unknown), None);
    }
}
