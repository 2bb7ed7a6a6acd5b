// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Schema dialect detection and attribute-name tables
//!
//! STEP records are positional. The pipeline reads attributes by their
//! EXPRESS names, so every entity type it touches is listed here with its
//! full attribute order. Positions for this subset are identical in IFC2X3
//! and IFC4.

use std::fmt;

use crate::error::{Error, Result};

/// Supported IFC schema dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchemaDialect {
    Ifc2x3,
    Ifc4,
}

impl SchemaDialect {
    /// Map a FILE_SCHEMA identifier onto a supported dialect
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let upper = identifier.trim().to_ascii_uppercase();
        match upper.as_str() {
            "IFC2X3" => Some(SchemaDialect::Ifc2x3),
            "IFC4" | "IFC4ADD1" | "IFC4ADD2" | "IFC4ADD2_TC1" => Some(SchemaDialect::Ifc4),
            _ => None,
        }
    }

    /// Read the dialect marker from the raw file header.
    ///
    /// Looks for `FILE_SCHEMA(('IFC2X3'))` before the DATA section. A missing
    /// or unknown marker is a hard rejection.
    pub fn detect(content: &str) -> Result<Self> {
        let header_end = content.find("DATA;").unwrap_or(content.len());
        let header = &content[..header_end];

        let start = header.find("FILE_SCHEMA").ok_or(Error::MissingSchema)?;
        let rest = &header[start..];
        let open = rest.find('\'').ok_or(Error::MissingSchema)?;
        let rest = &rest[open + 1..];
        let close = rest.find('\'').ok_or(Error::MissingSchema)?;
        let identifier = &rest[..close];

        Self::from_identifier(identifier)
            .ok_or_else(|| Error::UnsupportedSchema(identifier.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            SchemaDialect::Ifc2x3 => "IFC2X3",
            SchemaDialect::Ifc4 => "IFC4",
        }
    }
}

impl fmt::Display for SchemaDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const ELEMENT: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "ObjectType",
    "ObjectPlacement",
    "Representation",
    "Tag",
];

const SPATIAL: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "ObjectType",
    "ObjectPlacement",
    "Representation",
    "LongName",
    "CompositionType",
];

const SITE: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "ObjectType",
    "ObjectPlacement",
    "Representation",
    "LongName",
    "CompositionType",
    "RefLatitude",
    "RefLongitude",
    "RefElevation",
    "LandTitleNumber",
    "SiteAddress",
];

const BUILDING: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "ObjectType",
    "ObjectPlacement",
    "Representation",
    "LongName",
    "CompositionType",
    "ElevationOfRefHeight",
    "ElevationOfTerrain",
    "BuildingAddress",
];

const STOREY: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "ObjectType",
    "ObjectPlacement",
    "Representation",
    "LongName",
    "CompositionType",
    "Elevation",
];

const PROJECT: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "ObjectType",
    "LongName",
    "Phase",
    "RepresentationContexts",
    "UnitsInContext",
];

const CONTEXT: &[&str] = &[
    "ContextIdentifier",
    "ContextType",
    "CoordinateSpaceDimension",
    "Precision",
    "WorldCoordinateSystem",
    "TrueNorth",
    "ParentContext",
    "TargetScale",
    "TargetView",
    "UserDefinedTargetView",
];

const REL_CONTAINED: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "RelatedElements",
    "RelatingStructure",
];

const REL_VOIDS: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "RelatingBuildingElement",
    "RelatedOpeningElement",
];

const REL_FILLS: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "RelatingOpeningElement",
    "RelatedBuildingElement",
];

const REL_AGGREGATES: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "RelatingObject",
    "RelatedObjects",
];

/// Full attribute order for an upper-case type name
pub fn attribute_names(type_name: &str) -> Option<&'static [&'static str]> {
    let names: &'static [&'static str] = match type_name {
        "IFCWALL" | "IFCWALLSTANDARDCASE" | "IFCWALLELEMENTEDCASE" | "IFCCURTAINWALL"
        | "IFCSLAB" | "IFCSLABSTANDARDCASE" | "IFCSLABELEMENTEDCASE" | "IFCCOLUMN"
        | "IFCCOLUMNSTANDARDCASE" | "IFCDOOR" | "IFCDOORSTANDARDCASE" | "IFCWINDOW"
        | "IFCWINDOWSTANDARDCASE" | "IFCSTAIR" | "IFCSTAIRFLIGHT" | "IFCOPENINGELEMENT"
        | "IFCOPENINGSTANDARDCASE" | "IFCBEAM" | "IFCMEMBER" | "IFCPLATE" | "IFCRAILING"
        | "IFCRAMP" | "IFCROOF" | "IFCCOVERING" | "IFCBUILDINGELEMENTPROXY" => ELEMENT,
        "IFCSITE" => SITE,
        "IFCBUILDING" => BUILDING,
        "IFCBUILDINGSTOREY" => STOREY,
        "IFCSPACE" => SPATIAL,
        "IFCPROJECT" => PROJECT,
        "IFCGEOMETRICREPRESENTATIONCONTEXT" | "IFCGEOMETRICREPRESENTATIONSUBCONTEXT" => CONTEXT,
        "IFCPRODUCTDEFINITIONSHAPE" => &["Name", "Description", "Representations"],
        "IFCSHAPEREPRESENTATION" => &[
            "ContextOfItems",
            "RepresentationIdentifier",
            "RepresentationType",
            "Items",
        ],
        "IFCLOCALPLACEMENT" => &["PlacementRelTo", "RelativePlacement"],
        "IFCAXIS2PLACEMENT3D" => &["Location", "Axis", "RefDirection"],
        "IFCAXIS2PLACEMENT2D" => &["Location", "RefDirection"],
        "IFCCARTESIANPOINT" => &["Coordinates"],
        "IFCDIRECTION" => &["DirectionRatios"],
        "IFCBOUNDINGBOX" => &["Corner", "XDim", "YDim", "ZDim"],
        "IFCFACETEDBREP" => &["Outer"],
        "IFCFACETEDBREPWITHVOIDS" => &["Outer", "Voids"],
        "IFCCLOSEDSHELL" | "IFCOPENSHELL" => &["CfsFaces"],
        "IFCFACE" => &["Bounds"],
        "IFCFACEBOUND" | "IFCFACEOUTERBOUND" => &["Bound", "Orientation"],
        "IFCPOLYLOOP" => &["Polygon"],
        "IFCBOOLEANRESULT" | "IFCBOOLEANCLIPPINGRESULT" => {
            &["Operator", "FirstOperand", "SecondOperand"]
        }
        "IFCEXTRUDEDAREASOLID" => &["SweptArea", "Position", "ExtrudedDirection", "Depth"],
        "IFCREVOLVEDAREASOLID" => &["SweptArea", "Position", "Axis", "Angle"],
        "IFCRECTANGLEPROFILEDEF" => &["ProfileType", "ProfileName", "Position", "XDim", "YDim"],
        "IFCCIRCLEPROFILEDEF" => &["ProfileType", "ProfileName", "Position", "Radius"],
        "IFCARBITRARYCLOSEDPROFILEDEF" => &["ProfileType", "ProfileName", "OuterCurve"],
        "IFCARBITRARYPROFILEDEFWITHVOIDS" => {
            &["ProfileType", "ProfileName", "OuterCurve", "InnerCurves"]
        }
        "IFCPOLYLINE" => &["Points"],
        "IFCCOMPOSITECURVE" => &["Segments", "SelfIntersect"],
        "IFCCOMPOSITECURVESEGMENT" => &["Transition", "SameSense", "ParentCurve"],
        "IFCTRIMMEDCURVE" => &[
            "BasisCurve",
            "Trim1",
            "Trim2",
            "SenseAgreement",
            "MasterRepresentation",
        ],
        "IFCCIRCLE" => &["Position", "Radius"],
        "IFCINDEXEDPOLYCURVE" => &["Points", "Segments", "SelfIntersect"],
        "IFCHALFSPACESOLID" => &["BaseSurface", "AgreementFlag"],
        "IFCPOLYGONALBOUNDEDHALFSPACE" => {
            &["BaseSurface", "AgreementFlag", "Position", "PolygonalBoundary"]
        }
        "IFCPLANE" => &["Position"],
        "IFCMAPPEDITEM" => &["MappingSource", "MappingTarget"],
        "IFCRELCONTAINEDINSPATIALSTRUCTURE" => REL_CONTAINED,
        "IFCRELVOIDSELEMENT" => REL_VOIDS,
        "IFCRELFILLSELEMENT" => REL_FILLS,
        "IFCRELAGGREGATES" => REL_AGGREGATES,
        "IFCUNITASSIGNMENT" => &["Units"],
        "IFCSIUNIT" => &["Dimensions", "UnitType", "Prefix", "Name"],
        _ => return None,
    };
    Some(names)
}

/// Position of a named attribute for an upper-case type name
#[inline]
pub fn attribute_index(type_name: &str, name: &str) -> Option<usize> {
    attribute_names(type_name)?.iter().position(|n| *n == name)
}
