// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;
use crate::representation::classify;
use ifc_indoor_core::{SchemaDialect, StepModel};
use nalgebra::Point3;

const FRAGMENT: &str = r#"
#10=IFCCARTESIANPOINT((0.,0.,0.));
#11=IFCBOUNDINGBOX(#10,4.,3.,2.);
#12=IFCSHAPEREPRESENTATION(#1,'Box','BoundingBox',(#11));

#20=IFCCARTESIANPOINT((0.,0.,0.));
#21=IFCCARTESIANPOINT((1.,0.,0.));
#22=IFCCARTESIANPOINT((1.,1.,0.));
#23=IFCCARTESIANPOINT((0.,0.,1.));
#30=IFCPOLYLOOP((#20,#21,#22));
#31=IFCFACEOUTERBOUND(#30,.T.);
#32=IFCFACE((#31));
#33=IFCPOLYLOOP((#20,#21,#23));
#34=IFCFACEOUTERBOUND(#33,.T.);
#35=IFCFACE((#34));
#40=IFCCLOSEDSHELL((#32,#35));
#41=IFCFACETEDBREP(#40);
#42=IFCSHAPEREPRESENTATION(#1,'Body','Brep',(#41));

#50=IFCCARTESIANPOINT((1.,2.));
#51=IFCAXIS2PLACEMENT2D(#50,$);
#52=IFCRECTANGLEPROFILEDEF(.AREA.,$,#51,4.,2.);
#53=IFCCARTESIANPOINT((0.,0.,3.));
#54=IFCAXIS2PLACEMENT3D(#53,$,$);
#55=IFCDIRECTION((0.,0.,1.));
#56=IFCEXTRUDEDAREASOLID(#52,#54,#55,2.5);
#57=IFCSHAPEREPRESENTATION(#1,'Body','SweptSolid',(#56));

#60=IFCCARTESIANPOINT((0.,0.));
#61=IFCCARTESIANPOINT((2.,0.));
#62=IFCCARTESIANPOINT((2.,2.));
#63=IFCCARTESIANPOINT((0.,2.));
#64=IFCPOLYLINE((#60,#61,#62));
#65=IFCPOLYLINE((#62,#63,#60));
#66=IFCCOMPOSITECURVESEGMENT(.CONTINUOUS.,.T.,#64);
#67=IFCCOMPOSITECURVESEGMENT(.CONTINUOUS.,.T.,#65);
#68=IFCCOMPOSITECURVE((#66,#67),.F.);
#69=IFCARBITRARYCLOSEDPROFILEDEF(.AREA.,$,#68);
#70=IFCEXTRUDEDAREASOLID(#69,$,#55,1.);
#71=IFCSHAPEREPRESENTATION(#1,'Body','SweptSolid',(#70));
#72=IFCSHAPEREPRESENTATION(#1,'Body','SweptSolid',(#56,#70));

#80=IFCCARTESIANPOINT((3.,1.,3.));
#81=IFCCARTESIANPOINT((9.,9.,9.));
#82=IFCCARTESIANPOINT((8.,8.,8.));
#83=IFCPOLYLOOP((#80,#81,#82));
#84=IFCFACEOUTERBOUND(#83,.T.);
#85=IFCFACE((#84));
#86=IFCCLOSEDSHELL((#85));
#87=IFCFACETEDBREP(#86);
#88=IFCBOOLEANRESULT(.DIFFERENCE.,#56,#87);
#89=IFCSHAPEREPRESENTATION(#1,'Body','CSG',(#88));
#90=IFCBOOLEANRESULT(.INTERSECTION.,#56,#87);
#91=IFCSHAPEREPRESENTATION(#1,'Body','CSG',(#90));

#92=IFCPLANE(#54);
#93=IFCHALFSPACESOLID(#92,.F.);
#94=IFCBOOLEANCLIPPINGRESULT(.DIFFERENCE.,#56,#93);
#95=IFCSHAPEREPRESENTATION(#1,'Body','Clipping',(#94));
#96=IFCCARTESIANPOINT((3.,1.));
#97=IFCCARTESIANPOINT((10.,1.));
#98=IFCCARTESIANPOINT((10.,10.));
#99=IFCPOLYLINE((#96,#97,#98,#96));
#100=IFCPOLYGONALBOUNDEDHALFSPACE(#92,.F.,#54,#99);
#101=IFCBOOLEANCLIPPINGRESULT(.DIFFERENCE.,#56,#100);
#102=IFCSHAPEREPRESENTATION(#1,'Body','Clipping',(#101));

#110=IFCDIRECTION((0.,1.,0.));
#111=IFCAXIS1PLACEMENT(#10,#110);
#112=IFCREVOLVEDAREASOLID(#52,#54,#111,1.57);
#113=IFCSHAPEREPRESENTATION(#1,'Body','SweptSolid',(#112));
#114=IFCSHAPEREPRESENTATION(#1,'Body','Brep',(#56));
#115=IFCSHAPEREPRESENTATION(#1,'Body','Mystery',(#56));

#120=IFCPOLYLINE((#60,#61));
#121=IFCSHAPEREPRESENTATION(#1,'Axis','Curve2D',(#120));
#130=IFCCIRCLE(#51,1.);
#131=IFCTRIMMEDCURVE(#130,(IFCPARAMETERVALUE(0.)),(IFCPARAMETERVALUE(1.)),.T.,.PARAMETER.);
#132=IFCSHAPEREPRESENTATION(#1,'Axis','Curve2D',(#131));
#133=IFCTRIMMEDCURVE(#120,(IFCPARAMETERVALUE(0.)),(IFCPARAMETERVALUE(1.)),.T.,.PARAMETER.);
#134=IFCSHAPEREPRESENTATION(#1,'Axis','Curve2D',(#133));

#140=IFCCARTESIANPOINT((1.2.3,0.,0.));
#141=IFCBOUNDINGBOX(#140,4.,3.,2.);
#142=IFCSHAPEREPRESENTATION(#1,'Box','BoundingBox',(#141));

#150=IFCBOOLEANRESULT(.UNION.,#56,#87);
#151=IFCSHAPEREPRESENTATION(#1,'Body','CSG',(#150));

#160=IFCFACETEDBREPWITHVOIDS(#40,(#86));
#161=IFCSHAPEREPRESENTATION(#1,'Body','Brep',(#160));

#170=IFCCARTESIANPOINT((0.5,0.5));
#171=IFCCARTESIANPOINT((1.5,0.5));
#172=IFCCARTESIANPOINT((1.5,1.5));
#173=IFCPOLYLINE((#170,#171,#172,#170));
#174=IFCARBITRARYPROFILEDEFWITHVOIDS(.AREA.,$,#68,(#173));
#175=IFCEXTRUDEDAREASOLID(#174,$,#55,1.);
#176=IFCSHAPEREPRESENTATION(#1,'Body','SweptSolid',(#175));

#180=IFCPOLYLINE((#60,#63,#62));
#181=IFCCOMPOSITECURVESEGMENT(.CONTINUOUS.,.F.,#180);
#182=IFCCOMPOSITECURVE((#66,#181),.F.);
#183=IFCSHAPEREPRESENTATION(#1,'Axis','Curve2D',(#182));
"#;

fn extract(representation: u32) -> Option<Shape> {
    extract_from(FRAGMENT, representation)
}

fn extract_from(content: &str, representation: u32) -> Option<Shape> {
    let model = StepModel::with_dialect(content, SchemaDialect::Ifc4);
    let rep = classify(model.entity(representation).unwrap(), 0);
    GeometryExtractor::new(&model).extract(&rep)
}

/// `levels` UNION results nested through their first operand, innermost on
/// the extruded rectangle; each level adds the brep #87
fn nested_unions(levels: u32) -> String {
    let mut content = FRAGMENT.to_string();
    for level in 0..levels {
        let first = if level + 1 == levels { 56 } else { 1001 + level };
        content.push_str(&format!("#{}=IFCBOOLEANRESULT(.UNION.,#{first},#87);\n", 1000 + level));
    }
    content.push_str("#999=IFCSHAPEREPRESENTATION(#1,'Body','CSG',(#1000));\n");
    content
}

/// `levels` trimmed curves wrapped around the polyline #120
fn nested_trims(levels: u32) -> String {
    let mut content = FRAGMENT.to_string();
    for level in 0..levels {
        let basis = if level + 1 == levels { 120 } else { 2001 + level };
        content.push_str(&format!(
            "#{}=IFCTRIMMEDCURVE(#{basis},(IFCPARAMETERVALUE(0.)),(IFCPARAMETERVALUE(1.)),.T.,.PARAMETER.);\n",
            2000 + level
        ));
    }
    content.push_str("#1999=IFCSHAPEREPRESENTATION(#1,'Axis','Curve2D',(#2000));\n");
    content
}

fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
    Point3::new(x, y, z)
}

/// The extruded rectangle #56: 4 x 2 centered on (1, 2) at height 3
fn placed_rectangle() -> Vec<Point3<f64>> {
    vec![
        p(-1.0, 1.0, 3.0),
        p(3.0, 1.0, 3.0),
        p(3.0, 3.0, 3.0),
        p(-1.0, 3.0, 3.0),
        p(-1.0, 1.0, 3.0),
    ]
}

#[test]
fn test_bounding_box_closes_ring() {
    let shape = extract(12).unwrap();
    assert_eq!(
        shape.rings,
        vec![vec![
            p(0.0, 0.0, 0.0),
            p(4.0, 0.0, 0.0),
            p(4.0, 3.0, 0.0),
            p(0.0, 3.0, 0.0),
            p(0.0, 0.0, 0.0),
        ]]
    );
}

#[test]
fn test_brep_loops_are_separate_rings() {
    let shape = extract(42).unwrap();
    assert_eq!(shape.rings.len(), 2);
    for ring in &shape.rings {
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
    }
    assert_eq!(shape.rings[1][2], p(0.0, 0.0, 1.0));
}

#[test]
fn test_rectangle_profile_with_positions() {
    let shape = extract(57).unwrap();
    assert_eq!(shape.rings, vec![placed_rectangle()]);
}

#[test]
fn test_composite_curve_profile() {
    let shape = extract(71).unwrap();
    assert_eq!(
        shape.rings,
        vec![vec![
            p(0.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(2.0, 2.0, 0.0),
            p(0.0, 2.0, 0.0),
            p(0.0, 0.0, 0.0),
        ]]
    );
}

#[test]
fn test_multiple_items_are_united() {
    let shape = extract(72).unwrap();
    assert_eq!(shape.rings.len(), 2);
    assert_eq!(shape.rings[0], placed_rectangle());
}

#[test]
fn test_boolean_difference_removes_shared_vertices() {
    let shape = extract(89).unwrap();
    let mut expected = placed_rectangle();
    expected.remove(1);
    assert_eq!(shape.rings, vec![expected]);
}

#[test]
fn test_boolean_intersection_keeps_shared_vertices() {
    let shape = extract(91).unwrap();
    assert_eq!(shape.rings, vec![vec![p(3.0, 1.0, 3.0)]]);
}

#[test]
fn test_unbounded_half_space_keeps_first_operand() {
    let shape = extract(95).unwrap();
    assert_eq!(shape.rings, vec![placed_rectangle()]);
}

#[test]
fn test_polygonal_bounded_half_space() {
    // Boundary is lifted to z = 3 by the half-space Position and shares
    // the (3, 1, 3) corner with the rectangle
    let shape = extract(102).unwrap();
    assert_eq!(shape.point_count(), 4);
    assert!(!shape.contains_point(&p(3.0, 1.0, 3.0), DEFAULT_POINT_TOLERANCE));
}

#[test]
fn test_unsupported_kinds_yield_nothing() {
    // Revolved solid is permitted but not extracted
    assert!(extract(113).is_none());
    // Extrusion inside a Brep representation is not permitted
    assert!(extract(114).is_none());
    // Unknown representation type leaves the representation unclassified
    assert!(extract(115).is_none());
}

#[test]
fn test_axis_curves() {
    let shape = extract(121).unwrap();
    assert_eq!(shape.rings, vec![vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0)]]);

    // Trimmed curve falls back to its basis curve
    assert_eq!(extract(134).unwrap().rings, shape.rings);

    // Circles are not flattened
    assert!(extract(132).is_none());
}

#[test]
fn test_malformed_coordinate_propagates_nan() {
    let shape = extract(142).unwrap();
    assert!(!shape.is_finite());
}

#[test]
fn test_boolean_union_concatenates_operands() {
    let shape = extract(151).unwrap();
    assert_eq!(
        shape.rings,
        vec![
            placed_rectangle(),
            vec![p(3.0, 1.0, 3.0), p(9.0, 9.0, 9.0), p(8.0, 8.0, 8.0), p(3.0, 1.0, 3.0)],
        ]
    );
}

#[test]
fn test_brep_void_shells_add_rings() {
    let shape = extract(161).unwrap();
    assert_eq!(shape.rings.len(), 3);
    assert_eq!(shape.rings[..2], extract(42).unwrap().rings[..]);
    assert_eq!(shape.rings[2][1], p(9.0, 9.0, 9.0));
}

#[test]
fn test_profile_inner_curves_are_rings() {
    let shape = extract(176).unwrap();
    assert_eq!(shape.rings.len(), 2);
    assert_eq!(shape.rings[0], extract(71).unwrap().rings[0]);
    assert_eq!(
        shape.rings[1],
        vec![p(0.5, 0.5, 0.0), p(1.5, 0.5, 0.0), p(1.5, 1.5, 0.0), p(0.5, 0.5, 0.0)]
    );
}

#[test]
fn test_composite_segment_against_sense_is_reversed() {
    // Second segment runs (0,0) -> (0,2) -> (2,2) but is used backwards
    let shape = extract(183).unwrap();
    assert_eq!(shape.rings, extract(71).unwrap().rings);
}

#[test]
fn test_boolean_nesting_limit() {
    let deepest = MAX_NESTING_DEPTH as u32 + 1;
    let shape = extract_from(&nested_unions(deepest), 999).unwrap();
    assert_eq!(shape.rings.len(), deepest as usize + 1);
    assert_eq!(shape.rings[0], placed_rectangle());

    assert!(extract_from(&nested_unions(deepest + 1), 999).is_none());
}

#[test]
fn test_curve_nesting_limit() {
    let deepest = MAX_NESTING_DEPTH as u32;
    let shape = extract_from(&nested_trims(deepest), 1999).unwrap();
    assert_eq!(shape.rings, vec![vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0)]]);

    assert!(extract_from(&nested_trims(deepest + 1), 1999).is_none());
}
