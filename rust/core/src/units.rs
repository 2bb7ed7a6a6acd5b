// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Length unit detection
//!
//! Follows IFCPROJECT → IFCUNITASSIGNMENT → IFCSIUNIT(.LENGTHUNIT.) and maps
//! the SI prefix onto one of the three length units the importer supports.

use crate::model::EntityGraph;

/// Length units recognised in the unit assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LengthUnit {
    #[default]
    Metre,
    Centimetre,
    Millimetre,
}

impl LengthUnit {
    /// Map an IfcSIPrefix label; anything unrecognised is plain metres
    pub fn from_prefix(prefix: Option<&str>) -> Self {
        match prefix {
            Some("CENTI") => LengthUnit::Centimetre,
            Some("MILLI") => LengthUnit::Millimetre,
            _ => LengthUnit::Metre,
        }
    }

    /// Multiplier converting a length in this unit to metres
    #[inline]
    pub fn to_metres(self) -> f64 {
        match self {
            LengthUnit::Metre => 1.0,
            LengthUnit::Centimetre => 1e-2,
            LengthUnit::Millimetre => 1e-3,
        }
    }
}

/// Detect the project length unit. Defaults to metres when the chain is
/// incomplete.
pub fn detect_length_unit(graph: &dyn EntityGraph) -> LengthUnit {
    let project = match graph.entities_of_type("IFCPROJECT").into_iter().next() {
        Some(project) => project,
        None => return LengthUnit::Metre,
    };

    let assignment = match graph.resolve(project, "UnitsInContext") {
        Some(assignment) if assignment.is("IFCUNITASSIGNMENT") => assignment,
        _ => return LengthUnit::Metre,
    };

    for unit in graph.resolve_list(assignment, "Units") {
        if !unit.is("IFCSIUNIT") {
            continue; // IfcConversionBasedUnit etc.
        }
        if unit.get_string("UnitType") != Some("LENGTHUNIT") {
            continue;
        }
        return LengthUnit::from_prefix(unit.get_string("Prefix"));
    }

    LengthUnit::Metre
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StepModel;
    use crate::schema::SchemaDialect;

    fn model_with_units(units: &str) -> StepModel {
        let content = format!(
            "#1=IFCPROJECT('g',$,'P',$,$,$,$,$,#2);\n#2=IFCUNITASSIGNMENT(({}));\n\
             #3=IFCSIUNIT(*,.AREAUNIT.,$,.SQUARE_METRE.);\n\
             #4=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);\n\
             #5=IFCSIUNIT(*,.LENGTHUNIT.,.CENTI.,.METRE.);\n\
             #6=IFCSIUNIT(*,.LENGTHUNIT.,$,.METRE.);\n\
             #7=IFCSIUNIT(*,.LENGTHUNIT.,.KILO.,.METRE.);",
            units
        );
        StepModel::with_dialect(&content, SchemaDialect::Ifc2x3)
    }

    #[test]
    fn test_detect_prefixes() {
        assert_eq!(detect_length_unit(&model_with_units("#3,#4")), LengthUnit::Millimetre);
        assert_eq!(detect_length_unit(&model_with_units("#5")), LengthUnit::Centimetre);
        assert_eq!(detect_length_unit(&model_with_units("#6")), LengthUnit::Metre);
        // Unrecognised prefixes fall back to metres
        assert_eq!(detect_length_unit(&model_with_units("#7")), LengthUnit::Metre);
    }

    #[test]
    fn test_missing_project_defaults_to_metres() {
        let model = StepModel::with_dialect("#1=IFCDIRECTION((1.,0.));", SchemaDialect::Ifc4);
        assert_eq!(detect_length_unit(&model), LengthUnit::Metre);
        assert_eq!(LengthUnit::Millimetre.to_metres(), 1e-3);
    }
}
