// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BIM object catalog: IFC type names per semantic category and the tags
//! each category carries in the output.

use ifc_indoor_core::{DecodedEntity, EntityGraph};
use serde::{Deserialize, Serialize};

/// Semantic categories imported from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BimCategory {
    Wall,
    Slab,
    Column,
    Door,
    Window,
    Stair,
}

impl BimCategory {
    pub const ALL: [BimCategory; 6] = [
        BimCategory::Wall,
        BimCategory::Slab,
        BimCategory::Column,
        BimCategory::Door,
        BimCategory::Window,
        BimCategory::Stair,
    ];

    /// Upper-case IFC entity names bucketed into this category
    pub fn type_names(self) -> &'static [&'static str] {
        match self {
            BimCategory::Wall => &[
                "IFCWALL",
                "IFCWALLSTANDARDCASE",
                "IFCWALLELEMENTEDCASE",
                "IFCCURTAINWALL",
            ],
            BimCategory::Slab => &["IFCSLAB", "IFCSLABSTANDARDCASE", "IFCSLABELEMENTEDCASE"],
            BimCategory::Column => &["IFCCOLUMN", "IFCCOLUMNSTANDARDCASE"],
            BimCategory::Door => &["IFCDOOR", "IFCDOORSTANDARDCASE"],
            BimCategory::Window => &["IFCWINDOW", "IFCWINDOWSTANDARDCASE"],
            BimCategory::Stair => &["IFCSTAIR", "IFCSTAIRFLIGHT"],
        }
    }

    /// Output tags, level excluded
    pub fn tags(self) -> &'static [(&'static str, &'static str)] {
        match self {
            BimCategory::Wall => &[("indoor", "wall")],
            BimCategory::Slab => &[("indoor", "area")],
            BimCategory::Column => &[("indoor", "column")],
            BimCategory::Door => &[("door", "yes")],
            BimCategory::Window => &[("window", "yes")],
            BimCategory::Stair => &[("highway", "steps"), ("indoor", "yes")],
        }
    }

    pub fn from_type_name(type_name: &str) -> Option<Self> {
        let upper = type_name.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|category| category.type_names().contains(&upper.as_str()))
    }

    pub fn name(self) -> &'static str {
        match self {
            BimCategory::Wall => "wall",
            BimCategory::Slab => "slab",
            BimCategory::Column => "column",
            BimCategory::Door => "door",
            BimCategory::Window => "window",
            BimCategory::Stair => "stair",
        }
    }

    /// Doors and windows sit in openings of a host element
    pub fn fills_openings(self) -> bool {
        matches!(self, BimCategory::Door | BimCategory::Window)
    }
}

impl std::fmt::Display for BimCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Entities of every catalogued type, grouped by category in catalog order
/// and ascending id within a category
pub fn bucket(graph: &dyn EntityGraph) -> Vec<(BimCategory, &DecodedEntity)> {
    let mut objects = Vec::new();
    for category in BimCategory::ALL {
        let mut entities: Vec<&DecodedEntity> = category
            .type_names()
            .iter()
            .flat_map(|name| graph.entities_of_type(name))
            .collect();
        entities.sort_unstable_by_key(|entity| entity.id);
        objects.extend(entities.into_iter().map(|entity| (category, entity)));
    }
    objects
}
