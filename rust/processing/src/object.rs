// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One importable building element as it moves through the pipeline.

use ifc_indoor_geometry::{LatLon, Placement, Shape};

use crate::catalog::BimCategory;

/// A building element being imported
#[derive(Debug, Clone)]
pub struct BimObject {
    /// STEP id of the source entity
    pub id: u32,
    pub category: BimCategory,
    pub global_id: Option<String>,
    /// Object-to-root transform
    pub placement: Placement,
    /// Geometry in the object's own frame
    pub local: Shape,
    /// Geometry in the root frame, openings subtracted
    pub shape: Shape,
    pub level: Option<i32>,
    /// One entry per ring of `shape`
    pub geodetic: Vec<Vec<LatLon>>,
}

impl BimObject {
    pub fn new(id: u32, category: BimCategory) -> Self {
        Self {
            id,
            category,
            global_id: None,
            placement: Placement::identity(),
            local: Shape::new(),
            shape: Shape::new(),
            level: None,
            geodetic: Vec::new(),
        }
    }

    /// Output tags: catalog tags plus the level, when known
    pub fn tags(&self) -> Vec<(String, String)> {
        let mut tags: Vec<(String, String)> = self
            .category
            .tags()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if let Some(level) = self.level {
            tags.push(("level".to_string(), level.to_string()));
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_carry_level_only_when_known() {
        let mut object = BimObject::new(1, BimCategory::Stair);
        assert_eq!(object.tags().len(), 2);
        assert!(object.tags().iter().all(|(k, _)| k != "level"));

        object.level = Some(-1);
        assert!(object.tags().contains(&("level".to_string(), "-1".to_string())));
    }
}
