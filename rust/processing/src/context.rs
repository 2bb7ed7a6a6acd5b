// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-import context: everything one import derives from its entity graph
//! before objects are processed. Nothing here outlives the import.

use ifc_indoor_core::{detect_length_unit, DecodedEntity, EntityGraph, LengthUnit};
use ifc_indoor_geometry::{GeometryExtractor, PlacementResolver};
use rustc_hash::FxHashMap;

use crate::catalog::BimCategory;
use crate::config::ImportConfig;
use crate::error::{ImportError, Result};
use crate::level::LevelIndex;

/// Aggregation and fill chains longer than this are not followed
const MAX_RELATION_HOPS: usize = 16;

pub struct ImportContext<'g> {
    pub graph: &'g dyn EntityGraph,
    pub config: ImportConfig,
    pub unit: LengthUnit,
    /// Root spatial element
    pub site: &'g DecodedEntity,
    root_placement: Option<u32>,
    /// element → spatial structure
    containment: FxHashMap<u32, u32>,
    /// part → whole
    aggregates: FxHashMap<u32, u32>,
    /// host element → openings
    openings: FxHashMap<u32, Vec<u32>>,
    /// opening → host element
    opening_hosts: FxHashMap<u32, u32>,
    /// door/window → opening it fills
    filled_openings: FxHashMap<u32, u32>,
    storey_levels: FxHashMap<u32, i32>,
    levels: LevelIndex,
}

impl<'g> ImportContext<'g> {
    pub fn new(graph: &'g dyn EntityGraph, config: ImportConfig) -> Result<Self> {
        let site = graph
            .entities_of_type("IFCSITE")
            .into_iter()
            .next()
            .ok_or(ImportError::NoRootSpatialElement)?;
        let root_placement = site.get_ref("ObjectPlacement");
        let unit = detect_length_unit(graph);

        let mut context = Self {
            graph,
            config,
            unit,
            site,
            root_placement,
            containment: FxHashMap::default(),
            aggregates: FxHashMap::default(),
            openings: FxHashMap::default(),
            opening_hosts: FxHashMap::default(),
            filled_openings: FxHashMap::default(),
            storey_levels: FxHashMap::default(),
            levels: LevelIndex::default(),
        };
        context.index_relations();
        context.index_storeys();

        tracing::debug!(
            site = site.id,
            unit = ?unit,
            contained = context.containment.len(),
            openings = context.opening_hosts.len(),
            levels = context.levels.len(),
            "Built import context"
        );
        Ok(context)
    }

    fn index_relations(&mut self) {
        let graph = self.graph;

        for rel in graph.entities_of_type("IFCRELCONTAINEDINSPATIALSTRUCTURE") {
            let Some(structure) = rel.get_ref("RelatingStructure") else {
                continue;
            };
            for element in rel.get_ref_list("RelatedElements") {
                self.containment.insert(element, structure);
            }
        }

        for rel in graph.entities_of_type("IFCRELAGGREGATES") {
            let Some(whole) = rel.get_ref("RelatingObject") else {
                continue;
            };
            for part in rel.get_ref_list("RelatedObjects") {
                self.aggregates.insert(part, whole);
            }
        }

        for rel in graph.entities_of_type("IFCRELVOIDSELEMENT") {
            if let (Some(host), Some(opening)) = (
                rel.get_ref("RelatingBuildingElement"),
                rel.get_ref("RelatedOpeningElement"),
            ) {
                self.openings.entry(host).or_default().push(opening);
                self.opening_hosts.insert(opening, host);
            }
        }

        for rel in graph.entities_of_type("IFCRELFILLSELEMENT") {
            if let (Some(opening), Some(filler)) = (
                rel.get_ref("RelatingOpeningElement"),
                rel.get_ref("RelatedBuildingElement"),
            ) {
                self.filled_openings.insert(filler, opening);
            }
        }
    }

    fn index_storeys(&mut self) {
        let resolver = self.resolver();
        let mut elevations = Vec::new();

        for storey in self.graph.entities_of_type("IFCBUILDINGSTOREY") {
            let elevation = storey.get_float("Elevation").or_else(|| {
                // Fall back to the height of the storey's own placement
                resolver
                    .resolve_product(storey)
                    .ok()
                    .map(|placement| placement.translation.z)
            });
            match elevation {
                Some(elevation) if elevation.is_finite() => elevations.push((storey.id, elevation)),
                _ => tracing::warn!(storey = storey.id, "Storey has no usable elevation"),
            }
        }

        self.levels = LevelIndex::build(elevations.iter().map(|(_, e)| *e));
        for (storey, elevation) in elevations {
            if let Some(level) = self.levels.level(elevation) {
                self.storey_levels.insert(storey, level);
            }
        }
    }

    pub fn resolver(&self) -> PlacementResolver<'g> {
        PlacementResolver::new(self.graph, self.root_placement)
    }

    pub fn extractor(&self) -> GeometryExtractor<'g> {
        GeometryExtractor::with_tolerance(self.graph, self.config.geometry.point_tolerance)
    }

    pub fn levels(&self) -> &LevelIndex {
        &self.levels
    }

    /// Openings voiding a host element
    pub fn openings_of(&self, host: u32) -> &[u32] {
        self.openings.get(&host).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Level of an element.
    ///
    /// Direct storey containment decides when present. Otherwise the level is
    /// inherited from the aggregate parent, or for a door/window from the
    /// element hosting the opening it fills. `None` is the default level.
    pub fn level_of(&self, element: u32) -> Option<i32> {
        let mut current = element;
        for _ in 0..MAX_RELATION_HOPS {
            if let Some(structure) = self.containment.get(&current) {
                return self.storey_levels.get(structure).copied();
            }

            let next = self.aggregates.get(&current).copied().or_else(|| {
                if !self.fills_openings(current) {
                    return None;
                }
                let opening = self.filled_openings.get(&current)?;
                self.opening_hosts.get(opening).copied()
            });
            match next {
                // A storey reached through aggregation is its own level
                Some(parent) if self.storey_levels.contains_key(&parent) => {
                    return self.storey_levels.get(&parent).copied();
                }
                Some(parent) => current = parent,
                None => return None,
            }
        }
        None
    }

    /// Only doors and windows take their level from the host of the
    /// opening they fill
    fn fills_openings(&self, element: u32) -> bool {
        self.graph
            .entity(element)
            .and_then(|entity| BimCategory::from_type_name(&entity.type_name))
            .is_some_and(BimCategory::fills_openings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_indoor_core::{SchemaDialect, StepModel};

    const RELATIONS: &str = r#"
#1=IFCSITE('site',$,$,$,$,$,$,$,.ELEMENT.,(48,8,15),(11,34,30),0.,$,$);
#10=IFCBUILDINGSTOREY('s0',$,$,$,$,$,$,$,.ELEMENT.,0.);
#11=IFCBUILDINGSTOREY('s1',$,$,$,$,$,$,$,.ELEMENT.,3.2);
#12=IFCBUILDINGSTOREY('sb',$,$,$,$,$,$,$,.ELEMENT.,-3.);
#20=IFCWALL('w',$,$,$,$,$,$,$);
#21=IFCSLAB('s',$,$,$,$,$,$,$,$);
#22=IFCSTAIR('st',$,$,$,$,$,$,$,$);
#23=IFCSTAIRFLIGHT('sf',$,$,$,$,$,$,$,$,$,$,$);
#24=IFCOPENINGELEMENT('o',$,$,$,$,$,$,$);
#25=IFCDOOR('d',$,$,$,$,$,$,$,$,$);
#26=IFCCOLUMN('c',$,$,$,$,$,$,$);
#27=IFCWALL('lost',$,$,$,$,$,$,$);
#30=IFCRELCONTAINEDINSPATIALSTRUCTURE('r1',$,$,$,(#20,#22),#11);
#31=IFCRELCONTAINEDINSPATIALSTRUCTURE('r2',$,$,$,(#21),#12);
#32=IFCRELCONTAINEDINSPATIALSTRUCTURE('r3',$,$,$,(#26),#1);
#33=IFCRELAGGREGATES('a1',$,$,$,#22,(#23));
#34=IFCRELVOIDSELEMENT('v1',$,$,$,#20,#24);
#35=IFCRELFILLSELEMENT('f1',$,$,$,#24,#25);
#28=IFCCOLUMN('plug',$,$,$,$,$,$,$);
#36=IFCRELFILLSELEMENT('f2',$,$,$,#24,#28);
"#;

    #[test]
    fn test_level_lookup_and_fallbacks() {
        let model = StepModel::with_dialect(RELATIONS, SchemaDialect::Ifc2x3);
        let context = ImportContext::new(&model, ImportConfig::default()).unwrap();

        assert_eq!(context.levels().len(), 3);
        assert_eq!(context.level_of(20), Some(1));
        assert_eq!(context.level_of(21), Some(-1));
        // Flight inherits from its stair
        assert_eq!(context.level_of(23), Some(1));
        // Door follows fill → opening → host wall
        assert_eq!(context.level_of(25), Some(1));
        // Contained, but not in a storey
        assert_eq!(context.level_of(26), None);
        assert_eq!(context.level_of(27), None);
        // Only doors and windows follow the opening they fill
        assert_eq!(context.level_of(28), None);

        assert_eq!(context.openings_of(20), &[24]);
        assert!(context.openings_of(21).is_empty());
    }

    #[test]
    fn test_missing_site_is_structural() {
        let model = StepModel::with_dialect("#20=IFCWALL('w',$,$,$,$,$,$,$);", SchemaDialect::Ifc4);
        assert!(matches!(
            ImportContext::new(&model, ImportConfig::default()),
            Err(ImportError::NoRootSpatialElement)
        ));
    }
}
