// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Indoor import pipeline
//!
//! Converts an IFC entity graph into georeferenced, tagged nodes and ways for
//! an indoor map:
//!
//! 1. bucket catalogued entities (walls, slabs, columns, doors, windows,
//!    stairs)
//! 2. resolve placement and extract a shape per object, subtracting slab
//!    openings
//! 3. assign storey levels
//! 4. rotate onto true north and project to latitude/longitude
//! 5. package rings as ways and merge near-duplicate nodes
//!
//! Objects that fail along the way are dropped and counted; the import only
//! fails as a whole for structural problems (see [`ImportError`]).
//!
//! ```no_run
//! use ifc_indoor_processing::{import, ImportConfig};
//!
//! # fn run(content: &str) -> ifc_indoor_processing::Result<()> {
//! let outcome = import(content, &ImportConfig::from_env())?;
//! if outcome.incomplete {
//!     eprintln!("{} objects could not be imported", outcome.dropped);
//! }
//! println!("{}", outcome.geometry.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod georef;
pub mod level;
pub mod object;
pub mod optimizer;
pub mod output;
pub mod transformer;

use std::collections::BTreeMap;
use std::time::Instant;

use ifc_indoor_core::{EntityGraph, LengthUnit, StepModel};
use ifc_indoor_geometry::Vector2;
use serde::{Deserialize, Serialize};

pub use catalog::BimCategory;
pub use config::{GeometryConfig, ImportConfig, OptimizerConfig};
pub use context::ImportContext;
pub use error::{ImportError, Result};
pub use georef::GeodeticTransformer;
pub use level::LevelIndex;
pub use object::BimObject;
pub use optimizer::optimize;
pub use output::{IndoorGeometry, Node, Way};
pub use transformer::{DropReason, ObjectTransformer};

/// Converted and dropped object counts for one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub converted: usize,
    pub dropped: usize,
}

/// Import statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportStats {
    pub schema: String,
    pub length_unit: LengthUnit,
    pub entity_count: usize,
    pub skipped_records: usize,
    pub categories: BTreeMap<BimCategory, CategoryStats>,
    pub levels: usize,
    pub merged_nodes: usize,
    pub elapsed_ms: u64,
}

/// Result of a successful import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub geometry: IndoorGeometry,
    /// Some objects were dropped; the output may be incomplete
    pub incomplete: bool,
    pub dropped: usize,
    pub stats: ImportStats,
}

/// Import STEP text
pub fn import(content: &str, config: &ImportConfig) -> Result<ImportOutcome> {
    let model = StepModel::parse(content)?;
    let mut outcome = import_graph(&model, config)?;
    outcome.stats.entity_count = model.len();
    outcome.stats.skipped_records = model.skipped_records();
    Ok(outcome)
}

/// Import from any entity graph provider
pub fn import_graph(graph: &dyn EntityGraph, config: &ImportConfig) -> Result<ImportOutcome> {
    let start = Instant::now();
    tracing::info!(schema = %graph.dialect(), "Starting indoor import");

    let context = ImportContext::new(graph, config.clone())?;
    let geodetic = GeodeticTransformer::for_site(
        graph,
        context.site,
        georef::true_north(graph),
        Vector2::new(0.0, 1.0),
        context.unit,
    )?;
    tracing::debug!(lat = geodetic.origin().lat, lon = geodetic.origin().lon, "Building origin");

    let transformer = ObjectTransformer::new(&context);
    let mut stats = ImportStats {
        schema: graph.dialect().to_string(),
        length_unit: context.unit,
        levels: context.levels().len(),
        ..Default::default()
    };

    let mut objects = Vec::new();
    let mut dropped = 0;
    for (category, entity) in catalog::bucket(graph) {
        let counts = stats.categories.entry(category).or_default();
        match transformer.prepare(category, entity) {
            Ok(mut object) => {
                object.geodetic = geodetic.project_shape(&object.shape);
                objects.push(object);
                counts.converted += 1;
            }
            Err(reason) => {
                tracing::warn!(entity = entity.id, category = %category, %reason, "Dropping object");
                counts.dropped += 1;
                dropped += 1;
            }
        }
    }

    let mut geometry = output::package(&objects);
    stats.merged_nodes = optimize(&config.optimizer, &mut geometry);
    stats.elapsed_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        objects = objects.len(),
        dropped,
        nodes = geometry.nodes.len(),
        ways = geometry.ways.len(),
        merged = stats.merged_nodes,
        elapsed_ms = stats.elapsed_ms,
        "Indoor import complete"
    );

    Ok(ImportOutcome {
        geometry,
        incomplete: dropped > 0,
        dropped,
        stats,
    })
}
