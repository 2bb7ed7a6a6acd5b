// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node-merge optimizer
//!
//! Adjacent elements are extracted independently, so touching walls end up
//! with separate nodes a few millimetres apart. Nodes on the same level that
//! lie within the merge distance, and are not already part of a common way,
//! are folded into one.

use ifc_indoor_geometry::{distance, LatLon};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::config::OptimizerConfig;
use crate::output::IndoorGeometry;

type WayList = SmallVec<[usize; 4]>;

/// A target node and the nodes that will be folded into it
#[derive(Debug, Clone, PartialEq)]
struct MergeGroup {
    target: u64,
    candidates: SmallVec<[u64; 4]>,
}

/// Merge near-duplicate nodes in place. Returns the number of nodes removed.
pub fn optimize(config: &OptimizerConfig, geometry: &mut IndoorGeometry) -> usize {
    if !config.enabled || geometry.nodes.is_empty() {
        return 0;
    }

    let mut memberships = way_memberships(geometry);
    let groups = merge_groups(config.merge_distance, geometry, &memberships);

    let mut dropped: FxHashSet<u64> = FxHashSet::default();
    for group in groups.iter().rev() {
        if dropped.contains(&group.target) {
            continue;
        }
        for &candidate in &group.candidates {
            if dropped.contains(&candidate) || shares_way(&memberships, group.target, candidate) {
                continue;
            }
            let ways = memberships.remove(&candidate).unwrap_or_default();
            for &way_index in &ways {
                let way = &mut geometry.ways[way_index];
                for node in way.nodes.iter_mut().filter(|node| **node == candidate) {
                    *node = group.target;
                }
                let target_ways = memberships.entry(group.target).or_default();
                if !target_ways.contains(&way_index) {
                    target_ways.push(way_index);
                }
            }
            dropped.insert(candidate);
        }
    }

    geometry.nodes.retain(|node| !dropped.contains(&node.id));

    tracing::debug!(groups = groups.len(), merged = dropped.len(), "Optimized nodes");
    dropped.len()
}

/// node id → indices of the ways that reference it
fn way_memberships(geometry: &IndoorGeometry) -> FxHashMap<u64, WayList> {
    let mut memberships: FxHashMap<u64, WayList> = FxHashMap::default();
    for (index, way) in geometry.ways.iter().enumerate() {
        for node in &way.nodes {
            let ways = memberships.entry(*node).or_default();
            if !ways.contains(&index) {
                ways.push(index);
            }
        }
    }
    memberships
}

fn shares_way(memberships: &FxHashMap<u64, WayList>, a: u64, b: u64) -> bool {
    match (memberships.get(&a), memberships.get(&b)) {
        (Some(a), Some(b)) => a.iter().any(|way| b.contains(way)),
        _ => false,
    }
}

/// Groups in creation order: per level in order of first appearance, then
/// per node in node order
fn merge_groups(
    merge_distance: f64,
    geometry: &IndoorGeometry,
    memberships: &FxHashMap<u64, WayList>,
) -> Vec<MergeGroup> {
    let mut levels: Vec<Option<i32>> = Vec::new();
    for node in &geometry.nodes {
        if !levels.contains(&node.level) {
            levels.push(node.level);
        }
    }

    let mut groups = Vec::new();
    for level in levels {
        let nodes: Vec<(u64, LatLon)> = geometry
            .nodes
            .iter()
            .filter(|node| node.level == level)
            .map(|node| (node.id, LatLon::new(node.lat, node.lon)))
            .collect();

        for &(target, position) in &nodes {
            let candidates: SmallVec<[u64; 4]> = nodes
                .iter()
                .filter(|(other, other_position)| {
                    *other != target
                        && distance(position, *other_position) <= merge_distance
                        && !shares_way(memberships, target, *other)
                })
                .map(|(other, _)| *other)
                .collect();
            if !candidates.is_empty() {
                groups.push(MergeGroup { target, candidates });
            }
        }
    }
    groups
}
