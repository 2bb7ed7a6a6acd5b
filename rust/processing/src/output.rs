// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output model handed to the map editor: nodes with positions and tagged
//! ways referencing them.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::object::BimObject;

/// A vertex in decimal degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: u64,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
}

/// A tagged line; closed ways repeat their first node id at the end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Way {
    pub id: u64,
    pub nodes: Vec<u64>,
    pub tags: Vec<(String, String)>,
    pub closed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndoorGeometry {
    pub nodes: Vec<Node>,
    pub ways: Vec<Way>,
}

impl IndoorGeometry {
    pub fn node(&self, id: u64) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Package prepared objects. Each ring becomes one way; a ring of a single
/// point leaves a lone node.
pub fn package(objects: &[BimObject]) -> IndoorGeometry {
    let mut geometry = IndoorGeometry::default();
    let mut next_node = 1u64;
    let mut next_way = 1u64;

    for object in objects {
        let tags = object.tags();

        for (ring, positions) in object.shape.rings.iter().zip(&object.geodetic) {
            let closed = ring.len() > 2 && ring.first() == ring.last();
            let distinct = match positions.split_last() {
                Some((_, rest)) if closed => rest,
                _ => &positions[..],
            };

            let mut node_ids = Vec::with_capacity(positions.len());
            for position in distinct {
                geometry.nodes.push(Node {
                    id: next_node,
                    lat: position.lat,
                    lon: position.lon,
                    level: object.level,
                });
                node_ids.push(next_node);
                next_node += 1;
            }

            if node_ids.len() < 2 {
                continue;
            }
            if closed {
                node_ids.push(node_ids[0]);
            }
            geometry.ways.push(Way {
                id: next_way,
                nodes: node_ids,
                tags: tags.clone(),
                closed,
            });
            next_way += 1;
        }
    }

    geometry
}
