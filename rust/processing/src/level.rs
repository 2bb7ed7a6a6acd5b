// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storey elevation → integer level.
//!
//! Levels are ordinal: the elevation closest to zero is level 0, the ones
//! below it count down and the ones above count up, whatever the storey
//! heights are.

/// Elevations closer than this are the same storey height
const ELEVATION_EPSILON: f64 = 1e-9;

/// Ordered elevation → level map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelIndex {
    /// Ascending by elevation
    levels: Vec<(f64, i32)>,
}

impl LevelIndex {
    /// Build from storey elevations. Non-finite values are ignored.
    pub fn build(elevations: impl IntoIterator<Item = f64>) -> Self {
        let mut distinct: Vec<f64> = elevations.into_iter().filter(|e| e.is_finite()).collect();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup_by(|a, b| (*a - *b).abs() <= ELEVATION_EPSILON);

        // Ties on |elevation| go to the lower storey
        let anchor = distinct
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.abs().total_cmp(&b.abs()))
            .map(|(index, _)| index)
            .unwrap_or(0);

        let levels = distinct
            .into_iter()
            .enumerate()
            .map(|(index, elevation)| (elevation, index as i32 - anchor as i32))
            .collect();
        Self { levels }
    }

    /// Level of a storey elevation that went into the index
    pub fn level(&self, elevation: f64) -> Option<i32> {
        self.levels
            .iter()
            .find(|(e, _)| (e - elevation).abs() <= ELEVATION_EPSILON)
            .map(|(_, level)| *level)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
