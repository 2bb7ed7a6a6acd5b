// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Import configuration, with defaults and environment overrides.

use ifc_indoor_geometry::{RepresentationIdentifier, DEFAULT_POINT_TOLERANCE};
use serde::{Deserialize, Serialize};

/// Node-merge optimizer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub enabled: bool,
    /// Great-circle distance in metres below which same-level nodes merge
    pub merge_distance: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            merge_distance: 0.05,
        }
    }
}

/// Geometry extraction settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Vertex-coincidence tolerance for boolean operations and openings,
    /// in model length units
    pub point_tolerance: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            point_tolerance: DEFAULT_POINT_TOLERANCE,
        }
    }
}

/// Settings for one import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub optimizer: OptimizerConfig,
    pub geometry: GeometryConfig,
    /// Representation identifiers tried per object, first usable wins
    pub representation_preference: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            optimizer: OptimizerConfig::default(),
            geometry: GeometryConfig::default(),
            representation_preference: vec!["Body".into(), "Box".into(), "Axis".into()],
        }
    }
}

impl ImportConfig {
    /// Load configuration from environment variables.
    ///
    /// - `IFC_INDOOR_OPTIMIZE`: `true`/`false` (also `1`/`0`)
    /// - `IFC_INDOOR_MERGE_DISTANCE`: metres
    /// - `IFC_INDOOR_POINT_TOLERANCE`: model units
    /// - `IFC_INDOOR_REPRESENTATIONS`: comma-separated identifiers
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            optimizer: OptimizerConfig {
                enabled: std::env::var("IFC_INDOOR_OPTIMIZE")
                    .ok()
                    .and_then(|v| parse_flag(&v))
                    .unwrap_or(defaults.optimizer.enabled),
                merge_distance: std::env::var("IFC_INDOOR_MERGE_DISTANCE")
                    .ok()
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(defaults.optimizer.merge_distance),
            },
            geometry: GeometryConfig {
                point_tolerance: std::env::var("IFC_INDOOR_POINT_TOLERANCE")
                    .ok()
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(defaults.geometry.point_tolerance),
            },
            representation_preference: std::env::var("IFC_INDOOR_REPRESENTATIONS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.representation_preference),
        }
    }

    /// Preference order as identifiers. Unknown labels are skipped.
    pub fn preferred_identifiers(&self) -> Vec<RepresentationIdentifier> {
        self.representation_preference
            .iter()
            .filter_map(|label| {
                let identifier = RepresentationIdentifier::from_label(label);
                if identifier.is_none() {
                    tracing::warn!(label = %label, "Ignoring unknown representation identifier");
                }
                identifier
            })
            .collect()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();
        assert!(config.optimizer.enabled);
        assert_eq!(config.optimizer.merge_distance, 0.05);
        assert_eq!(config.geometry.point_tolerance, 1e-6);
        assert_eq!(
            config.preferred_identifiers(),
            vec![
                RepresentationIdentifier::Body,
                RepresentationIdentifier::Box,
                RepresentationIdentifier::Axis
            ]
        );
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: ImportConfig =
            serde_json::from_str(r#"{"optimizer": {"merge_distance": 0.2}}"#).unwrap();
        assert!(config.optimizer.enabled);
        assert_eq!(config.optimizer.merge_distance, 0.2);
        assert_eq!(config.representation_preference.len(), 3);
    }

    #[test]
    fn test_unknown_identifiers_are_skipped() {
        let config = ImportConfig {
            representation_preference: vec!["Axis".into(), "Walls".into()],
            ..Default::default()
        };
        assert_eq!(config.preferred_identifiers(), vec![RepresentationIdentifier::Axis]);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    // Only test in the crate that sets IFC_INDOOR_* variables
    #[test]
    fn test_from_env_overrides_and_falls_back() {
        std::env::set_var("IFC_INDOOR_OPTIMIZE", "off");
        std::env::set_var("IFC_INDOOR_MERGE_DISTANCE", " 0.25 ");
        std::env::set_var("IFC_INDOOR_POINT_TOLERANCE", "tiny");
        std::env::set_var("IFC_INDOOR_REPRESENTATIONS", "Box, ,FootPrint");

        let config = ImportConfig::from_env();
        assert!(!config.optimizer.enabled);
        assert_eq!(config.optimizer.merge_distance, 0.25);
        assert_eq!(config.geometry.point_tolerance, 1e-6);
        assert_eq!(
            config.preferred_identifiers(),
            vec![RepresentationIdentifier::Box, RepresentationIdentifier::FootPrint]
        );

        std::env::set_var("IFC_INDOOR_OPTIMIZE", "sometimes");
        for name in [
            "IFC_INDOOR_MERGE_DISTANCE",
            "IFC_INDOOR_POINT_TOLERANCE",
            "IFC_INDOOR_REPRESENTATIONS",
        ] {
            std::env::remove_var(name);
        }
        let config = ImportConfig::from_env();
        std::env::remove_var("IFC_INDOOR_OPTIMIZE");
        assert_eq!(config.optimizer, ImportConfig::default().optimizer);
        assert_eq!(config.representation_preference.len(), 3);
    }
}
