// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Import error types.
//!
//! Only structural failures surface here. Per-object problems are absorbed
//! by the object transformer and reported through the import outcome.

use thiserror::Error;

/// Result type for the import pipeline
pub type Result<T> = std::result::Result<T, ImportError>;

/// Failures that abort a whole import
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("No root spatial element (IfcSite) in the model")]
    NoRootSpatialElement,

    #[error("Site #{0} has no usable RefLatitude/RefLongitude")]
    MissingGeoreference(u32),

    #[error(transparent)]
    Core(#[from] ifc_indoor_core::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] ifc_indoor_geometry::Error),

    #[error("Output serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
