// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving placements
#[derive(Error, Debug)]
pub enum Error {
    #[error("#{entity} is missing required attribute {attribute}")]
    MissingAttribute { entity: u32, attribute: &'static str },

    #[error("Unexpected entity type for #{entity}: expected {expected}, got {found}")]
    UnexpectedType {
        entity: u32,
        expected: &'static str,
        found: String,
    },

    #[error("Degenerate geometry: {0}")]
    Degenerate(String),

    #[error("Placement chain deeper than {0} levels")]
    PlacementTooDeep(usize),

    #[error("Core parser error: {0}")]
    CoreError(#[from] ifc_indoor_core::Error),
}

impl Error {
    pub fn missing(entity: u32, attribute: &'static str) -> Self {
        Error::MissingAttribute { entity, attribute }
    }

    pub fn degenerate(message: impl Into<String>) -> Self {
        Error::Degenerate(message.into())
    }
}
