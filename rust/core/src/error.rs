// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for entity graph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building an entity graph
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("No FILE_SCHEMA declaration found in header")]
    MissingSchema,

    #[error("Unsupported IFC schema '{0}' (supported: IFC2X3, IFC4)")]
    UnsupportedSchema(String),
}

impl Error {
    /// Build a parse error at a byte offset
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            position,
            message: message.into(),
        }
    }
}
