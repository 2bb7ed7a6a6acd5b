// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Indoor Core
//!
//! Minimal STEP/IFC entity graph consumed by the indoor-mapping importer.
//!
//! - **Tokenization**: nom-based parsing of `#id=TYPE(...);` records
//! - **Entity graph**: [`EntityGraph`] trait with named attribute access
//! - **Schema dialects**: IFC2X3 and IFC4, detected from `FILE_SCHEMA`
//! - **Units**: metre / centimetre / millimetre length unit detection
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_indoor_core::{EntityGraph, StepModel};
//!
//! let model = StepModel::parse(&content)?;
//! for wall in model.entities_of_type("IFCWALL") {
//!     let placement = model.resolve(wall, "ObjectPlacement");
//! }
//! ```

pub mod attribute;
pub mod error;
pub mod model;
pub mod parser;
pub mod schema;
pub mod units;

pub use attribute::{AttributeValue, DecodedEntity};
pub use error::{Error, Result};
pub use model::{EntityGraph, StepModel};
pub use parser::{parse_entity, parse_real, Token};
pub use schema::{attribute_index, attribute_names, SchemaDialect};
pub use units::{detect_length_unit, LengthUnit};
