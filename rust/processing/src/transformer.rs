// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object transformer: placement, shape extraction and opening subtraction
//! for one building element.

use ifc_indoor_core::DecodedEntity;
use ifc_indoor_geometry::{
    representations_of, GeometryExtractor, PlacementResolver, RepresentationIdentifier, Shape,
};
use thiserror::Error;

use crate::catalog::BimCategory;
use crate::context::ImportContext;
use crate::object::BimObject;

/// Why an object was dropped
#[derive(Debug, Error)]
pub enum DropReason {
    #[error("placement: {0}")]
    Placement(#[from] ifc_indoor_geometry::Error),

    #[error("no usable representation")]
    NoGeometry,

    #[error("non-finite coordinates")]
    NonFinite,
}

pub struct ObjectTransformer<'c, 'g> {
    context: &'c ImportContext<'g>,
    resolver: PlacementResolver<'g>,
    extractor: GeometryExtractor<'g>,
    preference: Vec<RepresentationIdentifier>,
}

impl<'c, 'g> ObjectTransformer<'c, 'g> {
    pub fn new(context: &'c ImportContext<'g>) -> Self {
        Self {
            context,
            resolver: context.resolver(),
            extractor: context.extractor(),
            preference: context.config.preferred_identifiers(),
        }
    }

    /// Place and extract one element. The result carries root-frame geometry
    /// and a level, but no geodetic points yet.
    pub fn prepare(&self, category: BimCategory, entity: &DecodedEntity) -> Result<BimObject, DropReason> {
        let mut object = BimObject::new(entity.id, category);
        object.global_id = entity.get_string("GlobalId").map(str::to_string);
        object.placement = self.resolver.resolve_product(entity)?;
        object.local = self.local_shape(entity).ok_or(DropReason::NoGeometry)?;

        let mut shape = object.placement.apply_shape(&object.local);
        if category == BimCategory::Slab {
            shape = self.subtract_openings(entity.id, shape);
        }

        if shape.is_empty() {
            return Err(DropReason::NoGeometry);
        }
        if !shape.is_finite() {
            return Err(DropReason::NonFinite);
        }

        object.shape = shape;
        object.level = self.context.level_of(entity.id);
        Ok(object)
    }

    /// Shape of the first representation, in preference order, that
    /// yields one
    pub fn local_shape(&self, product: &DecodedEntity) -> Option<Shape> {
        let representations = representations_of(self.context.graph, product);
        self.preference.iter().find_map(|identifier| {
            representations
                .iter()
                .filter(|rep| rep.identifier == Some(*identifier))
                .find_map(|rep| self.extractor.extract(rep))
        })
    }

    /// Openings go through the same placement and extraction as the host.
    /// An opening that cannot be prepared is skipped.
    fn subtract_openings(&self, host: u32, mut shape: Shape) -> Shape {
        let graph = self.context.graph;
        let tolerance = self.extractor.tolerance();

        for &opening_id in self.context.openings_of(host) {
            let Some(opening) = graph.entity(opening_id) else {
                continue;
            };
            let placement = match self.resolver.resolve_product(opening) {
                Ok(placement) => placement,
                Err(e) => {
                    tracing::debug!(host, opening = opening_id, error = %e, "Skipping opening");
                    continue;
                }
            };
            let Some(local) = self.local_shape(opening) else {
                tracing::debug!(host, opening = opening_id, "Opening has no usable shape");
                continue;
            };
            shape = shape.subtract_opening(&placement.apply_shape(&local), tolerance);
        }
        shape
    }
}
