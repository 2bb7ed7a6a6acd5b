// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity graph access
//!
//! [`EntityGraph`] is the seam between the import pipeline and whatever
//! produced the entity instances. [`StepModel`] is the in-tree provider
//! built from STEP text.

use rustc_hash::FxHashMap;

use crate::attribute::{AttributeValue, DecodedEntity};
use crate::error::Result;
use crate::parser::parse_entity;
use crate::schema::SchemaDialect;

/// Read-only view of a loaded entity graph
pub trait EntityGraph {
    /// Look up an entity by its STEP id
    fn entity(&self, id: u32) -> Option<&DecodedEntity>;

    /// All entities of a type (case-insensitive), ascending by id
    fn entities_of_type(&self, type_name: &str) -> Vec<&DecodedEntity>;

    /// Schema dialect the graph was loaded with
    fn dialect(&self) -> SchemaDialect;

    /// Named attribute of an entity; null reads as absent
    fn attr<'a>(&self, entity: &'a DecodedEntity, name: &str) -> Option<&'a AttributeValue> {
        entity.attr(name)
    }

    /// Follow a single entity reference attribute
    fn resolve(&self, entity: &DecodedEntity, name: &str) -> Option<&DecodedEntity> {
        self.entity(entity.get_ref(name)?)
    }

    /// Follow a list-of-references attribute. Dangling references are skipped.
    fn resolve_list(&self, entity: &DecodedEntity, name: &str) -> Vec<&DecodedEntity> {
        entity
            .get_ref_list(name)
            .into_iter()
            .filter_map(|id| self.entity(id))
            .collect()
    }
}

/// Entity graph decoded from STEP physical file text
#[derive(Debug, Clone)]
pub struct StepModel {
    dialect: SchemaDialect,
    entities: FxHashMap<u32, DecodedEntity>,
    by_type: FxHashMap<String, Vec<u32>>,
    skipped: usize,
}

impl StepModel {
    /// Detect the schema dialect from the header and decode the DATA section
    pub fn parse(content: &str) -> Result<Self> {
        let dialect = SchemaDialect::detect(content)?;
        Ok(Self::with_dialect(content, dialect))
    }

    /// Decode records without header detection
    pub fn with_dialect(content: &str, dialect: SchemaDialect) -> Self {
        let data = match content.find("DATA;") {
            Some(pos) => &content[pos + "DATA;".len()..],
            None => content,
        };

        let mut entities = FxHashMap::default();
        let mut by_type: FxHashMap<String, Vec<u32>> = FxHashMap::default();
        let mut skipped = 0;

        for (start, end) in record_spans(data) {
            let record = &data[start..end];
            match parse_entity(record) {
                Ok((id, type_name, tokens)) => {
                    let attributes = tokens.iter().map(AttributeValue::from_token).collect();
                    let entity = DecodedEntity::new(id, type_name, attributes);
                    by_type.entry(entity.type_name.clone()).or_default().push(id);
                    entities.insert(id, entity);
                }
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(offset = start, error = %e, "Skipping malformed STEP record");
                }
            }
        }

        for ids in by_type.values_mut() {
            ids.sort_unstable();
        }

        tracing::debug!(
            entities = entities.len(),
            types = by_type.len(),
            skipped,
            %dialect,
            "Decoded entity graph"
        );

        Self {
            dialect,
            entities,
            by_type,
            skipped,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Records that failed to tokenize
    pub fn skipped_records(&self) -> usize {
        self.skipped
    }
}

impl EntityGraph for StepModel {
    fn entity(&self, id: u32) -> Option<&DecodedEntity> {
        self.entities.get(&id)
    }

    fn entities_of_type(&self, type_name: &str) -> Vec<&DecodedEntity> {
        let key = type_name.to_ascii_uppercase();
        self.by_type
            .get(&key)
            .map(|ids| ids.iter().filter_map(|id| self.entities.get(id)).collect())
            .unwrap_or_default()
    }

    fn dialect(&self) -> SchemaDialect {
        self.dialect
    }
}

/// Byte spans of `#id=...;` records, skipping quoted strings and comments
/// when looking for the terminating semicolon.
fn record_spans(data: &str) -> Vec<(usize, usize)> {
    let bytes = data.as_bytes();
    let len = bytes.len();
    let mut spans = Vec::with_capacity(len / 50);
    let mut pos = 0;

    while pos < len {
        let start = match memchr::memchr(b'#', &bytes[pos..]) {
            Some(offset) => pos + offset,
            None => break,
        };

        let mut i = start + 1;
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let id_end = i;
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if id_end == start + 1 || i >= len || bytes[i] != b'=' {
            pos = start + 1;
            continue;
        }

        let mut in_string = false;
        let mut end = None;
        while i < len {
            match bytes[i] {
                b'\'' => in_string = !in_string,
                b'/' if !in_string && bytes.get(i + 1) == Some(&b'*') => {
                    i = match memchr::memmem::find(&bytes[i + 2..], b"*/") {
                        Some(offset) => i + 2 + offset + 1,
                        None => len,
                    };
                }
                b';' if !in_string => {
                    end = Some(i + 1);
                    break;
                }
                _ => {}
            }
            i += 1;
        }

        match end {
            Some(end) => {
                spans.push((start, end));
                pos = end;
            }
            None => break,
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENT: &str = r#"
ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#1=IFCCARTESIANPOINT((0.,0.,0.));
#2=IFCDIRECTION((0.,0.,1.));
#3=IFCAXIS2PLACEMENT3D(#1,#2,$);
#4=IFCWALL('a;b',$,'Wall; with semicolon',$,$,#5,$,$);
#5=IFCLOCALPLACEMENT($,#3);
#6=IFCWALL('c',$,'Second',$,$,#5,$,$);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_parse_model() {
        let model = StepModel::parse(FRAGMENT).unwrap();
        assert_eq!(model.dialect(), SchemaDialect::Ifc2x3);
        assert_eq!(model.len(), 6);
        assert_eq!(model.skipped_records(), 0);

        let walls = model.entities_of_type("IfcWall");
        assert_eq!(walls.len(), 2);
        assert_eq!(walls[0].id, 4);
        assert_eq!(walls[0].get_string("Name"), Some("Wall; with semicolon"));
    }

    #[test]
    fn test_resolve_references() {
        let model = StepModel::parse(FRAGMENT).unwrap();
        let wall = model.entity(6).unwrap();
        let placement = model.resolve(wall, "ObjectPlacement").unwrap();
        assert!(placement.is("IFCLOCALPLACEMENT"));
        assert!(model.resolve(placement, "PlacementRelTo").is_none());
        let axis = model.resolve(placement, "RelativePlacement").unwrap();
        assert_eq!(axis.id, 3);
    }

    #[test]
    fn test_malformed_record_is_skipped() {
        let content = "#1=IFCDIRECTION((1.,0.,0.));\n#2=IFCDIRECTION((1.,0.,0.),,);\n#3=IFCPOLYLOOP((#1));";
        let model = StepModel::with_dialect(content, SchemaDialect::Ifc4);
        assert_eq!(model.len(), 2);
        assert_eq!(model.skipped_records(), 1);
        assert!(model.entity(2).is_none());
    }

    #[test]
    fn test_comments_are_ignored() {
        let content = "#1=IFCDIRECTION(/* x; y */ (1.,0.,0.));";
        let spans = record_spans(content);
        assert_eq!(spans, vec![(0, content.len())]);

        let model = StepModel::with_dialect(content, SchemaDialect::Ifc4);
        let direction = model.entity(1).unwrap();
        assert_eq!(
            direction.attr("DirectionRatios").and_then(|v| v.as_triple()),
            Some([1.0, 0.0, 0.0])
        );
    }
}
