// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded attribute values and entities

use crate::parser::Token;
use crate::schema::attribute_index;

/// IFC entity attribute value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    /// Entity reference
    EntityRef(u32),
    /// String value
    String(String),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Enum value (without the surrounding dots)
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Null/undefined
    Null,
    /// Derived value (*)
    Derived,
}

impl AttributeValue {
    /// Convert from Token
    pub fn from_token(token: &Token) -> Self {
        match token {
            Token::EntityRef(id) => AttributeValue::EntityRef(*id),
            Token::String(s) => AttributeValue::String(s.replace("''", "'")),
            Token::Integer(i) => AttributeValue::Integer(*i),
            Token::Float(f) => AttributeValue::Float(*f),
            Token::Enum(e) => AttributeValue::Enum(e.to_string()),
            Token::List(items) => AttributeValue::List(items.iter().map(Self::from_token).collect()),
            // Measures like IFCLENGTHMEASURE(2.5) collapse to their single argument
            Token::TypedValue(_, args) if args.len() == 1 => Self::from_token(&args[0]),
            Token::TypedValue(type_name, args) => {
                let mut values = vec![AttributeValue::String(type_name.to_string())];
                values.extend(args.iter().map(Self::from_token));
                AttributeValue::List(values)
            }
            Token::Null => AttributeValue::Null,
            Token::Derived => AttributeValue::Derived,
        }
    }

    #[inline]
    pub fn as_entity_ref(&self) -> Option<u32> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as string; enums are returned as their bare label
    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) | AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// STEP booleans: `.T.` / `.F.`
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_enum()? {
            "T" | "TRUE" => Some(true),
            "F" | "FALSE" => Some(false),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if null/derived
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null | AttributeValue::Derived)
    }

    /// Read a list of numbers into a fixed 3D triple, padding missing
    /// components with zero. NaN entries are kept as-is.
    pub fn as_triple(&self) -> Option<[f64; 3]> {
        let items = self.as_list()?;
        if items.is_empty() || items.len() > 3 {
            return None;
        }
        let mut out = [0.0; 3];
        for (slot, item) in out.iter_mut().zip(items) {
            *slot = item.as_float().unwrap_or(f64::NAN);
        }
        Some(out)
    }
}

/// Decoded IFC entity with positional attributes
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedEntity {
    pub id: u32,
    /// Upper-case STEP type name, e.g. `IFCWALL`
    pub type_name: String,
    pub attributes: Vec<AttributeValue>,
}

impl DecodedEntity {
    pub fn new(id: u32, type_name: impl Into<String>, attributes: Vec<AttributeValue>) -> Self {
        let mut type_name = type_name.into();
        type_name.make_ascii_uppercase();
        Self {
            id,
            type_name,
            attributes,
        }
    }

    /// Case-insensitive type check
    #[inline]
    pub fn is(&self, type_name: &str) -> bool {
        self.type_name.eq_ignore_ascii_case(type_name)
    }

    /// Get attribute by index
    #[inline]
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Get attribute by its EXPRESS name, e.g. `"ObjectPlacement"`.
    /// Null and derived values read as absent.
    pub fn attr(&self, name: &str) -> Option<&AttributeValue> {
        let index = attribute_index(&self.type_name, name)?;
        self.get(index).filter(|value| !value.is_null())
    }

    pub fn get_ref(&self, name: &str) -> Option<u32> {
        self.attr(name).and_then(|v| v.as_entity_ref())
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(|v| v.as_string())
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.attr(name).and_then(|v| v.as_float())
    }

    pub fn get_list(&self, name: &str) -> Option<&[AttributeValue]> {
        self.attr(name).and_then(|v| v.as_list())
    }

    /// Entity ids referenced from a list attribute, in order
    pub fn get_ref_list(&self, name: &str) -> Vec<u32> {
        self.get_list(name)
            .map(|items| items.iter().filter_map(|v| v.as_entity_ref()).collect())
            .unwrap_or_default()
    }
}
