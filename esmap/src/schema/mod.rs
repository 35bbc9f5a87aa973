//! Property schemas derived from record descriptors.

mod builder;
mod infer;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use builder::{build_field, build_schema, external_name};
pub use infer::infer_type;

/// Name of the keyword sub-field attached to `sortable` properties.
pub const RAW_SUBFIELD: &str = "raw";

/// Search-engine property types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Text,
    Keyword,
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Date,
    Object,
    Nested,
}

impl PropertyType {
    pub const fn as_str(self) -> &'static str {
        match self {
            PropertyType::Text => "text",
            PropertyType::Keyword => "keyword",
            PropertyType::Boolean => "boolean",
            PropertyType::Byte => "byte",
            PropertyType::Short => "short",
            PropertyType::Integer => "integer",
            PropertyType::Long => "long",
            PropertyType::Float => "float",
            PropertyType::Double => "double",
            PropertyType::Date => "date",
            PropertyType::Object => "object",
            PropertyType::Nested => "nested",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "text" => PropertyType::Text,
            "keyword" => PropertyType::Keyword,
            "boolean" => PropertyType::Boolean,
            "byte" => PropertyType::Byte,
            "short" => PropertyType::Short,
            "integer" => PropertyType::Integer,
            "long" => PropertyType::Long,
            "float" => PropertyType::Float,
            "double" => PropertyType::Double,
            "date" => PropertyType::Date,
            "object" => PropertyType::Object,
            "nested" => PropertyType::Nested,
            _ => return None,
        })
    }

    /// Object and nested properties carry sub-properties.
    pub const fn is_compound(self) -> bool {
        matches!(self, PropertyType::Object | PropertyType::Nested)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-field definition under a property's `fields` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubField {
    #[serde(rename = "type")]
    pub property_type: PropertyType,
}

/// Schema entry for one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, SubField>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertySchema>,
    /// Record field this property was generated from; used by the field path resolver.
    #[serde(skip)]
    pub field_name: String,
}

impl PropertySchema {
    pub fn new(property_type: PropertyType, field_name: impl Into<String>) -> Self {
        Self {
            property_type,
            analyzer: None,
            similarity: None,
            fields: BTreeMap::new(),
            properties: BTreeMap::new(),
            field_name: field_name.into(),
        }
    }

    /// True when the property carries the `raw` keyword sub-field.
    pub fn is_sortable(&self) -> bool {
        self.fields.contains_key(RAW_SUBFIELD)
    }

    pub(crate) fn make_sortable(&mut self) {
        self.fields.insert(
            RAW_SUBFIELD.to_string(),
            SubField {
                property_type: PropertyType::Keyword,
            },
        );
    }
}

/// Property schema for one record type: `{"properties": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub properties: BTreeMap<String, PropertySchema>,
}

impl SchemaDocument {
    pub fn get(&self, property: &str) -> Option<&PropertySchema> {
        self.properties.get(property)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Depth-first walk over every property, yielding its dotted property path.
    pub fn walk(&self) -> Vec<(String, &PropertySchema)> {
        let mut out = Vec::new();
        walk_properties(&self.properties, "", &mut out);
        out
    }
}

fn walk_properties<'a>(
    properties: &'a BTreeMap<String, PropertySchema>,
    prefix: &str,
    out: &mut Vec<(String, &'a PropertySchema)>,
) {
    for (name, property) in properties {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        out.push((path.clone(), property));
        walk_properties(&property.properties, &path, out);
    }
}
