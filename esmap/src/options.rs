//! The per-field configuration tag language.
//!
//! A tag is a comma separated list of `key` or `key=value` definitions, e.g.
//! `"type=keyword,sortable"` or `"ref_id,case_sensitive=false"`. [`parse_options`] only
//! splits the text; [`FieldOptions::decode`] is where keys and values are validated.

use crate::errors::{MappingError, Partial};
use crate::schema::PropertyType;

/// Identifier of the analyzer attached by `case_sensitive=false`.
pub const CASE_INSENSITIVE_ANALYZER: &str = "case_insensitive";

const OPT_TYPE: &str = "type";
const OPT_ANALYZER: &str = "analyzer";
const OPT_SORTABLE: &str = "sortable";
const OPT_ID: &str = "id";
const OPT_REF_ID: &str = "ref_id";
const OPT_CASE_SENSITIVE: &str = "case_sensitive";

/// Splits a tag into ordered `(key, value)` pairs. A definition without `=` gets an empty
/// value, which the consumer reads as a boolean flag. Never fails.
pub fn parse_options(tag: &str) -> Vec<(String, String)> {
    tag.split(',')
        .map(str::trim)
        .filter(|definition| !definition.is_empty())
        .map(|definition| match definition.split_once('=') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (definition.to_string(), String::new()),
        })
        .collect()
}

/// Decoded form of one field's configuration tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    pub property_type: Option<PropertyType>,
    pub analyzer: Option<String>,
    pub sortable: bool,
    pub is_id: bool,
    pub ref_id: bool,
    pub case_sensitive: Option<bool>,
}

impl FieldOptions {
    /// Decodes a raw tag. Every definition is applied, so a later `id` is honored even after a
    /// bad one; the error slot holds the first bad definition.
    pub fn decode(tag: &str) -> Partial<FieldOptions> {
        let mut decoded = Partial::ok(FieldOptions::default());
        for (key, value) in parse_options(tag) {
            let applied = decoded.value_mut().apply(&key, &value);
            decoded.record(applied.err());
        }
        decoded
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), MappingError> {
        let invalid = || MappingError::invalid_option(key, value);
        match key {
            OPT_TYPE => {
                self.property_type = Some(PropertyType::parse(value).ok_or_else(invalid)?);
            }
            OPT_ANALYZER => {
                if value.is_empty() {
                    return Err(invalid());
                }
                self.analyzer = Some(value.to_string());
            }
            OPT_SORTABLE => self.sortable = parse_flag(value).ok_or_else(invalid)?,
            OPT_ID => self.is_id = parse_flag(value).ok_or_else(invalid)?,
            OPT_REF_ID => self.ref_id = parse_flag(value).ok_or_else(invalid)?,
            OPT_CASE_SENSITIVE => {
                self.case_sensitive = Some(match value {
                    "true" => true,
                    "false" => false,
                    _ => return Err(invalid()),
                });
            }
            _ => return Err(invalid()),
        }
        Ok(())
    }
}

/// Valueless definitions are flags; `=true`/`=false` is accepted as the explicit spelling.
fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "" | "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
