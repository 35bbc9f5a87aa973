//! Translates logical field paths (record field names) into property paths.

use std::collections::BTreeMap;

use crate::errors::MappingError;
use crate::schema::{PropertySchema, RAW_SUBFIELD, SchemaDocument};

/// Resolves a dotted path of record field names, e.g. `Name.Title`, to the dotted property
/// path used by the index, e.g. `name.title`.
///
/// Fails on the first segment with no matching property; there is no partial result.
pub fn resolve_field_path(document: &SchemaDocument, logical_path: &str) -> Result<String, MappingError> {
    lookup(document, logical_path).map(|(path, _)| path)
}

/// Like [`resolve_field_path`], with the `.raw` suffix appended when the property is sortable.
pub fn resolve_sort_path(document: &SchemaDocument, logical_path: &str) -> Result<String, MappingError> {
    let (path, property) = lookup(document, logical_path)?;
    if property.is_sortable() {
        Ok(format!("{path}.{RAW_SUBFIELD}"))
    } else {
        Ok(path)
    }
}

/// Resolves a logical path and returns the property it lands on.
pub fn lookup<'a>(
    document: &'a SchemaDocument,
    logical_path: &str,
) -> Result<(String, &'a PropertySchema), MappingError> {
    resolve_in(&document.properties, logical_path, logical_path)
}

fn resolve_in<'a>(
    properties: &'a BTreeMap<String, PropertySchema>,
    remaining: &str,
    full_path: &str,
) -> Result<(String, &'a PropertySchema), MappingError> {
    let (segment, rest) = match remaining.split_once('.') {
        Some((segment, rest)) => (segment, Some(rest)),
        None => (remaining, None),
    };

    let (name, property) = properties
        .iter()
        .find(|(_, property)| property.field_name == segment)
        .ok_or_else(|| MappingError::unresolved(segment, full_path))?;

    match rest {
        None => Ok((name.clone(), property)),
        Some(rest) => {
            let (sub_path, leaf) = resolve_in(&property.properties, rest, full_path)?;
            Ok((format!("{name}.{sub_path}"), leaf))
        }
    }
}
