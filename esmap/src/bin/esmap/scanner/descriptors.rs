//! Links scanned records into the descriptors the library's builders consume.

use std::collections::BTreeMap;
use std::sync::Arc;

use esmap::{FieldDescriptor, RecordDescriptor, RecordRef, TypeDescriptor};

use super::parser::{ScannedRecord, ScannedType};

/// All records found in a project, by type name
#[derive(Clone, Default)]
pub struct RecordCatalog {
    records: Arc<BTreeMap<String, ScannedRecord>>,
}

impl RecordCatalog {
    /// Builds the catalog. When two records share a name the first one (in file order) wins
    /// and the shadowed one is returned.
    pub fn new(scanned: Vec<ScannedRecord>) -> (Self, Vec<ScannedRecord>) {
        let mut records = BTreeMap::new();
        let mut shadowed = Vec::new();
        for record in scanned {
            if records.contains_key(&record.name) {
                shadowed.push(record);
            } else {
                records.insert(record.name.clone(), record);
            }
        }
        (
            Self {
                records: Arc::new(records),
            },
            shadowed,
        )
    }

    pub fn records(&self) -> impl Iterator<Item = &ScannedRecord> {
        self.records.values()
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&ScannedRecord> {
        self.records.get(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Descriptor for `name`, with field types naming other records linked lazily.
    pub fn descriptor(&self, name: &str) -> Option<RecordDescriptor> {
        let record = self.records.get(name)?;
        let fields = record
            .fields
            .iter()
            .map(|field| FieldDescriptor {
                name: field.name.clone(),
                ty: self.describe(&field.ty),
                external_tag: field.external_tag.clone(),
                options_tag: field.options_tag.clone(),
            })
            .collect();
        Some(RecordDescriptor {
            name: record.name.clone(),
            type_path: format!("{}::{}", record.relative_path, record.name),
            fields,
        })
    }

    fn describe(&self, ty: &ScannedType) -> TypeDescriptor {
        match ty {
            ScannedType::Known(descriptor) => descriptor.clone(),
            ScannedType::Pointer(inner) => TypeDescriptor::pointer(self.describe(inner)),
            ScannedType::Slice(inner) => TypeDescriptor::slice(self.describe(inner)),
            ScannedType::Named(name) if self.records.contains_key(name) => {
                let catalog = self.clone();
                let target = name.clone();
                TypeDescriptor::Record(RecordRef::lazy(name.clone(), move || {
                    catalog.descriptor(&target).unwrap_or_default()
                }))
            }
            ScannedType::Named(name) => TypeDescriptor::Other(name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::parser::parse_record_source;
    use esmap::{MappingError, build_schema, resolve_field_path};

    const SOURCE: &str = r#"
#[derive(SearchRecord)]
struct User {
    #[esmap(id)]
    id: String,
    #[esmap(rename = "name")]
    name: Name,
    #[esmap(sortable)]
    nick: String,
    friends: Vec<Friend>,
    home: Address,
}

#[derive(SearchRecord)]
struct Name {
    #[esmap(rename = "title", type = "keyword")]
    title: String,
}

#[derive(SearchRecord)]
struct Friend {
    since: chrono::NaiveDate,
}

#[derive(SearchRecord)]
struct Node {
    label: String,
    children: Vec<Node>,
}
"#;

    fn catalog() -> RecordCatalog {
        RecordCatalog::new(parse_record_source(SOURCE, "src/lib.rs").unwrap()).0
    }

    #[test]
    fn test_scanned_records_build_through_the_library() {
        let descriptor = catalog().descriptor("User").unwrap();
        let schema = build_schema(&descriptor).into_result().unwrap();
        assert_eq!(
            serde_json::to_string(&schema).unwrap(),
            concat!(
                r#"{"properties":{"friends":{"type":"nested","properties":{"since":{"type":"date"}}},"#,
                r#""home":{"type":"text"},"#,
                r#""name":{"type":"object","properties":{"title":{"type":"keyword"}}},"#,
                r#""nick":{"type":"text","fields":{"raw":{"type":"keyword"}}}}}"#
            )
        );
        assert_eq!(resolve_field_path(&schema, "name.title").unwrap(), "name.title");
    }

    #[test]
    fn test_self_nesting_scanned_record_is_reported() {
        let descriptor = catalog().descriptor("Node").unwrap();
        let built = build_schema(&descriptor);
        assert!(matches!(built.error(), Some(MappingError::RecursiveRecord { .. })));
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let mut scanned = parse_record_source(SOURCE, "src/a.rs").unwrap();
        scanned.extend(parse_record_source(SOURCE, "src/b.rs").unwrap());
        let (catalog, shadowed) = RecordCatalog::new(scanned);
        assert_eq!(catalog.len(), 4);
        assert_eq!(shadowed.len(), 4);
        assert_eq!(catalog.get("User").unwrap().relative_path, "src/a.rs");
    }
}
