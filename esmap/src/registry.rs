//! Record auto-registration via the inventory crate.
//!
//! Every non-generic `#[derive(SearchRecord)]` type submits a [`RecordRegistration`], so an
//! application can create all of its indices at boot without listing record types by hand.

use std::any::TypeId;

use crate::errors::Partial;
use crate::index::{IndexDefinition, IndexSettings};
use crate::naming;
use crate::types::RecordDescriptor;

/// Submitted to the inventory by the `SearchRecord` derive macro.
pub struct RecordRegistration {
    /// The record's type name (e.g. "UserProfile").
    pub type_name: &'static str,
    /// Module-qualified path of the record type.
    pub type_path: &'static str,
    pub type_id: fn() -> TypeId,
    pub descriptor_fn: fn() -> RecordDescriptor,
}

impl RecordRegistration {
    pub fn descriptor(&self) -> RecordDescriptor {
        (self.descriptor_fn)()
    }

    pub fn mapping_type_name(&self) -> String {
        naming::type_name(self.type_name)
    }

    pub fn index_name(&self) -> String {
        naming::index_name(self.type_name)
    }

    /// Index definition holding this record's mapping on top of `settings`.
    pub fn index_definition(&self, settings: &IndexSettings) -> Partial<IndexDefinition> {
        let (schema, error) = crate::schema::build_schema(&self.descriptor()).into_parts();
        let built = IndexDefinition::builder()
            .settings(settings.clone())
            .mapping(self.mapping_type_name(), schema)
            .build();
        // the schema error comes first; the builder adds none of its own here
        Partial::with_error(built.into_value(), error)
    }
}

inventory::collect!(RecordRegistration);

/// All records linked into the binary.
pub fn registered_records() -> impl Iterator<Item = &'static RecordRegistration> {
    inventory::iter::<RecordRegistration>()
}

/// Get a registered record by type name.
pub fn find_record(type_name: &str) -> Option<&'static RecordRegistration> {
    registered_records().find(|r| r.type_name == type_name)
}

pub fn is_record_registered<T: 'static>() -> bool {
    let type_id = TypeId::of::<T>();
    registered_records().any(|r| (r.type_id)() == type_id)
}

/// One `(index name, definition)` pair per registered record, sorted by index name.
pub fn index_definitions(settings: &IndexSettings) -> Vec<(String, Partial<IndexDefinition>)> {
    let mut definitions: Vec<_> = registered_records()
        .map(|record| (record.index_name(), record.index_definition(settings)))
        .collect();
    definitions.sort_by(|a, b| a.0.cmp(&b.0));
    definitions
}
