//! esmap core library.
//!
//! Derives search-index property schemas from record types, assembles index creation
//! bodies, and resolves record field paths to index property paths.

extern crate self as esmap;

pub mod analysis;
pub mod errors;
pub mod index;
pub mod naming;
pub mod options;
pub mod query;
pub mod registry;
pub mod resolve;
pub mod schema;
pub mod store;
pub mod types;

pub use analysis::{AnalysisSettings, AnalyzerDefinition, KnownAnalyzer, TokenizerDefinition, collect_analyzers};
pub use errors::*;
pub use esmap_macros::SearchRecord;
pub use index::{IndexDefinition, IndexDefinitionBuilder, IndexSettings};
pub use options::{CASE_INSENSITIVE_ANALYZER, FieldOptions, parse_options};
pub use query::{SearchRequest, SortOrder};
pub use registry::{RecordRegistration, find_record, index_definitions, is_record_registered, registered_records};
pub use resolve::{resolve_field_path, resolve_sort_path};
pub use schema::{PropertySchema, PropertyType, SchemaDocument, build_field, build_schema};
pub use store::{IndexClient, ensure_index_exists, ensure_record_index, ensure_registered_indices};
pub use types::{DescribeType, FieldDescriptor, RecordDescriptor, RecordMetadata, RecordRef, TypeDescriptor};

// Re-exported for use by the derive macro
#[doc(hidden)]
pub use inventory;
