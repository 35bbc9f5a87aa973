//! Filter and sort clauses expressed with record field names.
//!
//! Only what consumers need to address properties by logical path: exact term filters,
//! sorting and paging. Everything else belongs to the query layer built on top.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::errors::MappingError;
use crate::resolve::{resolve_field_path, resolve_sort_path};
use crate::schema::SchemaDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortClause {
    /// Resolved property path, `.raw` included for sortable text.
    pub path: String,
    pub order: SortOrder,
}

/// Search body under construction. Each clause is resolved against the schema when added,
/// so an unknown field fails at the call site rather than at the search service.
///
/// ```ignore
/// let schema = User::schema().into_result()?;
/// let body = SearchRequest::new()
///     .term(&schema, "Email", "jane@example.com")?
///     .sort(&schema, "Name.Title", SortOrder::Asc)?
///     .size(1)
///     .to_json();
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub filters: Vec<(String, Value)>,
    pub sort: Vec<SortClause>,
    pub from: Option<u64>,
    pub size: Option<u64>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exact-match filter on the property behind `logical_path`.
    pub fn term(
        mut self,
        schema: &SchemaDocument,
        logical_path: &str,
        value: impl Into<Value>,
    ) -> Result<Self, MappingError> {
        let path = resolve_field_path(schema, logical_path)?;
        self.filters.push((path, value.into()));
        Ok(self)
    }

    pub fn sort(mut self, schema: &SchemaDocument, logical_path: &str, order: SortOrder) -> Result<Self, MappingError> {
        let path = resolve_sort_path(schema, logical_path)?;
        self.sort.push(SortClause { path, order });
        Ok(self)
    }

    #[inline]
    pub fn from(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    #[inline]
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        if !self.filters.is_empty() {
            let terms: Vec<Value> = self
                .filters
                .iter()
                .map(|(path, value)| json!({ "term": { path.as_str(): value } }))
                .collect();
            body.insert("query".to_string(), json!({ "bool": { "filter": terms } }));
        }
        if !self.sort.is_empty() {
            let sort: Vec<Value> = self
                .sort
                .iter()
                .map(|clause| json!({ clause.path.as_str(): { "order": clause.order.as_str() } }))
                .collect();
            body.insert("sort".to_string(), Value::Array(sort));
        }
        if let Some(from) = self.from {
            body.insert("from".to_string(), json!(from));
        }
        if let Some(size) = self.size {
            body.insert("size".to_string(), json!(size));
        }
        Value::Object(body)
    }
}
