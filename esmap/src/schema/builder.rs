use log::{debug, warn};

use crate::errors::{MappingError, Partial};
use crate::options::{CASE_INSENSITIVE_ANALYZER, FieldOptions};
use crate::schema::{PropertySchema, PropertyType, SchemaDocument, infer_type};
use crate::types::{FieldDescriptor, RecordDescriptor};

/// External-name tag value that keeps a field out of the schema.
const OMIT_SENTINEL: &str = "-";

/// Property name for a field: the external-name tag up to its first comma, or the
/// declared field name. `None` when the tag is the omit sentinel.
pub fn external_name(field: &FieldDescriptor) -> Option<&str> {
    let Some(tag) = field.external_tag.as_deref() else {
        return Some(field.name.as_str());
    };
    let name = tag.split(',').next().unwrap_or_default().trim();
    match name {
        OMIT_SENTINEL => None,
        "" => Some(field.name.as_str()),
        name => Some(name),
    }
}

/// Builds the schema document for a record.
///
/// The document is returned even when a field fails; the error slot holds the first
/// failure and the offending property is kept in its best-effort form.
pub fn build_schema(record: &RecordDescriptor) -> Partial<SchemaDocument> {
    SchemaBuilder::default().record(record)
}

/// Builds the schema entry for one field. `None` means the field does not take part in
/// the schema (identity field or omitted).
pub fn build_field(field: &FieldDescriptor) -> Partial<Option<PropertySchema>> {
    SchemaBuilder::default().field(field)
}

/// Tracks the records currently being expanded so self-nesting types fail instead of
/// recursing forever.
#[derive(Default)]
struct SchemaBuilder {
    in_progress: Vec<String>,
}

impl SchemaBuilder {
    fn record(&mut self, record: &RecordDescriptor) -> Partial<SchemaDocument> {
        debug!("building schema for record {}", record.name);
        self.in_progress.push(record.type_path.clone());

        let mut document = Partial::ok(SchemaDocument::default());
        for field in &record.fields {
            let Some(property_name) = external_name(field) else {
                debug!("{}.{} omitted from schema", record.name, field.name);
                continue;
            };
            let (property, error) = self.field(field).into_parts();
            document.record(error);
            let Some(property) = property else {
                continue;
            };
            if let Some(previous) = document.value_mut().properties.insert(property_name.to_string(), property) {
                warn!(
                    "{}: property `{}` from field {} replaced by field {}",
                    record.name, property_name, previous.field_name, field.name
                );
            }
        }

        self.in_progress.pop();
        document
    }

    fn field(&mut self, field: &FieldDescriptor) -> Partial<Option<PropertySchema>> {
        if external_name(field).is_none() {
            return Partial::ok(None);
        }

        let (options, decode_error) = match field.options_tag.as_deref() {
            Some(tag) => FieldOptions::decode(tag).into_parts(),
            None => (FieldOptions::default(), None),
        };
        if options.is_id {
            return Partial::with_error(None, decode_error);
        }

        let property_type = options.property_type.unwrap_or_else(|| infer_type(&field.ty));
        let mut property = PropertySchema::new(property_type, &field.name);
        let mut result = Partial::with_error((), decode_error);
        result.record(apply_options(&mut property, &options).err());

        if property.property_type.is_compound() {
            result.record(self.attach_sub_properties(field, &mut property).err());
        }

        debug!("field {} mapped as {}", field.name, property.property_type);
        result.map(|()| Some(property))
    }

    fn attach_sub_properties(
        &mut self,
        field: &FieldDescriptor,
        property: &mut PropertySchema,
    ) -> Result<(), MappingError> {
        let record_ref = field.ty.record().ok_or_else(|| MappingError::MalformedRecordType {
            field: field.name.clone(),
            type_name: field.ty.display_name(),
        })?;
        let nested = record_ref.resolve();
        if self.in_progress.contains(&nested.type_path) {
            return Err(MappingError::RecursiveRecord {
                record: nested.name,
                field: field.name.clone(),
            });
        }

        let (document, error) = self.record(&nested).into_parts();
        property.properties = document.properties;
        match error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Applies analyzer, case sensitivity, reference-ID and sortability options on top of
/// the property's base type. Conflicting combinations are rejected in that order.
fn apply_options(property: &mut PropertySchema, options: &FieldOptions) -> Result<(), MappingError> {
    property.analyzer = options.analyzer.clone();

    if options.case_sensitive == Some(false) {
        match property.analyzer.as_deref() {
            Some(analyzer) if analyzer != CASE_INSENSITIVE_ANALYZER => {
                return Err(MappingError::invalid_option("case_sensitive", "false"));
            }
            _ => property.analyzer = Some(CASE_INSENSITIVE_ANALYZER.to_string()),
        }
    }

    // a keyword property cannot carry an analyzer
    if options.property_type == Some(PropertyType::Keyword) && property.analyzer.is_some() {
        return Err(MappingError::invalid_option("type", PropertyType::Keyword.as_str()));
    }

    if options.ref_id {
        if let Some(explicit) = options.property_type
            && !matches!(explicit, PropertyType::Keyword | PropertyType::Text)
        {
            return Err(MappingError::invalid_option("type", explicit.as_str()));
        }
        property.property_type = match property.analyzer.as_deref() {
            None => PropertyType::Keyword,
            Some(CASE_INSENSITIVE_ANALYZER) => PropertyType::Text,
            Some(other) => return Err(MappingError::invalid_option("analyzer", other)),
        };
    }

    if options.sortable {
        if property.property_type.is_compound() {
            return Err(MappingError::invalid_option("sortable", ""));
        }
        property.make_sortable();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RecordRef, TypeDescriptor};

    fn text(name: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, TypeDescriptor::Str)
    }

    fn name_record() -> TypeDescriptor {
        TypeDescriptor::Record(RecordRef::lazy("Name", || {
            RecordDescriptor::new(
                "Name",
                vec![
                    text("Title").external("title").options("type=keyword"),
                    text("LastName").external("last_name"),
                ],
            )
        }))
    }

    fn node_record() -> RecordDescriptor {
        RecordDescriptor::new(
            "Node",
            vec![
                text("Label"),
                FieldDescriptor::new(
                    "Children",
                    TypeDescriptor::slice(TypeDescriptor::Record(RecordRef::lazy("Node", node_record))),
                ),
            ],
        )
    }

    fn json(document: &SchemaDocument) -> String {
        serde_json::to_string(document).unwrap()
    }

    #[test]
    fn external_name_strips_modifiers() {
        assert_eq!(external_name(&text("FirstName").external("first_name,omitempty")), Some("first_name"));
        assert_eq!(external_name(&text("FirstName").external(",omitempty")), Some("FirstName"));
        assert_eq!(external_name(&text("FirstName").external("-")), None);
        assert_eq!(external_name(&text("FirstName")), Some("FirstName"));
    }

    #[test]
    fn id_and_omitted_fields_are_skipped() {
        assert!(build_field(&text("ID").options("id")).into_result().unwrap().is_none());
        assert!(build_field(&text("Secret").external("-")).into_result().unwrap().is_none());
    }

    #[test]
    fn id_after_bad_definition_is_still_skipped() {
        let built = build_field(&text("ID").options("foo=bar,id"));
        assert_eq!(built.error(), Some(&MappingError::invalid_option("foo", "bar")));
        assert!(built.value().is_none());
    }

    #[test]
    fn type_option_overrides_inference() {
        let property = build_field(&FieldDescriptor::new("Age", TypeDescriptor::Int64).options("type=date"))
            .into_result()
            .unwrap()
            .unwrap();
        assert_eq!(property.property_type, PropertyType::Date);
        assert_eq!(property.field_name, "Age");
    }

    #[test]
    fn ref_id_without_case_option_is_keyword() {
        let property = build_field(&text("ExternalID").options("ref_id")).into_result().unwrap().unwrap();
        assert_eq!(property.property_type, PropertyType::Keyword);
        assert_eq!(property.analyzer, None);
    }

    #[test]
    fn case_insensitive_ref_id_is_analyzed_text() {
        for tag in ["ref_id,case_sensitive=false", "case_sensitive=false,ref_id"] {
            let property = build_field(&text("ExternalID").options(tag)).into_result().unwrap().unwrap();
            assert_eq!(property.property_type, PropertyType::Text, "{tag}");
            assert_eq!(property.analyzer.as_deref(), Some(CASE_INSENSITIVE_ANALYZER), "{tag}");
        }
    }

    #[test]
    fn case_insensitive_conflicts_with_other_analyzer() {
        let built = build_field(&text("Email").options("analyzer=simple,case_sensitive=false"));
        assert_eq!(built.error(), Some(&MappingError::invalid_option("case_sensitive", "false")));
    }

    #[test]
    fn ref_id_conflicts_with_foreign_analyzer_and_type() {
        let built = build_field(&text("Code").options("ref_id,analyzer=simple"));
        assert_eq!(built.error(), Some(&MappingError::invalid_option("analyzer", "simple")));
        let built = build_field(&text("Code").options("ref_id,type=long"));
        assert_eq!(built.error(), Some(&MappingError::invalid_option("type", "long")));
    }

    #[test]
    fn explicit_keyword_rejects_any_analyzer() {
        for tag in [
            "type=keyword,case_sensitive=false",
            "type=keyword,analyzer=simple",
            "ref_id,type=keyword,case_sensitive=false",
        ] {
            let built = build_field(&text("Code").options(tag));
            assert_eq!(built.error(), Some(&MappingError::invalid_option("type", "keyword")), "{tag}");
        }
    }

    #[test]
    fn sortable_adds_raw_keyword_subfield() {
        let property = build_field(&text("FirstName").options("sortable")).into_result().unwrap().unwrap();
        assert!(property.is_sortable());
        assert_eq!(
            serde_json::to_string(&property).unwrap(),
            r#"{"type":"text","fields":{"raw":{"type":"keyword"}}}"#
        );
    }

    #[test]
    fn sortable_object_is_rejected() {
        let built = build_field(&FieldDescriptor::new("Name", name_record()).options("sortable"));
        assert_eq!(built.error(), Some(&MappingError::invalid_option("sortable", "")));
    }

    #[test]
    fn nested_records_expand_recursively() {
        let record = RecordDescriptor::new(
            "User",
            vec![
                text("Gender").external("gender").options("type=keyword"),
                FieldDescriptor::new("Name", TypeDescriptor::pointer(name_record())).external("name"),
            ],
        );
        let document = build_schema(&record).into_result().unwrap();
        assert_eq!(
            json(&document),
            r#"{"properties":{"gender":{"type":"keyword"},"name":{"type":"object","properties":{"last_name":{"type":"text"},"title":{"type":"keyword"}}}}}"#
        );
    }

    #[test]
    fn object_type_on_non_record_is_malformed() {
        let built = build_field(&text("Blob").options("type=object"));
        assert!(matches!(
            built.error(),
            Some(MappingError::MalformedRecordType { field, .. }) if field == "Blob"
        ));
    }

    #[test]
    fn self_nesting_record_is_detected() {
        let built = build_schema(&node_record());
        assert_eq!(
            built.error(),
            Some(&MappingError::RecursiveRecord {
                record: "Node".to_string(),
                field: "Children".to_string(),
            })
        );
        let children = built.value().get("Children").unwrap();
        assert_eq!(children.property_type, PropertyType::Nested);
        assert!(children.properties.is_empty());
    }

    #[test]
    fn sibling_fields_of_same_record_are_not_cycles() {
        let record = RecordDescriptor::new(
            "Letter",
            vec![
                FieldDescriptor::new("From", name_record()),
                FieldDescriptor::new("To", name_record()),
            ],
        );
        let document = build_schema(&record).into_result().unwrap();
        assert_eq!(document.get("From").unwrap().properties.len(), 2);
        assert_eq!(document.get("To").unwrap().properties.len(), 2);
    }

    #[test]
    fn colliding_external_names_keep_last_field() {
        let record = RecordDescriptor::new(
            "User",
            vec![
                text("Name").external("name"),
                FieldDescriptor::new("Nickname", TypeDescriptor::Int64).external("name"),
            ],
        );
        let document = build_schema(&record).into_result().unwrap();
        let property = document.get("name").unwrap();
        assert_eq!(property.field_name, "Nickname");
        assert_eq!(property.property_type, PropertyType::Long);
    }

    #[test]
    fn invalid_option_keeps_best_effort_document() {
        let record = RecordDescriptor::new(
            "User",
            vec![
                text("FirstName").external("first_name"),
                text("DateOfBirth").external("date").options("foo=date"),
                text("LastName").external("last_name"),
            ],
        );
        let built = build_schema(&record);
        assert_eq!(built.error(), Some(&MappingError::invalid_option("foo", "date")));
        assert_eq!(
            json(built.value()),
            r#"{"properties":{"date":{"type":"text"},"first_name":{"type":"text"},"last_name":{"type":"text"}}}"#
        );
    }
}
