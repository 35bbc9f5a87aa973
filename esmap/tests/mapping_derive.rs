#![allow(non_snake_case, dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use esmap::{
    FieldDescriptor, MappingError, RecordDescriptor, RecordMetadata, SchemaDocument, SearchRecord, TypeDescriptor,
    build_schema, find_record, is_record_registered, resolve_field_path, resolve_sort_path,
};
use serde::Serialize;

fn schema_json<T: RecordMetadata>() -> String {
    let schema = T::schema().into_result().unwrap();
    serde_json::to_string(&schema).unwrap()
}

#[derive(SearchRecord)]
struct PlainUser {
    FirstName: String,
    LastName: String,
}

#[test]
fn struct_without_attributes_uses_field_names() {
    assert_eq!(
        schema_json::<PlainUser>(),
        r#"{"properties":{"FirstName":{"type":"text"},"LastName":{"type":"text"}}}"#
    );
}

#[derive(SearchRecord)]
struct RenamedUser {
    #[esmap(rename = "first_name")]
    FirstName: String,
    #[esmap(rename = "last_name")]
    LastName: String,
}

#[test]
fn renamed_fields_use_external_names() {
    assert_eq!(
        schema_json::<RenamedUser>(),
        r#"{"properties":{"first_name":{"type":"text"},"last_name":{"type":"text"}}}"#
    );
}

#[derive(SearchRecord, Serialize)]
struct SerdeRenamedUser {
    #[serde(rename = "first_name")]
    FirstName: String,
    #[serde(rename = "last_name")]
    LastName: String,
    #[serde(rename = "date")]
    #[esmap(type = "date")]
    DateOfBirth: String,
}

#[test]
fn serde_rename_and_type_override() {
    assert_eq!(
        schema_json::<SerdeRenamedUser>(),
        r#"{"properties":{"date":{"type":"date"},"first_name":{"type":"text"},"last_name":{"type":"text"}}}"#
    );
}

#[derive(SearchRecord)]
struct InvalidOptionUser {
    #[esmap(rename = "first_name")]
    FirstName: String,
    #[esmap(rename = "last_name")]
    LastName: String,
    #[esmap(rename = "date", foo = "date")]
    DateOfBirth: String,
}

#[test]
fn invalid_option_reports_error_with_best_effort_schema() {
    let built = InvalidOptionUser::schema();
    assert_eq!(built.error(), Some(&MappingError::invalid_option("foo", "date")));
    assert_eq!(
        built.error().map(ToString::to_string).as_deref(),
        Some("invalid mapping option foo=date")
    );
    assert_eq!(
        serde_json::to_string(built.value()).unwrap(),
        r#"{"properties":{"date":{"type":"text"},"first_name":{"type":"text"},"last_name":{"type":"text"}}}"#
    );
    assert!(InvalidOptionUser::schema().into_result().is_err());
}

#[derive(SearchRecord)]
struct AnalyzedUser {
    #[esmap(rename = "first_name")]
    FirstName: String,
    #[esmap(rename = "last_name", analyzer = "simple")]
    LastName: String,
}

#[test]
fn analyzer_option_is_serialized() {
    assert_eq!(
        schema_json::<AnalyzedUser>(),
        r#"{"properties":{"first_name":{"type":"text"},"last_name":{"type":"text","analyzer":"simple"}}}"#
    );
}

#[test]
fn external_tag_modifiers_are_ignored() {
    let record = RecordDescriptor::new(
        "User",
        vec![
            FieldDescriptor::new("FirstName", TypeDescriptor::Str).external("first_name,omitempty"),
            FieldDescriptor::new("LastName", TypeDescriptor::Str).external("last_name"),
        ],
    );
    let schema = build_schema(&record).into_result().unwrap();
    assert_eq!(
        serde_json::to_string(&schema).unwrap(),
        r#"{"properties":{"first_name":{"type":"text"},"last_name":{"type":"text"}}}"#
    );
}

#[derive(SearchRecord)]
struct DatedUser {
    #[esmap(rename = "first_name")]
    FirstName: String,
    #[esmap(rename = "date", analyzer = "simple", type = "date")]
    DateOfBirth: Option<DateTime<Utc>>,
}

#[test]
fn multiple_options_combine() {
    assert_eq!(
        schema_json::<DatedUser>(),
        r#"{"properties":{"date":{"type":"date","analyzer":"simple"},"first_name":{"type":"text"}}}"#
    );
}

#[derive(SearchRecord)]
struct UnconfiguredDateUser {
    #[esmap(rename = "first_name")]
    FirstName: String,
    #[esmap(rename = "date", analyzer = "simple")]
    DateOfBirth: Option<DateTime<Utc>>,
}

#[test]
fn optional_datetime_infers_date() {
    assert_eq!(
        schema_json::<UnconfiguredDateUser>(),
        r#"{"properties":{"date":{"type":"date","analyzer":"simple"},"first_name":{"type":"text"}}}"#
    );
}

#[derive(SearchRecord)]
struct IdentifiedUser {
    #[esmap(id)]
    ID: String,
    #[esmap(rename = "first_name")]
    FirstName: String,
}

#[test]
fn id_field_is_not_mapped() {
    assert_eq!(
        schema_json::<IdentifiedUser>(),
        r#"{"properties":{"first_name":{"type":"text"}}}"#
    );
}

#[derive(SearchRecord)]
struct Name {
    #[esmap(rename = "title", type = "keyword")]
    Title: String,
    #[esmap(rename = "last_name")]
    LastName: String,
}

#[derive(SearchRecord)]
struct NestedUser {
    #[esmap(rename = "gender", type = "keyword")]
    Gender: String,
    #[esmap(rename = "name")]
    Name: Name,
}

#[derive(SearchRecord)]
struct BoxedNameUser {
    #[esmap(rename = "gender", type = "keyword")]
    Gender: String,
    #[esmap(rename = "name")]
    Name: Option<Box<Name>>,
}

const NESTED_NAME_JSON: &str = concat!(
    r#"{"properties":{"gender":{"type":"keyword"},"#,
    r#""name":{"type":"object","properties":{"last_name":{"type":"text"},"title":{"type":"keyword"}}}}}"#
);

#[test]
fn embedded_record_becomes_object() {
    assert_eq!(schema_json::<NestedUser>(), NESTED_NAME_JSON);
}

#[test]
fn pointer_to_record_becomes_object() {
    assert_eq!(schema_json::<BoxedNameUser>(), NESTED_NAME_JSON);
}

#[derive(SearchRecord, Serialize)]
struct PartlyHiddenUser {
    #[serde(skip)]
    FirstName: String,
    #[serde(rename = "last_name")]
    LastName: String,
    #[esmap(skip)]
    Internal: String,
}

#[test]
fn skipped_fields_are_not_mapped() {
    assert_eq!(
        schema_json::<PartlyHiddenUser>(),
        r#"{"properties":{"last_name":{"type":"text"}}}"#
    );
}

#[derive(SearchRecord)]
struct Coffee {
    #[esmap(rename = "brand", type = "keyword")]
    Brand: String,
}

#[derive(SearchRecord)]
struct CoffeeDrinker {
    #[esmap(rename = "first_name")]
    FirstName: String,
    #[esmap(rename = "coffees")]
    Coffees: Vec<Coffee>,
}

#[test]
fn slice_of_records_becomes_nested() {
    assert_eq!(
        schema_json::<CoffeeDrinker>(),
        r#"{"properties":{"coffees":{"type":"nested","properties":{"brand":{"type":"keyword"}}},"first_name":{"type":"text"}}}"#
    );
}

#[derive(SearchRecord)]
struct Scalars {
    flag: bool,
    tiny: i8,
    small: i16,
    medium: i32,
    large: i64,
    ratio: f32,
    precise: f64,
    label: String,
    tags: Vec<String>,
    scores: Vec<i64>,
    born: NaiveDate,
}

#[test]
fn primitive_fields_infer_engine_types() {
    assert_eq!(
        schema_json::<Scalars>(),
        concat!(
            r#"{"properties":{"born":{"type":"date"},"flag":{"type":"boolean"},"label":{"type":"text"},"#,
            r#""large":{"type":"long"},"medium":{"type":"integer"},"precise":{"type":"double"},"#,
            r#""ratio":{"type":"float"},"scores":{"type":"long"},"small":{"type":"short"},"#,
            r#""tags":{"type":"text"},"tiny":{"type":"byte"}}}"#
        )
    );
}

#[derive(SearchRecord)]
struct Account {
    #[esmap(sortable)]
    nick: String,
    #[esmap(ref_id)]
    external_id: String,
    #[esmap(ref_id, case_sensitive = false)]
    email: String,
    #[esmap(case_sensitive = true)]
    motto: String,
}

#[test]
fn sortable_and_reference_id_options() {
    assert_eq!(
        schema_json::<Account>(),
        concat!(
            r#"{"properties":{"email":{"type":"text","analyzer":"case_insensitive"},"#,
            r#""external_id":{"type":"keyword"},"#,
            r#""motto":{"type":"text"},"#,
            r#""nick":{"type":"text","fields":{"raw":{"type":"keyword"}}}}}"#
        )
    );
}

#[derive(SearchRecord)]
struct ConflictingAnalyzer {
    #[esmap(analyzer = "simple", case_sensitive = false)]
    email: String,
}

#[test]
fn case_insensitive_conflicts_with_explicit_analyzer() {
    let built = ConflictingAnalyzer::schema();
    assert!(matches!(
        built.error(),
        Some(MappingError::InvalidOption { key, value }) if key == "case_sensitive" && value == "false"
    ));
}

#[derive(SearchRecord)]
struct Node {
    label: String,
    children: Vec<Node>,
}

#[test]
fn self_nesting_record_is_an_error() {
    let built = Node::schema();
    assert_eq!(
        built.error(),
        Some(&MappingError::RecursiveRecord {
            record: "Node".to_string(),
            field: "children".to_string(),
        })
    );
    assert_eq!(
        serde_json::to_string(built.value()).unwrap(),
        r#"{"properties":{"children":{"type":"nested"},"label":{"type":"text"}}}"#
    );
}

#[derive(SearchRecord)]
struct Page<T> {
    total: u32,
    items: Vec<T>,
}

#[test]
fn generic_record_describes_its_parameter() {
    assert_eq!(
        schema_json::<Page<Coffee>>(),
        r#"{"properties":{"items":{"type":"nested","properties":{"brand":{"type":"keyword"}}},"total":{"type":"long"}}}"#
    );
    assert!(!is_record_registered::<Page<Coffee>>());
}

#[test]
fn derived_records_are_registered() {
    assert!(is_record_registered::<NestedUser>());
    let registration = find_record("CoffeeDrinker").unwrap();
    assert_eq!(registration.index_name(), "coffee_drinkers");
    assert_eq!(registration.mapping_type_name(), "coffee_drinker");
    assert!(registration.type_path.ends_with("::CoffeeDrinker"));
    assert_eq!(registration.descriptor().fields.len(), 2);
}

#[test]
fn names_follow_the_record_name() {
    assert_eq!(CoffeeDrinker::type_name(), "coffee_drinker");
    assert_eq!(CoffeeDrinker::index_name(), "coffee_drinkers");
}

#[test]
fn logical_paths_resolve_through_nested_records() {
    let schema = NestedUser::schema().into_result().unwrap();
    assert_eq!(resolve_field_path(&schema, "Name.Title").unwrap(), "name.title");
    assert_eq!(resolve_field_path(&schema, "Gender").unwrap(), "gender");
    assert_eq!(
        resolve_field_path(&schema, "Address.City"),
        Err(MappingError::unresolved("Address", "Address.City"))
    );

    let accounts = Account::schema().into_result().unwrap();
    assert_eq!(resolve_sort_path(&accounts, "nick").unwrap(), "nick.raw");
    assert_eq!(resolve_sort_path(&accounts, "email").unwrap(), "email");
}

#[test]
fn serialization_is_stable_through_generic_json() {
    let schema: SchemaDocument = CoffeeDrinker::schema().into_result().unwrap();
    let first = serde_json::to_string(&schema).unwrap();
    let generic: serde_json::Value = serde_json::from_str(&first).unwrap();
    let second = serde_json::to_string(&generic).unwrap();
    assert_eq!(first, second);
}

#[derive(SearchRecord, Serialize)]
struct Person {
    FirstName: String,
    #[serde(rename = "last_name")]
    #[esmap(analyzer = "simple")]
    LastName: String,
}

#[test]
fn end_to_end_record_schema() {
    assert_eq!(
        schema_json::<Person>(),
        r#"{"properties":{"FirstName":{"type":"text"},"last_name":{"type":"text","analyzer":"simple"}}}"#
    );
}
