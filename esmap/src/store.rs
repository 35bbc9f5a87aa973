//! Index lifecycle against a search service.
//!
//! The service itself sits behind [`IndexClient`]; this module only decides what to send.

use log::{debug, info, warn};

use crate::errors::StoreError;
use crate::index::{IndexDefinition, IndexSettings};
use crate::registry;
use crate::types::RecordMetadata;

/// The subset of a search service client needed to create indices.
#[allow(async_fn_in_trait)]
pub trait IndexClient {
    async fn index_exists(&self, index: &str) -> Result<bool, StoreError>;

    /// Creates `index` with the JSON `body`. Returns the service's acknowledgement flag.
    async fn create_index(&self, index: &str, body: &str) -> Result<bool, StoreError>;

    async fn refresh(&self, index: &str) -> Result<(), StoreError>;
}

/// Creates `index` from `definition` unless it already exists. Returns `true` when the
/// index was created by this call.
pub async fn ensure_index_exists<C>(client: &C, index: &str, definition: &IndexDefinition) -> Result<bool, StoreError>
where
    C: IndexClient + ?Sized,
{
    if index.is_empty() {
        return Err(StoreError::MissingIndexName);
    }
    if client.index_exists(index).await? {
        debug!("index {index} already exists");
        return Ok(false);
    }

    let body = definition.to_json()?;
    if !client.create_index(index, &body).await? {
        return Err(StoreError::NotAcknowledged {
            index: index.to_string(),
            body,
        });
    }
    info!("created index {index}");

    if let Err(err) = client.refresh(index).await {
        warn!("refreshing index {index} after creation failed: {err}");
    }
    Ok(true)
}

/// Ensures the default index for `T` (see [`RecordMetadata::index_name`]) exists, with `T`'s
/// mapping on top of `settings`. A record whose schema cannot be built is rejected before
/// anything is sent.
pub async fn ensure_record_index<T, C>(client: &C, settings: &IndexSettings) -> Result<bool, StoreError>
where
    T: RecordMetadata,
    C: IndexClient + ?Sized,
{
    let definition = IndexDefinition::builder()
        .settings(settings.clone())
        .mapping_for::<T>()
        .build()
        .into_result()?;
    ensure_index_exists(client, &T::index_name(), &definition).await
}

/// Ensures an index exists for every registered record. Stops at the first failure and
/// returns the names of the indices created before it.
pub async fn ensure_registered_indices<C>(client: &C, settings: &IndexSettings) -> Result<Vec<String>, StoreError>
where
    C: IndexClient + ?Sized,
{
    let mut created = Vec::new();
    for (index, definition) in registry::index_definitions(settings) {
        let definition = definition.into_result()?;
        if ensure_index_exists(client, &index, &definition).await? {
            created.push(index);
        }
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;
    use crate::errors::MappingError;
    use crate::registry::RecordRegistration;
    use crate::types::{FieldDescriptor, RecordDescriptor, TypeDescriptor};

    #[derive(Default)]
    struct MemoryClient {
        indices: Mutex<BTreeMap<String, String>>,
        refreshed: Mutex<Vec<String>>,
        reject_creates: bool,
    }

    impl IndexClient for MemoryClient {
        async fn index_exists(&self, index: &str) -> Result<bool, StoreError> {
            Ok(self.indices.lock().unwrap().contains_key(index))
        }

        async fn create_index(&self, index: &str, body: &str) -> Result<bool, StoreError> {
            if self.reject_creates {
                return Ok(false);
            }
            self.indices.lock().unwrap().insert(index.to_string(), body.to_string());
            Ok(true)
        }

        async fn refresh(&self, index: &str) -> Result<(), StoreError> {
            self.refreshed.lock().unwrap().push(index.to_string());
            Ok(())
        }
    }

    struct UserProfile;

    impl RecordMetadata for UserProfile {
        fn record_name() -> &'static str {
            "UserProfile"
        }

        fn record_descriptor() -> RecordDescriptor {
            RecordDescriptor::new(
                "UserProfile",
                vec![
                    FieldDescriptor::new("Name", TypeDescriptor::Str).external("name"),
                    FieldDescriptor::new("DateOfBirth", TypeDescriptor::Str)
                        .external("date")
                        .options("type=date"),
                ],
            )
        }
    }

    struct AuditEntry;

    fn audit_entry_descriptor() -> RecordDescriptor {
        RecordDescriptor::new(
            "AuditEntry",
            vec![FieldDescriptor::new("Actor", TypeDescriptor::Str).external("actor").options("ref_id")],
        )
    }

    struct Event;

    fn event_descriptor() -> RecordDescriptor {
        RecordDescriptor::new("Event", vec![FieldDescriptor::new("At", TypeDescriptor::DateTime)])
    }

    inventory::submit! {
        RecordRegistration {
            type_name: "AuditEntry",
            type_path: concat!(module_path!(), "::AuditEntry"),
            type_id: std::any::TypeId::of::<AuditEntry>,
            descriptor_fn: audit_entry_descriptor,
        }
    }

    inventory::submit! {
        RecordRegistration {
            type_name: "Event",
            type_path: concat!(module_path!(), "::Event"),
            type_id: std::any::TypeId::of::<Event>,
            descriptor_fn: event_descriptor,
        }
    }

    struct Broken;

    impl RecordMetadata for Broken {
        fn record_name() -> &'static str {
            "Broken"
        }

        fn record_descriptor() -> RecordDescriptor {
            RecordDescriptor::new("Broken", vec![FieldDescriptor::new("Name", TypeDescriptor::Str).options("foo=bar")])
        }
    }

    #[tokio::test]
    async fn creates_missing_index_and_refreshes() {
        let client = MemoryClient::default();
        let created = ensure_record_index::<UserProfile, _>(&client, &IndexSettings::default())
            .await
            .unwrap();
        assert!(created);

        let indices = client.indices.lock().unwrap();
        assert_eq!(
            indices["user_profiles"],
            r#"{"mappings":{"user_profile":{"properties":{"date":{"type":"date"},"name":{"type":"text"}}}}}"#
        );
        assert_eq!(*client.refreshed.lock().unwrap(), vec!["user_profiles".to_string()]);
    }

    #[tokio::test]
    async fn existing_index_is_left_alone() {
        let client = MemoryClient::default();
        client
            .indices
            .lock()
            .unwrap()
            .insert("user_profiles".to_string(), "{}".to_string());

        let created = ensure_record_index::<UserProfile, _>(&client, &IndexSettings::default())
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(client.indices.lock().unwrap()["user_profiles"], "{}");
        assert!(client.refreshed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unacknowledged_create_reports_body() {
        let client = MemoryClient {
            reject_creates: true,
            ..MemoryClient::default()
        };
        let err = ensure_index_exists(&client, "users", &IndexDefinition::default())
            .await
            .unwrap_err();
        match err {
            StoreError::NotAcknowledged { index, body } => {
                assert_eq!(index, "users");
                assert_eq!(body, "{}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_index_name_is_rejected() {
        let client = MemoryClient::default();
        let err = ensure_index_exists(&client, "", &IndexDefinition::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingIndexName));
    }

    #[tokio::test]
    async fn schema_errors_stop_before_creation() {
        let client = MemoryClient::default();
        let err = ensure_record_index::<Broken, _>(&client, &IndexSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Mapping(MappingError::InvalidOption { .. })));
        assert!(client.indices.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn registered_records_get_indices() {
        let client = MemoryClient::default();
        client
            .indices
            .lock()
            .unwrap()
            .insert("events".to_string(), "{}".to_string());
        let created = ensure_registered_indices(&client, &IndexSettings::default()).await.unwrap();
        assert!(created.contains(&"audit_entries".to_string()));
        assert!(!created.contains(&"events".to_string()));
        assert_eq!(
            client.indices.lock().unwrap()["audit_entries"],
            r#"{"mappings":{"audit_entry":{"properties":{"actor":{"type":"keyword"}}}}}"#
        );
    }

    #[tokio::test]
    async fn settings_are_carried_into_the_body() {
        let client = MemoryClient::default();
        let settings = IndexSettings {
            number_of_shards: 2,
            ..IndexSettings::default()
        };
        ensure_record_index::<UserProfile, _>(&client, &settings).await.unwrap();
        assert!(client.indices.lock().unwrap()["user_profiles"].starts_with(r#"{"settings":{"number_of_shards":2}"#));
    }
}
