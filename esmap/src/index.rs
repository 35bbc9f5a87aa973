//! Index creation bodies: settings, analysis and per-type mappings.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisSettings, AnalyzerDefinition, TokenizerDefinition, collect_analyzers, synthesize_analyzers};
use crate::errors::{MappingError, Partial};
use crate::schema::SchemaDocument;
use crate::types::RecordMetadata;

fn is_zero(value: &u32) -> bool {
    *value == 0
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSettings {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub number_of_shards: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub number_of_replicas: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisSettings>,
}

impl IndexSettings {
    pub fn is_empty(&self) -> bool {
        self.number_of_shards == 0 && self.number_of_replicas == 0 && self.analysis.is_none()
    }
}

/// Body sent to the search service when creating an index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<IndexSettings>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mappings: BTreeMap<String, SchemaDocument>,
}

impl IndexDefinition {
    pub fn builder() -> IndexDefinitionBuilder {
        IndexDefinitionBuilder::default()
    }

    /// Definition holding only `T`'s mapping, under its default type name.
    pub fn for_record<T: RecordMetadata>() -> Partial<IndexDefinition> {
        Self::builder().mapping_for::<T>().build()
    }

    pub fn analysis(&self) -> Option<&AnalysisSettings> {
        self.settings.as_ref().and_then(|settings| settings.analysis.as_ref())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Incrementally assembles an [`IndexDefinition`].
///
/// ```ignore
/// let definition = IndexDefinition::builder()
///     .number_of_shards(1)
///     .mapping_for::<User>()
///     .build()
///     .into_result()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct IndexDefinitionBuilder {
    settings: IndexSettings,
    mappings: BTreeMap<String, SchemaDocument>,
    error: Option<MappingError>,
}

impl IndexDefinitionBuilder {
    /// Starts from existing settings, e.g. shard counts read from configuration.
    pub fn settings(mut self, settings: IndexSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn number_of_shards(mut self, shards: u32) -> Self {
        self.settings.number_of_shards = shards;
        self
    }

    pub fn number_of_replicas(mut self, replicas: u32) -> Self {
        self.settings.number_of_replicas = replicas;
        self
    }

    /// Registers an analyzer definition. Registered definitions are never replaced by the
    /// ones synthesized for known identifiers.
    pub fn analyzer(mut self, name: impl Into<String>, definition: AnalyzerDefinition) -> Self {
        self.analysis_mut().analyzer.insert(name.into(), definition);
        self
    }

    pub fn tokenizer(mut self, name: impl Into<String>, definition: TokenizerDefinition) -> Self {
        self.analysis_mut().tokenizer.insert(name.into(), definition);
        self
    }

    pub fn mapping(mut self, type_name: impl Into<String>, schema: SchemaDocument) -> Self {
        self.mappings.insert(type_name.into(), schema);
        self
    }

    /// Adds `T`'s schema under its default type name. A schema error is kept and reported
    /// by [`build`](Self::build); the best-effort schema is still added.
    pub fn mapping_for<T: RecordMetadata>(mut self) -> Self {
        let (schema, error) = T::schema().into_parts();
        if self.error.is_none() {
            self.error = error;
        }
        self.mapping(T::type_name(), schema)
    }

    pub fn build(self) -> Partial<IndexDefinition> {
        let IndexDefinitionBuilder {
            mut settings,
            mappings,
            error,
        } = self;

        let mut analyzers = BTreeSet::new();
        for schema in mappings.values() {
            analyzers.extend(collect_analyzers(schema));
        }
        synthesize_analyzers(analyzers.iter().map(String::as_str), &mut settings.analysis);

        let definition = IndexDefinition {
            settings: (!settings.is_empty()).then_some(settings),
            mappings,
        };
        Partial::with_error(definition, error)
    }

    fn analysis_mut(&mut self) -> &mut AnalysisSettings {
        self.settings.analysis.get_or_insert_with(AnalysisSettings::default)
    }
}
