//! Index-level analysis settings and the analyzers referenced by a schema.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::options::CASE_INSENSITIVE_ANALYZER;
use crate::schema::{PropertySchema, SchemaDocument};

/// Identifier of the edge n-gram analyzer synthesized for `analyzer=autocomplete`.
pub const AUTOCOMPLETE_ANALYZER: &str = "autocomplete";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub char_filter: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<String>,
}

impl AnalyzerDefinition {
    pub fn custom(tokenizer: impl Into<String>, filter: &[&str]) -> Self {
        Self {
            kind: "custom".to_string(),
            tokenizer: Some(tokenizer.into()),
            char_filter: Vec::new(),
            filter: filter.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_gram: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gram: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub token_chars: Vec<String>,
}

/// The `settings.analysis` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub analyzer: BTreeMap<String, AnalyzerDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tokenizer: BTreeMap<String, TokenizerDefinition>,
}

impl AnalysisSettings {
    pub fn is_empty(&self) -> bool {
        self.analyzer.is_empty() && self.tokenizer.is_empty()
    }
}

/// Analyzer identifiers this crate knows how to define.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownAnalyzer {
    /// Keyword tokenizer + lowercase filter, for case-insensitive reference IDs.
    CaseInsensitive,
    /// Edge n-gram tokenizer + lowercase filter, for prefix matching.
    Autocomplete,
}

impl KnownAnalyzer {
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            CASE_INSENSITIVE_ANALYZER => Some(Self::CaseInsensitive),
            AUTOCOMPLETE_ANALYZER => Some(Self::Autocomplete),
            _ => None,
        }
    }

    pub const fn identifier(self) -> &'static str {
        match self {
            Self::CaseInsensitive => CASE_INSENSITIVE_ANALYZER,
            Self::Autocomplete => AUTOCOMPLETE_ANALYZER,
        }
    }

    /// Adds this analyzer (and any tokenizer it needs) unless the name is already defined.
    fn define(self, analysis: &mut AnalysisSettings) {
        match self {
            Self::CaseInsensitive => {
                analysis
                    .analyzer
                    .entry(self.identifier().to_string())
                    .or_insert_with(|| AnalyzerDefinition::custom("keyword", &["lowercase"]));
            }
            Self::Autocomplete => {
                analysis
                    .tokenizer
                    .entry(AUTOCOMPLETE_ANALYZER.to_string())
                    .or_insert_with(|| TokenizerDefinition {
                        kind: "edge_ngram".to_string(),
                        min_gram: Some(2),
                        max_gram: Some(20),
                        token_chars: vec!["letter".to_string(), "digit".to_string()],
                    });
                analysis
                    .analyzer
                    .entry(self.identifier().to_string())
                    .or_insert_with(|| AnalyzerDefinition::custom(AUTOCOMPLETE_ANALYZER, &["lowercase"]));
            }
        }
    }
}

/// Distinct analyzer identifiers used anywhere in the document, nested properties included.
pub fn collect_analyzers(document: &SchemaDocument) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    collect_from(&document.properties, &mut found);
    found
}

fn collect_from(properties: &BTreeMap<String, PropertySchema>, found: &mut BTreeSet<String>) {
    for property in properties.values() {
        if let Some(analyzer) = property.analyzer.as_deref()
            && !analyzer.is_empty()
        {
            found.insert(analyzer.to_string());
        }
        collect_from(&property.properties, found);
    }
}

/// Defines every known analyzer in `analyzers`, creating the analysis block if needed.
/// Unknown identifiers are left to be configured on the cluster and produce nothing.
pub fn synthesize_analyzers<'a, I>(analyzers: I, analysis: &mut Option<AnalysisSettings>)
where
    I: IntoIterator<Item = &'a str>,
{
    for identifier in analyzers {
        match KnownAnalyzer::from_identifier(identifier) {
            Some(known) => known.define(analysis.get_or_insert_with(AnalysisSettings::default)),
            None => debug!("analyzer {identifier} is not built in; expecting it to exist on the cluster"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PropertyType;

    fn analyzed(analyzer: &str) -> PropertySchema {
        let mut property = PropertySchema::new(PropertyType::Text, "f");
        property.analyzer = Some(analyzer.to_string());
        property
    }

    #[test]
    fn collects_distinct_analyzers_from_nested_properties() {
        let mut name = PropertySchema::new(PropertyType::Object, "Name");
        name.properties.insert("title".to_string(), analyzed("simple"));
        name.properties.insert("code".to_string(), analyzed(CASE_INSENSITIVE_ANALYZER));

        let mut document = SchemaDocument::default();
        document.properties.insert("name".to_string(), name);
        document.properties.insert("email".to_string(), analyzed(CASE_INSENSITIVE_ANALYZER));
        document.properties.insert("age".to_string(), PropertySchema::new(PropertyType::Long, "Age"));

        let found: Vec<_> = collect_analyzers(&document).into_iter().collect();
        assert_eq!(found, vec![CASE_INSENSITIVE_ANALYZER.to_string(), "simple".to_string()]);
    }

    #[test]
    fn case_insensitive_synthesizes_keyword_lowercase() {
        let mut analysis = None;
        synthesize_analyzers([CASE_INSENSITIVE_ANALYZER, "simple"], &mut analysis);
        let analysis = analysis.expect("analysis block created");
        assert_eq!(analysis.analyzer.len(), 1);
        assert_eq!(
            serde_json::to_string(&analysis).unwrap(),
            r#"{"analyzer":{"case_insensitive":{"type":"custom","tokenizer":"keyword","filter":["lowercase"]}}}"#
        );
    }

    #[test]
    fn unknown_analyzers_create_no_block() {
        let mut analysis = None;
        synthesize_analyzers(["simple", "whitespace"], &mut analysis);
        assert!(analysis.is_none());
    }

    #[test]
    fn autocomplete_brings_its_tokenizer() {
        let mut analysis = None;
        synthesize_analyzers([AUTOCOMPLETE_ANALYZER], &mut analysis);
        let analysis = analysis.unwrap();
        let tokenizer = &analysis.tokenizer[AUTOCOMPLETE_ANALYZER];
        assert_eq!(tokenizer.kind, "edge_ngram");
        assert_eq!((tokenizer.min_gram, tokenizer.max_gram), (Some(2), Some(20)));
        assert_eq!(analysis.analyzer[AUTOCOMPLETE_ANALYZER].tokenizer.as_deref(), Some(AUTOCOMPLETE_ANALYZER));
    }

    #[test]
    fn existing_definitions_are_kept() {
        let mut analysis = Some(AnalysisSettings::default());
        if let Some(settings) = analysis.as_mut() {
            settings
                .analyzer
                .insert(CASE_INSENSITIVE_ANALYZER.to_string(), AnalyzerDefinition::custom("standard", &[]));
        }
        synthesize_analyzers([CASE_INSENSITIVE_ANALYZER], &mut analysis);
        let definition = &analysis.unwrap().analyzer[CASE_INSENSITIVE_ANALYZER];
        assert_eq!(definition.tokenizer.as_deref(), Some("standard"));
    }
}
