// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed sample inputs with fixed outputs, for deterministic development
//! and integration runs without completion-service calls.

use std::collections::HashMap;
use std::str::FromStr;

use maitre_config::model::ClassifierConfig;
use maitre_core::MaitreError;

use crate::policy::ClassificationDraft;
use crate::schema::SchemaDescription;
use crate::types::{ClassificationSource, Parameters, QueryType};

#[derive(Debug, Clone, PartialEq)]
struct Fixture {
    query_type: QueryType,
    confidence: f64,
    parameters: Parameters,
}

/// Exact-match lookup table of sample queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureSet {
    entries: HashMap<String, Fixture>,
}

impl FixtureSet {
    /// Builds the table when `fixtures_enabled` is set, `None` otherwise.
    pub fn from_config(
        config: &ClassifierConfig,
        schema: &SchemaDescription,
    ) -> Result<Option<Self>, MaitreError> {
        if !config.fixtures_enabled {
            return Ok(None);
        }

        let mut set = Self::default();
        for fixture in &config.fixtures {
            let query_type = QueryType::from_str(&fixture.query_type)
                .ok()
                .filter(|qt| schema.is_supported(*qt))
                .ok_or_else(|| {
                    MaitreError::Config(format!(
                        "fixture for `{}` uses unsupported query type `{}`",
                        fixture.query, fixture.query_type
                    ))
                })?;
            set.insert(
                &fixture.query,
                query_type,
                fixture.confidence,
                fixture.parameters.clone().into_iter().collect(),
            );
        }
        Ok(Some(set))
    }

    /// Adds or replaces a fixture.
    pub fn insert(&mut self, query: &str, query_type: QueryType, confidence: f64, parameters: Parameters) {
        self.entries.insert(
            query.trim().to_string(),
            Fixture {
                query_type,
                confidence,
                parameters,
            },
        );
    }

    /// Looks up `query_text` after trimming surrounding whitespace.
    pub fn lookup(&self, query_text: &str) -> Option<ClassificationDraft> {
        self.entries.get(query_text.trim()).map(|fixture| ClassificationDraft {
            query_type: fixture.query_type,
            confidence: fixture.confidence,
            parameters: fixture.parameters.clone(),
            reasoning: Some("fixture".to_string()),
            source: ClassificationSource::Mock,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maitre_config::model::FixtureConfig;
    use std::collections::BTreeMap;

    fn config(enabled: bool, query_type: &str) -> ClassifierConfig {
        ClassifierConfig {
            fixtures_enabled: enabled,
            fixtures: vec![FixtureConfig {
                query: "show me the menu".into(),
                query_type: query_type.into(),
                confidence: 0.99,
                parameters: BTreeMap::new(),
            }],
            ..ClassifierConfig::default()
        }
    }

    #[test]
    fn disabled_fixtures_build_nothing() {
        let schema = SchemaDescription::restaurant().unwrap();
        assert!(FixtureSet::from_config(&config(false, "menu_inquiry"), &schema).unwrap().is_none());
    }

    #[test]
    fn lookup_is_exact_after_trim() {
        let schema = SchemaDescription::restaurant().unwrap();
        let set = FixtureSet::from_config(&config(true, "menu_inquiry"), &schema)
            .unwrap()
            .unwrap();
        let draft = set.lookup("  show me the menu\n").unwrap();
        assert_eq!(draft.query_type, QueryType::MenuInquiry);
        assert_eq!(draft.source, ClassificationSource::Mock);
        assert!(set.lookup("show me the menu please").is_none());
        assert!(set.lookup("Show me the menu").is_none());
    }

    #[test]
    fn unsupported_fixture_type_is_config_error() {
        let schema = SchemaDescription::restaurant().unwrap();
        let err = FixtureSet::from_config(&config(true, "weather"), &schema).unwrap_err();
        assert!(matches!(err, MaitreError::Config(_)));
    }
}
