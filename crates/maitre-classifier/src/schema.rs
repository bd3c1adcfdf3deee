// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema description: supported query types, their parameters, the
//! database tables relevant to extraction and known entity names.
//!
//! Built once from configuration and immutable afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use maitre_config::model::SchemaConfig;
use maitre_core::MaitreError;

use crate::types::{Parameters, QueryType};

/// A parameter a query type may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// One supported query type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTypeSpec {
    pub query_type: QueryType,
    pub description: String,
    pub target_agent: String,
    pub parameters: Vec<ParameterSpec>,
}

/// Validated, immutable schema for one classifier instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescription {
    query_types: Vec<QueryTypeSpec>,
    tables: BTreeMap<String, Vec<String>>,
    entities: BTreeMap<String, Vec<String>>,
}

impl SchemaDescription {
    /// Builds the schema, rejecting unknown, duplicate or missing types.
    pub fn from_config(config: &SchemaConfig) -> Result<Self, MaitreError> {
        if config.query_types.is_empty() {
            return Err(MaitreError::Config(
                "schema must declare at least one query type".into(),
            ));
        }

        let mut seen = BTreeSet::new();
        let mut query_types = Vec::with_capacity(config.query_types.len());
        for entry in &config.query_types {
            let query_type = QueryType::from_str(&entry.name).map_err(|_| {
                MaitreError::Config(format!("unknown query type `{}` in schema", entry.name))
            })?;
            if !seen.insert(query_type) {
                return Err(MaitreError::Config(format!(
                    "query type `{}` declared twice",
                    entry.name
                )));
            }
            if entry.target_agent.trim().is_empty() {
                return Err(MaitreError::Config(format!(
                    "query type `{}` has no target agent",
                    entry.name
                )));
            }
            query_types.push(QueryTypeSpec {
                query_type,
                description: entry.description.clone(),
                target_agent: entry.target_agent.clone(),
                parameters: entry
                    .parameters
                    .iter()
                    .map(|p| ParameterSpec {
                        name: p.name.clone(),
                        description: p.description.clone(),
                        required: p.required,
                    })
                    .collect(),
            });
        }

        if !seen.contains(&QueryType::General) {
            return Err(MaitreError::Config(
                "schema must include the `general` query type".into(),
            ));
        }

        let entities = config
            .entities
            .iter()
            .map(|(name, values)| {
                let values = values
                    .iter()
                    .map(|v| v.trim().to_lowercase())
                    .filter(|v| !v.is_empty())
                    .collect();
                (name.clone(), values)
            })
            .collect();

        Ok(Self {
            query_types,
            tables: config.tables.clone(),
            entities,
        })
    }

    /// The built-in restaurant schema.
    pub fn restaurant() -> Result<Self, MaitreError> {
        Self::from_config(&SchemaConfig::default())
    }

    /// Declared query types, in declaration order.
    pub fn query_types(&self) -> &[QueryTypeSpec] {
        &self.query_types
    }

    pub fn supported_types(&self) -> BTreeSet<QueryType> {
        self.query_types.iter().map(|q| q.query_type).collect()
    }

    pub fn is_supported(&self, query_type: QueryType) -> bool {
        self.spec(query_type).is_some()
    }

    pub fn spec(&self, query_type: QueryType) -> Option<&QueryTypeSpec> {
        self.query_types.iter().find(|q| q.query_type == query_type)
    }

    /// Names of the required parameters of `query_type`.
    pub fn required_parameters(&self, query_type: QueryType) -> Vec<&str> {
        self.spec(query_type)
            .map(|spec| {
                spec.parameters
                    .iter()
                    .filter(|p| p.required)
                    .map(|p| p.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Required parameters of `query_type` that `parameters` lacks.
    ///
    /// Null values and blank strings count as absent.
    pub fn missing_required(&self, query_type: QueryType, parameters: &Parameters) -> Vec<String> {
        self.required_parameters(query_type)
            .into_iter()
            .filter(|name| !has_value(parameters.get(*name)))
            .map(str::to_string)
            .collect()
    }

    pub fn target_agent(&self, query_type: QueryType) -> Option<&str> {
        self.spec(query_type).map(|q| q.target_agent.as_str())
    }

    pub fn agent_mapping(&self) -> BTreeMap<QueryType, String> {
        self.query_types
            .iter()
            .map(|q| (q.query_type, q.target_agent.clone()))
            .collect()
    }

    pub fn tables(&self) -> &BTreeMap<String, Vec<String>> {
        &self.tables
    }

    /// Known entity values for `kind` (e.g. `item_name`), lowercased.
    pub fn entity_values(&self, kind: &str) -> &[String] {
        self.entities.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entities(&self) -> &BTreeMap<String, Vec<String>> {
        &self.entities
    }
}

fn has_value(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maitre_config::model::QueryTypeConfig;

    fn general_only() -> SchemaConfig {
        SchemaConfig {
            query_types: vec![QueryTypeConfig {
                name: "general".into(),
                description: "anything".into(),
                target_agent: "concierge".into(),
                parameters: vec![],
            }],
            tables: BTreeMap::new(),
            entities: BTreeMap::new(),
        }
    }

    #[test]
    fn restaurant_schema_supports_all_types() {
        let schema = SchemaDescription::restaurant().unwrap();
        assert_eq!(schema.supported_types().len(), 7);
        assert_eq!(schema.required_parameters(QueryType::PriceUpdate), vec!["item_name", "new_price"]);
        assert_eq!(schema.required_parameters(QueryType::OrderHistory), vec!["date_range"]);
        assert!(schema.required_parameters(QueryType::General).is_empty());
        assert_eq!(schema.target_agent(QueryType::General), Some("menu-qa-agent"));
        assert_eq!(schema.target_agent(QueryType::Correction), Some("orchestrator"));
        assert_eq!(schema.tables().len(), 9);
    }

    #[test]
    fn missing_required_treats_blank_as_absent() {
        let schema = SchemaDescription::restaurant().unwrap();
        let mut params = Parameters::new();
        params.insert("item_name".into(), serde_json::json!("  "));
        params.insert("new_price".into(), serde_json::json!(4.5));
        assert_eq!(
            schema.missing_required(QueryType::PriceUpdate, &params),
            vec!["item_name".to_string()]
        );
        params.insert("item_name".into(), serde_json::json!("fries"));
        assert!(schema.missing_required(QueryType::PriceUpdate, &params).is_empty());
    }

    #[test]
    fn empty_schema_is_config_error() {
        let config = SchemaConfig {
            query_types: vec![],
            ..general_only()
        };
        let err = SchemaDescription::from_config(&config).unwrap_err();
        assert!(matches!(err, MaitreError::Config(_)));
    }

    #[test]
    fn unknown_type_is_config_error() {
        let mut config = general_only();
        config.query_types.push(QueryTypeConfig {
            name: "weather".into(),
            description: "forecast".into(),
            target_agent: "sky".into(),
            parameters: vec![],
        });
        let err = SchemaDescription::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("weather"));
    }

    #[test]
    fn general_is_mandatory() {
        let mut config = general_only();
        config.query_types[0].name = "menu_inquiry".into();
        let err = SchemaDescription::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("general"));
    }

    #[test]
    fn entities_are_lowercased() {
        let mut config = general_only();
        config
            .entities
            .insert("item_name".into(), vec!["Burger".into(), " ".into()]);
        let schema = SchemaDescription::from_config(&config).unwrap();
        assert_eq!(schema.entity_values("item_name"), ["burger".to_string()]);
        assert!(schema.entity_values("category").is_empty());
    }
}
