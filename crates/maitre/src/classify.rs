// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `maitre classify`, `maitre route` and `maitre types`.

use std::path::Path;
use std::sync::Arc;

use maitre_classifier::{
    ClassificationPolicy, ClassifyOptions, ConversationContext, QueryClassifier, RuleClassifier,
    SchemaDescription,
};
use maitre_config::MaitreConfig;
use maitre_core::MaitreError;
use maitre_openai::OpenAiProvider;
use serde::Serialize;

/// Run `maitre classify`.
pub async fn run_classify(
    config: &MaitreConfig,
    text: &str,
    context_path: Option<&Path>,
    no_cache: bool,
    rules_only: bool,
) -> Result<(), MaitreError> {
    let context = context_path.map(read_context).transpose()?;

    let result = if rules_only {
        let schema = Arc::new(SchemaDescription::from_config(&config.schema)?);
        let rules = RuleClassifier::new(schema, ClassificationPolicy::from_config(&config.classifier));
        let previous = context.as_ref().and_then(|c| c.last()).map(|turn| &turn.result);
        rules.classify(text, previous)
    } else {
        let options = if no_cache {
            ClassifyOptions::no_cache()
        } else {
            ClassifyOptions::default()
        };
        build_classifier(config)?
            .classify_query_with(text, context.as_ref(), options)
            .await
    };

    print_json(&result)
}

/// Run `maitre route`.
pub async fn run_route(
    config: &MaitreConfig,
    text: &str,
    context_path: Option<&Path>,
) -> Result<(), MaitreError> {
    let context = context_path.map(read_context).transpose()?;
    let routed = build_classifier(config)?.route(text, context.as_ref()).await;
    print_json(&routed)
}

#[derive(Debug, Serialize)]
struct TypeEntry<'a> {
    query_type: &'a str,
    target_agent: &'a str,
    description: &'a str,
    required_parameters: Vec<&'a str>,
}

/// Run `maitre types`. Needs no completion service.
pub fn run_types(config: &MaitreConfig) -> Result<(), MaitreError> {
    let schema = SchemaDescription::from_config(&config.schema)?;
    let entries: Vec<TypeEntry<'_>> = schema
        .query_types()
        .iter()
        .map(|spec| TypeEntry {
            query_type: spec.query_type.as_str(),
            target_agent: &spec.target_agent,
            description: &spec.description,
            required_parameters: schema.required_parameters(spec.query_type),
        })
        .collect();
    print_json(&entries)
}

pub(crate) fn build_classifier(config: &MaitreConfig) -> Result<QueryClassifier, MaitreError> {
    let provider = OpenAiProvider::new(config)?;
    QueryClassifier::from_config(config, Arc::new(provider))
}

/// Reads a conversation context: a JSON array of turns, oldest first.
fn read_context(path: &Path) -> Result<ConversationContext, MaitreError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        MaitreError::Config(format!("cannot read context file {}: {e}", path.display()))
    })?;
    parse_context(&raw).map_err(|e| {
        MaitreError::Config(format!("invalid context file {}: {e}", path.display()))
    })
}

fn parse_context(raw: &str) -> Result<ConversationContext, serde_json::Error> {
    serde_json::from_str(raw)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), MaitreError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| MaitreError::Internal(format!("failed to render output: {e}")))?;
    println!("{rendered}");
    Ok(())
}
