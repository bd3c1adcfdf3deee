// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express:
//! numeric ranges, non-empty lists, and references between the schema and
//! the fixture table.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::{KNOWN_QUERY_TYPES, MaitreConfig};

/// Confidence assigned to rule-based results that matched nothing.
pub const MIN_FALLBACK_CONFIDENCE: f64 = 0.2;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MaitreConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    let classifier = &config.classifier;
    // Fallback results carry confidence 0.2 and must always ask for clarification.
    if !(classifier.confidence_threshold > MIN_FALLBACK_CONFIDENCE
        && classifier.confidence_threshold <= 1.0)
    {
        invalid(format!(
            "classifier.confidence_threshold must be above {MIN_FALLBACK_CONFIDENCE} and at most 1.0, got {}",
            classifier.confidence_threshold
        ));
    }
    if !(0.0..=1.0).contains(&classifier.missing_parameter_penalty) {
        invalid(format!(
            "classifier.missing_parameter_penalty must be within 0.0-1.0, got {}",
            classifier.missing_parameter_penalty
        ));
    }
    if classifier.context_window == 0 {
        invalid("classifier.context_window must be at least 1".to_string());
    }
    if classifier.cache_ttl_secs == Some(0) {
        invalid("classifier.cache_ttl_secs must be positive when set".to_string());
    }

    let openai = &config.openai;
    if openai.model.trim().is_empty() {
        invalid("openai.model must not be empty".to_string());
    }
    if openai.base_url.trim().is_empty() {
        invalid("openai.base_url must not be empty".to_string());
    }
    if !(0.0..=2.0).contains(&openai.temperature) {
        invalid(format!(
            "openai.temperature must be within 0.0-2.0, got {}",
            openai.temperature
        ));
    }
    if openai.max_tokens == 0 {
        invalid("openai.max_tokens must be positive".to_string());
    }
    if openai.timeout_secs == 0 {
        invalid("openai.timeout_secs must be positive".to_string());
    }

    // Schema: non-empty, unique, known tags, `general` present.
    let schema = &config.schema;
    if schema.query_types.is_empty() {
        invalid("schema.query_types must list at least one query type".to_string());
    }
    let mut seen = HashSet::new();
    for (i, qt) in schema.query_types.iter().enumerate() {
        if !KNOWN_QUERY_TYPES.contains(&qt.name.as_str()) {
            invalid(format!(
                "schema.query_types[{i}].name `{}` is not a known query type (expected one of: {})",
                qt.name,
                KNOWN_QUERY_TYPES.join(", ")
            ));
        }
        if !seen.insert(qt.name.as_str()) {
            invalid(format!("duplicate query type `{}` in schema.query_types", qt.name));
        }
        if qt.target_agent.trim().is_empty() {
            invalid(format!("schema.query_types[{i}].target_agent must not be empty"));
        }
        let mut params = HashSet::new();
        for p in &qt.parameters {
            if !params.insert(p.name.as_str()) {
                invalid(format!(
                    "duplicate parameter `{}` in query type `{}`",
                    p.name, qt.name
                ));
            }
        }
    }
    if !schema.query_types.is_empty() && !seen.contains("general") {
        invalid("schema.query_types must include `general`".to_string());
    }

    for (i, fixture) in classifier.fixtures.iter().enumerate() {
        if !seen.contains(fixture.query_type.as_str()) {
            invalid(format!(
                "classifier.fixtures[{i}].query_type `{}` is not a supported query type",
                fixture.query_type
            ));
        }
        if !(0.0..=1.0).contains(&fixture.confidence) {
            invalid(format!(
                "classifier.fixtures[{i}].confidence must be within 0.0-1.0, got {}",
                fixture.confidence
            ));
        }
        if fixture.query.trim().is_empty() {
            invalid(format!("classifier.fixtures[{i}].query must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
