// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Confidence adjustment and clarification policy.
//!
//! Every path (model answer, rules, fixtures, guard) turns its raw
//! classification into a [`ClassificationResult`] through
//! [`ClassificationPolicy::finalize`]. `needs_clarification` is therefore
//! always a function of the final confidence and the parameter set.

use maitre_config::model::ClassifierConfig;

use crate::schema::SchemaDescription;
use crate::types::{ClassificationResult, ClassificationSource, Parameters, QueryType};

/// A classification before confidence adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationDraft {
    pub query_type: QueryType,
    /// Unadjusted confidence. Out-of-range values are clamped.
    pub confidence: f64,
    pub parameters: Parameters,
    pub reasoning: Option<String>,
    pub source: ClassificationSource,
}

/// Threshold and per-parameter penalty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationPolicy {
    confidence_threshold: f64,
    missing_parameter_penalty: f64,
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}

impl ClassificationPolicy {
    pub fn new(confidence_threshold: f64, missing_parameter_penalty: f64) -> Self {
        Self {
            confidence_threshold,
            missing_parameter_penalty,
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.confidence_threshold, config.missing_parameter_penalty)
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    /// Applies the missing-parameter penalty and derives clarification state.
    pub fn finalize(&self, schema: &SchemaDescription, draft: ClassificationDraft) -> ClassificationResult {
        let missing = schema.missing_required(draft.query_type, &draft.parameters);

        let base = if draft.confidence.is_finite() {
            draft.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let confidence =
            (base - self.missing_parameter_penalty * missing.len() as f64).clamp(0.0, 1.0);

        let needs_clarification = confidence < self.confidence_threshold || !missing.is_empty();
        let clarification_question =
            needs_clarification.then(|| clarification_question(draft.query_type, &missing));

        ClassificationResult {
            query_type: draft.query_type,
            confidence,
            parameters: draft.parameters,
            needs_clarification,
            clarification_question,
            reasoning: draft.reasoning,
            source: draft.source,
        }
    }

    /// Whether `result` satisfies the totality and consistency invariants.
    pub fn is_consistent(&self, schema: &SchemaDescription, result: &ClassificationResult) -> bool {
        if !schema.is_supported(result.query_type) {
            return false;
        }
        if !(0.0..=1.0).contains(&result.confidence) {
            return false;
        }
        let missing = schema.missing_required(result.query_type, &result.parameters);
        let expected = result.confidence < self.confidence_threshold || !missing.is_empty();
        result.needs_clarification == expected
            && result.clarification_question.is_some() == expected
    }
}

fn clarification_question(query_type: QueryType, missing: &[String]) -> String {
    if missing.is_empty() {
        return "I'm not sure I understood your request. Could you rephrase it or add a bit more detail?"
            .to_string();
    }

    let fields: Vec<String> = missing.iter().map(|m| m.replace('_', " ")).collect();
    let wanted = match fields.as_slice() {
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
        [] => String::new(),
    };
    let topic = match query_type {
        QueryType::MenuInquiry => "menu question",
        QueryType::OrderHistory => "order history request",
        QueryType::PriceUpdate => "price update",
        QueryType::PdfIngestion => "document upload",
        QueryType::General => "question",
        QueryType::Correction => "correction",
        QueryType::Clarification => "clarification",
    };
    format!("Could you tell me the {wanted} for this {topic}?")
}
