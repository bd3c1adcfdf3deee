// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification data model shared by every classification path.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Extracted parameters, keyed by parameter name.
pub type Parameters = BTreeMap<String, serde_json::Value>;

/// Intent label selecting the downstream handler.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QueryType {
    MenuInquiry,
    OrderHistory,
    PriceUpdate,
    PdfIngestion,
    General,
    Correction,
    Clarification,
}

impl QueryType {
    /// The snake_case tag used in prompts, configuration and JSON.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Which path produced a result. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClassificationSource {
    /// Parsed from a completion-service answer.
    Ai,
    /// Produced by the rule-based classifier.
    RuleBasedFallback,
    /// Served from the result cache.
    Cache,
    /// Served from a configured fixture.
    Mock,
}

/// The single output type of every classification path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub query_type: QueryType,
    /// Always within `[0.0, 1.0]`.
    pub confidence: f64,
    #[serde(default)]
    pub parameters: Parameters,
    pub needs_clarification: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarification_question: Option<String>,
    /// Short explanation of the decision, when the path provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub source: ClassificationSource,
}

impl ClassificationResult {
    /// Returns a copy tagged with another source.
    pub fn with_source(mut self, source: ClassificationSource) -> Self {
        self.source = source;
        self
    }

    /// Equal in every field except `source`.
    pub fn same_outcome(&self, other: &Self) -> bool {
        self.query_type == other.query_type
            && self.confidence == other.confidence
            && self.parameters == other.parameters
            && self.needs_clarification == other.needs_clarification
            && self.clarification_question == other.clarification_question
            && self.reasoning == other.reasoning
    }

    /// Looks up a parameter as text. Numbers are rendered, other values ignored.
    pub fn parameter_text(&self, name: &str) -> Option<String> {
        match self.parameters.get(name)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// One prior exchange in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub query_text: String,
    pub result: ClassificationResult,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(query_text: impl Into<String>, result: ClassificationResult) -> Self {
        Self {
            query_text: query_text.into(),
            result,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered prior turns, most recent last.
///
/// Owned by the session layer. The classifier only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationContext {
    turns: Vec<ConversationTurn>,
}

impl ConversationContext {
    pub fn new(turns: Vec<ConversationTurn>) -> Self {
        Self { turns }
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// The trailing `window` turns, oldest first.
    pub fn recent(&self, window: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(window);
        &self.turns[start..]
    }

    /// Most recent turn within `window` classified as `query_type`.
    pub fn last_of_type(&self, query_type: QueryType, window: usize) -> Option<&ConversationTurn> {
        self.recent(window)
            .iter()
            .rev()
            .find(|turn| turn.result.query_type == query_type)
    }

    /// Stable text summary of the trailing window, for cache fingerprints.
    ///
    /// Timestamps and sources are excluded so that replaying the same
    /// conversation yields the same signature.
    pub fn signature(&self, window: usize) -> String {
        self.recent(window)
            .iter()
            .map(|turn| {
                let params = serde_json::to_string(&turn.result.parameters).unwrap_or_default();
                format!(
                    "{}\u{1f}{}\u{1f}{}",
                    normalize_text(&turn.query_text),
                    turn.result.query_type,
                    params
                )
            })
            .collect::<Vec<_>>()
            .join("\u{1e}")
    }
}

/// Lowercase, trim and collapse internal whitespace.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn result(query_type: QueryType) -> ClassificationResult {
        ClassificationResult {
            query_type,
            confidence: 0.8,
            parameters: Parameters::new(),
            needs_clarification: false,
            clarification_question: None,
            reasoning: None,
            source: ClassificationSource::Ai,
        }
    }

    #[test]
    fn query_type_tags_match_configuration_names() {
        let tags: Vec<&str> = QueryType::iter().map(QueryType::as_str).collect();
        assert_eq!(tags, maitre_config::model::KNOWN_QUERY_TYPES);
    }

    #[test]
    fn query_type_parses_snake_case() {
        assert_eq!(QueryType::from_str("price_update").unwrap(), QueryType::PriceUpdate);
        assert!(QueryType::from_str("weather").is_err());
        assert_eq!(QueryType::PdfIngestion.to_string(), "pdf_ingestion");
    }

    #[test]
    fn source_serializes_as_snake_case() {
        let json = serde_json::to_string(&ClassificationSource::RuleBasedFallback).unwrap();
        assert_eq!(json, "\"rule_based_fallback\"");
        assert_eq!(ClassificationSource::Cache.to_string(), "cache");
    }

    #[test]
    fn same_outcome_ignores_source() {
        let a = result(QueryType::General);
        let b = a.clone().with_source(ClassificationSource::Cache);
        assert!(a.same_outcome(&b));
        assert_ne!(a, b);

        let mut c = a.clone();
        c.confidence = 0.5;
        assert!(!a.same_outcome(&c));
    }

    #[test]
    fn recent_returns_trailing_window() {
        let ctx = ConversationContext::new(vec![
            ConversationTurn::new("one", result(QueryType::MenuInquiry)),
            ConversationTurn::new("two", result(QueryType::OrderHistory)),
            ConversationTurn::new("three", result(QueryType::General)),
        ]);
        let recent = ctx.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].query_text, "two");
        assert_eq!(ctx.recent(10).len(), 3);
        assert!(ctx.recent(0).is_empty());
    }

    #[test]
    fn last_of_type_finds_most_recent_match() {
        let mut first = result(QueryType::OrderHistory);
        first
            .parameters
            .insert("date_range".into(), serde_json::json!("last month"));
        let mut second = result(QueryType::OrderHistory);
        second
            .parameters
            .insert("date_range".into(), serde_json::json!("last week"));

        let ctx = ConversationContext::new(vec![
            ConversationTurn::new("a", first),
            ConversationTurn::new("b", second),
            ConversationTurn::new("c", result(QueryType::General)),
        ]);
        let turn = ctx.last_of_type(QueryType::OrderHistory, 5).unwrap();
        assert_eq!(turn.query_text, "b");
        assert!(ctx.last_of_type(QueryType::PriceUpdate, 5).is_none());
    }

    #[test]
    fn signature_ignores_timestamps_and_case() {
        let a = ConversationContext::new(vec![ConversationTurn::new(
            "Show  Orders",
            result(QueryType::OrderHistory),
        )]);
        let mut turn = ConversationTurn::new("show orders", result(QueryType::OrderHistory));
        turn.timestamp = turn.timestamp - chrono::Duration::hours(3);
        let b = ConversationContext::new(vec![turn]);
        assert_eq!(a.signature(5), b.signature(5));
        assert_ne!(a.signature(5), ConversationContext::default().signature(5));
    }

    #[test]
    fn context_round_trips_as_plain_array() {
        let ctx = ConversationContext::new(vec![ConversationTurn::new(
            "hi",
            result(QueryType::General),
        )]);
        let json = serde_json::to_value(&ctx).unwrap();
        assert!(json.is_array());
        let back: ConversationContext = serde_json::from_value(json).unwrap();
        assert_eq!(back, ctx);
    }

    #[test]
    fn parameter_text_renders_numbers() {
        let mut r = result(QueryType::PriceUpdate);
        r.parameters.insert("new_price".into(), serde_json::json!(12.5));
        r.parameters.insert("item_name".into(), serde_json::json!("fries"));
        assert_eq!(r.parameter_text("new_price").as_deref(), Some("12.5"));
        assert_eq!(r.parameter_text("item_name").as_deref(), Some("fries"));
        assert!(r.parameter_text("missing").is_none());
    }
}
