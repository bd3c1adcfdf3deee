// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic rule-based classification.
//!
//! Keyword scoring plus pattern-based parameter extraction. No network, no
//! state beyond the immutable rule table. Serves as the fallback when the
//! completion service cannot be used, and as a lexical correction detector.

use std::cmp::Ordering;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;

use crate::policy::{ClassificationDraft, ClassificationPolicy};
use crate::schema::SchemaDescription;
use crate::types::{ClassificationResult, ClassificationSource, Parameters, QueryType};

/// Confidence assigned to lexically detected corrections.
pub const CORRECTION_CONFIDENCE: f64 = 0.95;
/// Lower bound of keyword-derived confidence.
pub const MIN_RULE_CONFIDENCE: f64 = 0.2;
/// Upper bound of keyword-derived confidence.
pub const MAX_RULE_CONFIDENCE: f64 = 0.9;
/// Added to `menu_inquiry` when the query is phrased as a question.
pub const QUESTION_BONUS: f64 = 0.1;

/// Parameter extractors, one per kind of value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extractor {
    /// `date_range`: relative periods, explicit ranges, month names.
    DateRange,
    /// `new_price`: the target amount of a price change.
    NewPrice,
    /// `item_name`: known item entities, else a "price of X" phrase.
    ItemName,
    /// `category`: known category entities.
    Category,
    /// `attribute`: what is being asked about a menu item.
    Attribute,
    /// `metric`: requested aggregate.
    Metric,
    /// `file_name`: a `*.pdf` token.
    FileName,
    /// `document_type`: menu, invoice, report.
    DocumentType,
    /// `detail`: the whole query text.
    Detail,
}

/// One query type's keyword list and extractors.
struct RuleSpec {
    query_type: QueryType,
    keywords: &'static [&'static str],
    extractors: &'static [Extractor],
}

/// Rule table in tie-break priority order: most specific first, `general` last.
const RULE_TABLE: &[RuleSpec] = &[
    RuleSpec {
        query_type: QueryType::PriceUpdate,
        keywords: &["price", "cost", "update", "change", "raise", "lower", "set"],
        extractors: &[Extractor::ItemName, Extractor::NewPrice],
    },
    RuleSpec {
        query_type: QueryType::PdfIngestion,
        keywords: &["pdf", "document", "file", "upload", "import", "ingest", "scan"],
        extractors: &[Extractor::FileName, Extractor::DocumentType],
    },
    RuleSpec {
        query_type: QueryType::OrderHistory,
        keywords: &["order", "orders", "sales", "sold", "purchase", "history", "analytics", "revenue"],
        extractors: &[Extractor::DateRange, Extractor::ItemName, Extractor::Metric],
    },
    RuleSpec {
        query_type: QueryType::MenuInquiry,
        keywords: &[
            "menu", "dish", "dishes", "food", "category", "serve", "ingredients", "vegetarian",
            "available", "items",
        ],
        extractors: &[Extractor::ItemName, Extractor::Category, Extractor::Attribute],
    },
    RuleSpec {
        query_type: QueryType::Clarification,
        keywords: &["specifically", "to clarify", "i was asking", "what i want"],
        extractors: &[Extractor::Detail],
    },
    RuleSpec {
        query_type: QueryType::General,
        keywords: &["hello", "hi", "help", "hours", "thanks"],
        extractors: &[],
    },
];

static CORRECTION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(i meant|meant to say|should have said|should have been)\b")
        .expect("correction marker regex")
});

static VALUE_OVERRIDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<new>\$?\s?\d+(?:\.\d+)?)\s*,?\s+(?:not|instead of)\s+(?P<old>\$?\s?\d+(?:\.\d+)?)",
    )
    .expect("value override regex")
});

static MEANT_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:i meant|meant to say|should have said|should have been)\s+(?P<value>.+?)\s*[.!]?\s*$")
        .expect("meant value regex")
});

static MONEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$\s?(?P<amount>\d+(?:\.\d{1,2})?)|(?P<bare>\d+(?:\.\d{1,2})?)\s*(?:dollars|usd|bucks)\b")
        .expect("money regex")
});

static PRICE_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bto\s+\$?\s?(?P<amount>\d+(?:\.\d{1,2})?)\b").expect("price target regex")
});

static ITEM_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:price of|cost of|price for|change|update|set|raise|lower)\s+(?:the\s+)?(?P<item>[a-z][a-z ]*?)(?:\s+price)?\s+(?:to|at|from|by)\b",
    )
    .expect("item phrase regex")
});

static EXPLICIT_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:from|between)?\s*(?P<range>\d{4}-\d{2}-\d{2}\s+(?:to|and|-)\s+\d{4}-\d{2}-\d{2})\b")
        .expect("explicit range regex")
});

static RELATIVE_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<period>today|yesterday|tonight|this (?:week|month|year|quarter)|last (?:week|month|year|quarter|weekend)|(?:last|past) \d+ (?:days|weeks|months)|(?:in )?(?:january|february|march|april|may|june|july|august|september|october|november|december)(?: \d{4})?)\b",
    )
    .expect("relative period regex")
});

static PDF_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?P<file>[\w\-.]+\.pdf)\b").expect("pdf file regex"));

/// Keyword-driven classifier. Always succeeds.
pub struct RuleClassifier {
    schema: Arc<SchemaDescription>,
    policy: ClassificationPolicy,
}

impl RuleClassifier {
    pub fn new(schema: Arc<SchemaDescription>, policy: ClassificationPolicy) -> Self {
        Self { schema, policy }
    }

    /// Classifies `query_text` without any external call.
    ///
    /// `previous_result` enables correction detection.
    pub fn classify(
        &self,
        query_text: &str,
        previous_result: Option<&ClassificationResult>,
    ) -> ClassificationResult {
        let text = query_text.trim();
        if text.is_empty() {
            return self.finalize(QueryType::General, MIN_RULE_CONFIDENCE, Parameters::new(), "empty query");
        }

        if let Some(previous) = previous_result
            && let Some(result) = self.detect_correction(text, previous)
        {
            return result;
        }

        let normalized = keyword_text(text);
        let best = RULE_TABLE
            .iter()
            .enumerate()
            .filter(|(_, rule)| self.schema.is_supported(rule.query_type))
            .map(|(priority, rule)| (priority, rule, self.score(rule, &normalized, text)))
            .filter(|(_, _, score)| *score > 0.0)
            // Highest score wins; on a tie the earlier (more specific) rule wins.
            .max_by(|a, b| {
                a.2.partial_cmp(&b.2)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| b.0.cmp(&a.0))
            });

        let Some((_, rule, score)) = best else {
            return self.finalize(QueryType::General, MIN_RULE_CONFIDENCE, Parameters::new(), "no keywords matched");
        };

        let parameters = self.extract(rule.extractors, text);
        let confidence = score.clamp(MIN_RULE_CONFIDENCE, MAX_RULE_CONFIDENCE);
        self.finalize(
            rule.query_type,
            confidence,
            parameters,
            &format!("keyword rules matched {}", rule.query_type),
        )
    }

    /// Returns a correction result when `text` lexically corrects `previous`.
    ///
    /// Needs an explicit signal ("I meant ...", "should have said ...", or
    /// "<new> not <old>") and a corrected value. Leading words such as "no"
    /// or "actually" are not a signal on their own.
    pub fn detect_correction(
        &self,
        text: &str,
        previous: &ClassificationResult,
    ) -> Option<ClassificationResult> {
        if !self.schema.is_supported(QueryType::Correction) {
            return None;
        }

        let override_match = VALUE_OVERRIDE.captures(text);
        if override_match.is_none() && !CORRECTION_MARKER.is_match(text) {
            return None;
        }

        let mut parameters = Parameters::new();
        if let Some(caps) = &override_match {
            if let Some(new) = caps.name("new") {
                parameters.insert("corrected_value".to_string(), correction_value(new.as_str()));
            }
            if let Some(old) = caps.name("old") {
                parameters.insert("previous_value".to_string(), correction_value(old.as_str()));
            }
        }
        if !parameters.contains_key("corrected_value") {
            let value = MONEY
                .captures(text)
                .and_then(|caps| money_amount(&caps))
                .or_else(|| {
                    MEANT_VALUE
                        .captures(text)
                        .and_then(|caps| caps.name("value"))
                        .map(|m| correction_value(m.as_str()))
                })?;
            parameters.insert("corrected_value".to_string(), value);
        }
        parameters.insert(
            "corrects".to_string(),
            Value::String(previous.query_type.to_string()),
        );

        Some(self.finalize(
            QueryType::Correction,
            CORRECTION_CONFIDENCE,
            parameters,
            &format!("correction of {}", previous.query_type),
        ))
    }

    fn score(&self, rule: &RuleSpec, normalized: &str, raw: &str) -> f64 {
        let matched = rule
            .keywords
            .iter()
            .filter(|kw| normalized.contains(&format!(" {kw} ")))
            .count();
        let mut score = matched as f64 / rule.keywords.len() as f64;
        if rule.query_type == QueryType::MenuInquiry && raw.contains('?') {
            score += QUESTION_BONUS;
        }
        score
    }

    fn extract(&self, extractors: &[Extractor], text: &str) -> Parameters {
        let mut parameters = Parameters::new();
        for extractor in extractors {
            let (name, value) = match extractor {
                Extractor::DateRange => ("date_range", extract_date_range(text)),
                Extractor::NewPrice => ("new_price", extract_new_price(text)),
                Extractor::ItemName => ("item_name", self.extract_item(text)),
                Extractor::Category => ("category", self.match_entity("category", text)),
                Extractor::Attribute => ("attribute", extract_attribute(text)),
                Extractor::Metric => ("metric", extract_metric(text)),
                Extractor::FileName => ("file_name", extract_file_name(text)),
                Extractor::DocumentType => ("document_type", extract_document_type(text)),
                Extractor::Detail => ("detail", Some(Value::String(text.to_string()))),
            };
            if let Some(value) = value {
                parameters.insert(name.to_string(), value);
            }
        }
        parameters
    }

    fn extract_item(&self, text: &str) -> Option<Value> {
        self.match_entity("item_name", text).or_else(|| {
            ITEM_PHRASE
                .captures(text)
                .and_then(|caps| caps.name("item"))
                .map(|m| m.as_str().trim().to_lowercase())
                .filter(|item| !item.is_empty())
                .map(Value::String)
        })
    }

    /// Longest known entity of `kind` contained in `text` as whole words.
    fn match_entity(&self, kind: &str, text: &str) -> Option<Value> {
        let normalized = keyword_text(text);
        self.schema
            .entity_values(kind)
            .iter()
            .filter(|value| normalized.contains(&format!(" {} ", keyword_text(value).trim())))
            .max_by_key(|value| value.len())
            .map(|value| Value::String(value.clone()))
    }

    fn finalize(
        &self,
        query_type: QueryType,
        confidence: f64,
        parameters: Parameters,
        reasoning: &str,
    ) -> ClassificationResult {
        self.policy.finalize(
            &self.schema,
            ClassificationDraft {
                query_type,
                confidence,
                parameters,
                reasoning: Some(format!("rule-based: {reasoning}")),
                source: ClassificationSource::RuleBasedFallback,
            },
        )
    }
}

/// Lowercase, punctuation to spaces, padded so `" kw "` matches whole words.
fn keyword_text(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '\'' { c } else { ' ' })
        .collect();
    format!(" {} ", cleaned.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn money_amount(caps: &regex::Captures<'_>) -> Option<Value> {
    let raw = caps.name("amount").or_else(|| caps.name("bare"))?;
    number_value(raw.as_str())
}

fn number_value(raw: &str) -> Option<Value> {
    let amount: f64 = raw.trim().trim_start_matches('$').trim().parse().ok()?;
    serde_json::Number::from_f64(amount).map(Value::Number)
}

/// Money-like values become numbers, anything else trimmed text.
fn correction_value(raw: &str) -> Value {
    number_value(raw).unwrap_or_else(|| Value::String(raw.trim().to_string()))
}

fn extract_date_range(text: &str) -> Option<Value> {
    EXPLICIT_RANGE
        .captures(text)
        .and_then(|caps| caps.name("range"))
        .or_else(|| RELATIVE_PERIOD.captures(text).and_then(|caps| caps.name("period")))
        .map(|m| {
            let period = m.as_str().to_lowercase();
            let period = period.strip_prefix("in ").unwrap_or(&period).to_string();
            Value::String(period)
        })
}

fn extract_new_price(text: &str) -> Option<Value> {
    if let Some(value) = PRICE_TARGET
        .captures(text)
        .and_then(|caps| caps.name("amount"))
        .and_then(|m| number_value(m.as_str()))
    {
        return Some(value);
    }
    // Without a "to <amount>" phrase the last amount mentioned is the target.
    MONEY
        .captures_iter(text)
        .last()
        .and_then(|caps| money_amount(&caps))
}

fn extract_attribute(text: &str) -> Option<Value> {
    const ATTRIBUTES: &[(&str, &str)] = &[
        ("price", "price"),
        ("cost", "price"),
        ("how much", "price"),
        ("ingredients", "ingredients"),
        ("contain", "ingredients"),
        ("allergen", "allergens"),
        ("gluten", "allergens"),
        ("calories", "calories"),
        ("available", "availability"),
        ("in stock", "availability"),
        ("vegetarian", "dietary"),
        ("vegan", "dietary"),
    ];
    let lower = text.to_lowercase();
    ATTRIBUTES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, attribute)| Value::String(attribute.to_string()))
}

fn extract_metric(text: &str) -> Option<Value> {
    const METRICS: &[(&str, &str)] = &[
        ("how many", "count"),
        ("number of", "count"),
        ("count", "count"),
        ("revenue", "revenue"),
        ("total sales", "revenue"),
        ("how much", "revenue"),
        ("average", "average"),
        ("best selling", "top"),
        ("best-selling", "top"),
        ("top", "top"),
        ("most popular", "top"),
    ];
    let lower = text.to_lowercase();
    METRICS
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, metric)| Value::String(metric.to_string()))
}

fn extract_file_name(text: &str) -> Option<Value> {
    PDF_FILE
        .captures(text)
        .and_then(|caps| caps.name("file"))
        .map(|m| Value::String(m.as_str().to_string()))
}

fn extract_document_type(text: &str) -> Option<Value> {
    let normalized = keyword_text(text);
    ["menu", "invoice", "report", "receipt"]
        .iter()
        .find(|kind| normalized.contains(&format!(" {kind} ")))
        .map(|kind| Value::String(kind.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn classifier() -> RuleClassifier {
        let mut config = maitre_config::model::SchemaConfig::default();
        config.entities = BTreeMap::from([
            (
                "item_name".to_string(),
                vec!["burger".into(), "cheese burger".into(), "fries".into()],
            ),
            ("category".to_string(), vec!["desserts".into(), "drinks".into()]),
        ]);
        let schema = SchemaDescription::from_config(&config).unwrap();
        RuleClassifier::new(Arc::new(schema), ClassificationPolicy::default())
    }

    fn previous(query_type: QueryType) -> ClassificationResult {
        ClassificationResult {
            query_type,
            confidence: 0.9,
            parameters: Parameters::new(),
            needs_clarification: false,
            clarification_question: None,
            reasoning: None,
            source: ClassificationSource::Ai,
        }
    }

    #[test]
    fn empty_query_is_general_low_confidence() {
        for text in ["", "   ", "\n\t"] {
            let result = classifier().classify(text, None);
            assert_eq!(result.query_type, QueryType::General);
            assert_eq!(result.confidence, 0.2);
            assert!(result.needs_clarification);
            assert_eq!(result.source, ClassificationSource::RuleBasedFallback);
        }
    }

    #[test]
    fn no_keywords_is_general_low_confidence() {
        let result = classifier().classify("qwerty zxcv", None);
        assert_eq!(result.query_type, QueryType::General);
        assert_eq!(result.confidence, 0.2);
        assert!(result.needs_clarification);
    }

    #[test]
    fn correction_with_explicit_override() {
        let result =
            classifier().classify("no, I meant $12 not $10", Some(&previous(QueryType::PriceUpdate)));
        assert_eq!(result.query_type, QueryType::Correction);
        assert_eq!(result.confidence, CORRECTION_CONFIDENCE);
        assert!(!result.needs_clarification);
        assert_eq!(result.parameters["corrects"], json!("price_update"));
        assert_eq!(result.parameters["corrected_value"], json!(12.0));
        assert_eq!(result.parameters["previous_value"], json!(10.0));
    }

    #[test]
    fn correction_with_meant_phrase() {
        let result = classifier().classify("sorry, I meant the fries", Some(&previous(QueryType::MenuInquiry)));
        assert_eq!(result.query_type, QueryType::Correction);
        assert_eq!(result.parameters["corrected_value"], json!("the fries"));
    }

    #[test]
    fn correction_requires_previous_result() {
        let result = classifier().classify("no, I meant $12 not $10", None);
        assert_ne!(result.query_type, QueryType::Correction);
    }

    #[test]
    fn plain_followup_is_not_a_correction() {
        let result = classifier().classify("what about desserts?", Some(&previous(QueryType::MenuInquiry)));
        assert_ne!(result.query_type, QueryType::Correction);
    }

    #[test]
    fn leading_interjection_is_not_a_correction() {
        for text in [
            "Actually, show me sales for the last 30 days",
            "Sorry, what about table 4?",
            "Wait, how many burgers did we sell in 2024?",
            "No, 2 more questions",
        ] {
            let result = classifier().classify(text, Some(&previous(QueryType::OrderHistory)));
            assert_ne!(result.query_type, QueryType::Correction, "{text}");
        }
    }

    #[test]
    fn word_correction_alone_is_not_a_correction() {
        let rules = classifier();
        let previous = previous(QueryType::PriceUpdate);
        assert!(rules.detect_correction("I need a price correction: fries to $5", &previous).is_none());
        let result = rules.classify("I need a price correction: fries to $5", Some(&previous));
        assert_eq!(result.query_type, QueryType::PriceUpdate);
    }

    #[test]
    fn marker_without_value_is_not_a_correction() {
        let previous = previous(QueryType::MenuInquiry);
        assert!(classifier().detect_correction("that's not what I meant.", &previous).is_none());
    }

    #[test]
    fn value_override_without_marker_is_a_correction() {
        let result = classifier()
            .detect_correction("make it 14, not 12", &previous(QueryType::PriceUpdate))
            .expect("override");
        assert_eq!(result.parameters["corrected_value"], json!(14.0));
        assert_eq!(result.parameters["previous_value"], json!(12.0));
    }

    #[test]
    fn price_update_extracts_item_and_target() {
        let result = classifier().classify("Change the price of fries from $3 to $4.50", None);
        assert_eq!(result.query_type, QueryType::PriceUpdate);
        assert_eq!(result.parameters["item_name"], json!("fries"));
        assert_eq!(result.parameters["new_price"], json!(4.5));
    }

    #[test]
    fn price_update_without_entities_uses_phrase() {
        let result = classifier().classify("update the milkshake price to 6 dollars", None);
        assert_eq!(result.query_type, QueryType::PriceUpdate);
        assert_eq!(result.parameters["item_name"], json!("milkshake"));
        assert_eq!(result.parameters["new_price"], json!(6.0));
    }

    #[test]
    fn price_update_missing_price_needs_clarification() {
        let result = classifier().classify("change the burger price", None);
        assert_eq!(result.query_type, QueryType::PriceUpdate);
        assert_eq!(result.parameters["item_name"], json!("burger"));
        assert!(!result.parameters.contains_key("new_price"));
        assert!(result.needs_clarification);
        assert!(result.clarification_question.unwrap().contains("new price"));
    }

    #[test]
    fn order_history_extracts_period_and_metric() {
        let result = classifier().classify("How many orders did we have last week?", None);
        assert_eq!(result.query_type, QueryType::OrderHistory);
        assert_eq!(result.parameters["date_range"], json!("last week"));
        assert_eq!(result.parameters["metric"], json!("count"));
    }

    #[test]
    fn order_history_explicit_range() {
        let result = classifier().classify("sales between 2024-01-01 and 2024-01-31", None);
        assert_eq!(result.parameters["date_range"], json!("2024-01-01 and 2024-01-31"));
    }

    #[test]
    fn order_history_without_period_needs_clarification() {
        let result = classifier().classify("show me sales", None);
        assert_eq!(result.query_type, QueryType::OrderHistory);
        assert!(result.needs_clarification);
        assert!(result.confidence < 0.2);
    }

    #[test]
    fn pdf_ingestion_extracts_file() {
        let result = classifier().classify("please upload the menu file spring_menu.pdf", None);
        assert_eq!(result.query_type, QueryType::PdfIngestion);
        assert_eq!(result.parameters["file_name"], json!("spring_menu.pdf"));
        assert_eq!(result.parameters["document_type"], json!("menu"));
    }

    #[test]
    fn menu_question_gets_interrogative_bonus() {
        let result = classifier().classify("Do you serve vegetarian food?", None);
        assert_eq!(result.query_type, QueryType::MenuInquiry);
        assert!((result.confidence - 0.4).abs() < 1e-9, "got {}", result.confidence);
        assert_eq!(result.parameters["attribute"], json!("dietary"));
    }

    #[test]
    fn longest_entity_wins() {
        let result = classifier().classify("what is in the cheese burger?", None);
        assert_eq!(result.parameters.get("item_name"), Some(&json!("cheese burger")));
    }

    #[test]
    fn tie_prefers_more_specific_type() {
        // One price_update keyword (1/7) against one pdf keyword (1/7).
        let result = classifier().classify("file cost", None);
        assert_eq!(result.query_type, QueryType::PriceUpdate);
    }

    #[test]
    fn confidence_is_capped() {
        let result = classifier().classify(
            "update change raise lower set price cost of fries to $5",
            None,
        );
        assert_eq!(result.query_type, QueryType::PriceUpdate);
        assert_eq!(result.confidence, MAX_RULE_CONFIDENCE);
    }

    #[test]
    fn unsupported_rules_are_skipped() {
        let config = maitre_config::model::SchemaConfig {
            query_types: maitre_config::model::SchemaConfig::default()
                .query_types
                .into_iter()
                .filter(|q| q.name == "general")
                .collect(),
            ..Default::default()
        };
        let schema = Arc::new(SchemaDescription::from_config(&config).unwrap());
        let rules = RuleClassifier::new(schema, ClassificationPolicy::default());
        let result = rules.classify("change the price of fries to $4", Some(&previous(QueryType::General)));
        assert_eq!(result.query_type, QueryType::General);
    }

    proptest! {
        #[test]
        fn totality_and_consistency(text in ".{0,120}") {
            let rules = classifier();
            let policy = ClassificationPolicy::default();
            let schema = SchemaDescription::from_config(&maitre_config::model::SchemaConfig::default()).unwrap();
            let result = rules.classify(&text, Some(&previous(QueryType::PriceUpdate)));
            prop_assert!(schema.is_supported(result.query_type));
            prop_assert!((0.0..=1.0).contains(&result.confidence));
            prop_assert!(policy.is_consistent(&schema, &result));
            prop_assert_eq!(result.source, ClassificationSource::RuleBasedFallback);
        }

        #[test]
        fn deterministic(text in ".{0,80}") {
            let rules = classifier();
            prop_assert_eq!(rules.classify(&text, None), rules.classify(&text, None));
        }
    }
}
