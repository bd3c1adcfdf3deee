// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parse-and-repair for completion-service answers.
//!
//! Accepts a JSON object, optionally wrapped in a markdown fence or
//! surrounded by prose. Everything else is rejected with a [`ParseError`].

use maitre_core::MaitreError;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::Parameters;

/// Confidence assumed when the model omits it.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Why a completion answer could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("response is empty")]
    Empty,
    #[error("response contains no JSON object")]
    NoJsonObject,
    #[error("response JSON is invalid: {0}")]
    InvalidJson(String),
    #[error("response JSON is not an object")]
    NotAnObject,
    #[error("response has no query_type")]
    MissingQueryType,
}

impl From<ParseError> for MaitreError {
    fn from(err: ParseError) -> Self {
        MaitreError::MalformedResponse {
            message: err.to_string(),
        }
    }
}

/// Fields read from a classification answer. `query_type` is not yet
/// checked against the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedClassification {
    pub query_type: String,
    /// Clamped to `[0.0, 1.0]`.
    pub confidence: f64,
    pub parameters: Parameters,
    pub reasoning: Option<String>,
    pub is_followup: Option<bool>,
}

/// Parses a classification answer.
pub fn parse_response(text: &str) -> Result<ParsedClassification, ParseError> {
    let object = extract_object(text)?;

    let query_type = object
        .get("query_type")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MissingQueryType)?;

    let confidence = match object.get("confidence") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|c| c.is_finite())
    .unwrap_or(DEFAULT_CONFIDENCE)
    .clamp(0.0, 1.0);

    let parameters = match object.get("parameters") {
        Some(Value::Object(map)) => map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        _ => Parameters::new(),
    };

    let reasoning = object
        .get("reasoning")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let is_followup = object.get("is_followup").and_then(Value::as_bool);

    Ok(ParsedClassification {
        query_type,
        confidence,
        parameters,
        reasoning,
        is_followup,
    })
}

/// Reads a yes/no answer from the follow-up check.
///
/// Accepts a bare word (`yes`, `no`, `true`, `false`) with optional
/// punctuation or fence, or an object with an `is_followup` boolean.
pub fn parse_followup_answer(text: &str) -> Option<bool> {
    let stripped = strip_fence(text.trim());
    if let Ok(object) = extract_object(stripped)
        && let Some(flag) = object.get("is_followup").and_then(Value::as_bool)
    {
        return Some(flag);
    }

    let word: String = stripped
        .trim()
        .chars()
        .take_while(|c| c.is_alphabetic())
        .collect::<String>()
        .to_lowercase();
    match word.as_str() {
        "yes" | "true" => Some(true),
        "no" | "false" => Some(false),
        _ => None,
    }
}

fn extract_object(text: &str) -> Result<Map<String, Value>, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    let body = strip_fence(trimmed).trim();

    let direct_error = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(_) => ParseError::NotAnObject,
        Err(e) => ParseError::InvalidJson(e.to_string()),
    };

    // Secondary extraction: first balanced `{...}` span.
    let Some(span) = first_object_span(body) else {
        return Err(match direct_error {
            ParseError::NotAnObject => ParseError::NotAnObject,
            _ => ParseError::NoJsonObject,
        });
    };
    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ParseError::NotAnObject),
        Err(e) => Err(ParseError::InvalidJson(e.to_string())),
    }
}

/// Returns the contents of the first markdown code fence, or `text` unchanged.
fn strip_fence(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text;
    };
    let after_marker = &text[open + 3..];
    // Skip the info string (e.g. `json`) up to the end of the line.
    let content_start = after_marker.find('\n').map(|i| i + 1).unwrap_or(after_marker.len());
    let content = &after_marker[content_start..];
    match content.find("```") {
        Some(close) => &content[..close],
        None => content,
    }
}

/// Finds the first balanced `{...}` span, honouring JSON string escapes.
fn first_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_plain_object() {
        let parsed = parse_response(
            r#"{"query_type": "order_history", "confidence": 0.85,
                "parameters": {"date_range": "last week"}, "reasoning": "sales question"}"#,
        )
        .unwrap();
        assert_eq!(parsed.query_type, "order_history");
        assert_eq!(parsed.confidence, 0.85);
        assert_eq!(parsed.parameters["date_range"], "last week");
        assert_eq!(parsed.reasoning.as_deref(), Some("sales question"));
        assert_eq!(parsed.is_followup, None);
    }

    #[test]
    fn strips_json_fence() {
        let text = "```json\n{\"query_type\": \"menu_inquiry\", \"confidence\": 0.9}\n```";
        let parsed = parse_response(text).unwrap();
        assert_eq!(parsed.query_type, "menu_inquiry");
    }

    #[test]
    fn finds_object_inside_prose() {
        let text = "Sure! Here is the classification: {\"query_type\": \"general\", \
                    \"parameters\": {\"topic\": \"hours {weekend}\"}} Hope that helps.";
        let parsed = parse_response(text).unwrap();
        assert_eq!(parsed.query_type, "general");
        assert_eq!(parsed.parameters["topic"], "hours {weekend}");
    }

    #[test]
    fn missing_confidence_defaults_and_out_of_range_clamps() {
        let parsed = parse_response(r#"{"query_type": "general"}"#).unwrap();
        assert_eq!(parsed.confidence, DEFAULT_CONFIDENCE);
        let parsed = parse_response(r#"{"query_type": "general", "confidence": 3}"#).unwrap();
        assert_eq!(parsed.confidence, 1.0);
        let parsed = parse_response(r#"{"query_type": "general", "confidence": "0.7"}"#).unwrap();
        assert_eq!(parsed.confidence, 0.7);
    }

    #[test]
    fn null_parameters_are_dropped() {
        let parsed = parse_response(
            r#"{"query_type": "price_update", "parameters": {"item_name": null, "new_price": 12}}"#,
        )
        .unwrap();
        assert!(!parsed.parameters.contains_key("item_name"));
        assert_eq!(parsed.parameters["new_price"], 12);
    }

    #[test]
    fn query_type_is_normalized() {
        let parsed = parse_response(r#"{"query_type": " Price_Update "}"#).unwrap();
        assert_eq!(parsed.query_type, "price_update");
    }

    #[test]
    fn rejections_are_explicit() {
        assert_eq!(parse_response("   "), Err(ParseError::Empty));
        assert_eq!(parse_response("I cannot help with that."), Err(ParseError::NoJsonObject));
        assert_eq!(parse_response("[1, 2, 3]"), Err(ParseError::NotAnObject));
        assert_eq!(parse_response(r#"{"confidence": 0.9}"#), Err(ParseError::MissingQueryType));
        assert_eq!(parse_response(r#"{"query_type": ""}"#), Err(ParseError::MissingQueryType));
        assert!(matches!(
            parse_response("prefix {\"query_type\": \"general\",} suffix"),
            Err(ParseError::InvalidJson(_))
        ));
        assert_eq!(parse_response("{\"query_type\": \"gen"), Err(ParseError::NoJsonObject));
    }

    #[test]
    fn parse_error_converts_to_malformed_response() {
        let err: MaitreError = ParseError::NoJsonObject.into();
        assert!(matches!(err, MaitreError::MalformedResponse { .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn followup_answers() {
        assert_eq!(parse_followup_answer("yes"), Some(true));
        assert_eq!(parse_followup_answer("Yes."), Some(true));
        assert_eq!(parse_followup_answer("NO"), Some(false));
        assert_eq!(parse_followup_answer("```\nno\n```"), Some(false));
        assert_eq!(parse_followup_answer(r#"{"is_followup": true}"#), Some(true));
        assert_eq!(parse_followup_answer("maybe"), None);
        assert_eq!(parse_followup_answer(""), None);
    }

    proptest! {
        #[test]
        fn never_panics_on_arbitrary_text(text in ".*") {
            let _ = parse_response(&text);
            let _ = parse_followup_answer(&text);
        }

        #[test]
        fn fenced_objects_round_trip(
            tag in "[a-z_]{1,20}",
            confidence in 0.0f64..=1.0,
            prose in "[A-Za-z ,.]{0,40}",
        ) {
            let object = serde_json::json!({"query_type": tag, "confidence": confidence});
            let text = format!("{prose}\n```json\n{object}\n```\n{prose}");
            let parsed = parse_response(&text).unwrap();
            prop_assert_eq!(parsed.query_type, tag);
            prop_assert!((parsed.confidence - confidence).abs() < 1e-12);
        }
    }
}
