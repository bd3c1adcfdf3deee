// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt construction for classification and follow-up detection.
//!
//! Pure functions of their inputs. The system prompt depends only on the
//! schema; the user prompt carries the query and a bounded context window.

use std::fmt::Write as _;

use crate::schema::SchemaDescription;
use crate::types::{ConversationContext, ConversationTurn};

/// Question asked by the follow-up check. Also used to recognise the call.
pub const FOLLOWUP_QUESTION: &str = "Is the new query a follow-up to the previous one?";

/// Prefix of every classification user prompt.
pub const CLASSIFY_PREFIX: &str = "Classify this query:";

const CONFIDENCE_RUBRIC: &str = "\
CONFIDENCE SCORING:
- 0.9-1.0: Very clear, unambiguous classification
- 0.7-0.8: Good classification with minor ambiguity
- 0.5-0.6: Moderate confidence, some uncertainty
- 0.3-0.4: Low confidence, significant ambiguity
- 0.0-0.2: Very uncertain, fallback classification";

const FOLLOWUP_SYSTEM_PROMPT: &str = "\
You decide whether a new message in a restaurant management conversation \
continues the previous request, relying on it for details it does not repeat \
(for example \"what about last month?\" after a sales question). \
Answer with exactly one word: yes or no.";

/// A system prompt and a user prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Builds classification prompts.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Builds both prompts for one classification call.
    ///
    /// At most `window` trailing turns of `context` are embedded.
    pub fn build(
        schema: &SchemaDescription,
        query_text: &str,
        context: Option<&ConversationContext>,
        window: usize,
    ) -> PromptPair {
        PromptPair {
            system: Self::system_prompt(schema),
            user: Self::user_prompt(query_text, context, window),
        }
    }

    /// The schema-derived, context-independent system prompt.
    pub fn system_prompt(schema: &SchemaDescription) -> String {
        let mut out = String::from(
            "You are an advanced query classifier for a restaurant management system. \
             Analyze the user's query, classify it into exactly one category, extract the \
             relevant parameters and assign a confidence score.\n\nQUERY CATEGORIES:\n",
        );
        for spec in schema.query_types() {
            let _ = writeln!(out, "- {}: {}", spec.query_type, spec.description);
        }

        out.push_str("\nPARAMETERS:\n");
        for spec in schema.query_types() {
            if spec.parameters.is_empty() {
                let _ = writeln!(out, "- {}: none", spec.query_type);
                continue;
            }
            let _ = writeln!(out, "- {}:", spec.query_type);
            for param in &spec.parameters {
                let marker = if param.required { " (required)" } else { "" };
                let _ = writeln!(out, "    - {}{}: {}", param.name, marker, param.description);
            }
        }

        if !schema.tables().is_empty() {
            out.push_str("\nDATABASE SCHEMA (use these names when extracting parameters):\n");
            for (table, columns) in schema.tables() {
                let _ = writeln!(out, "- {}: {}", table, columns.join(", "));
            }
        }

        if !schema.entities().is_empty() {
            out.push_str("\nKNOWN VALUES:\n");
            for (kind, values) in schema.entities() {
                let _ = writeln!(out, "- {}: {}", kind, values.join(", "));
            }
        }

        out.push_str(
            "\nRESPONSE FORMAT:\n\
             Respond with a single JSON object:\n\
             {\n\
             \x20   \"query_type\": \"category_name\",\n\
             \x20   \"confidence\": 0.0-1.0,\n\
             \x20   \"parameters\": { \"parameter_name\": \"value\" },\n\
             \x20   \"is_followup\": true/false,\n\
             \x20   \"reasoning\": \"Brief explanation of the classification\"\n\
             }\n\
             Omit parameters you cannot find. Set is_followup to true when the query \
             depends on the conversation context for details it does not state.\n\n",
        );
        out.push_str(CONFIDENCE_RUBRIC);
        out.push_str("\n\nAlways respond with valid JSON only.");
        out
    }

    /// The user prompt: the quoted query plus a condensed context window.
    pub fn user_prompt(query_text: &str, context: Option<&ConversationContext>, window: usize) -> String {
        let mut out = format!("{CLASSIFY_PREFIX} \"{}\"", query_text.trim());

        let recent = context.map(|c| c.recent(window)).unwrap_or_default();
        if !recent.is_empty() {
            out.push_str("\n\nConversation context (oldest first):\n");
            for (i, turn) in recent.iter().enumerate() {
                let _ = writeln!(out, "{}. {}", i + 1, describe_turn(turn));
            }
        }
        out
    }

    /// Prompts for the yes/no follow-up check.
    pub fn build_followup(previous: &ConversationTurn, query_text: &str) -> PromptPair {
        PromptPair {
            system: FOLLOWUP_SYSTEM_PROMPT.to_string(),
            user: format!(
                "Previous query: {}\nNew query: \"{}\"\n{FOLLOWUP_QUESTION}",
                describe_turn(previous),
                query_text.trim()
            ),
        }
    }
}

fn describe_turn(turn: &ConversationTurn) -> String {
    let params = serde_json::to_string(&turn.result.parameters).unwrap_or_else(|_| "{}".into());
    format!(
        "\"{}\" -> {} {}",
        turn.query_text.trim(),
        turn.result.query_type,
        params
    )
}
