// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Maitre classifier.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Query type tags the classifier knows how to handle.
///
/// A schema may enable any subset of these, but it must include `general`,
/// which is the tag every fallback path can always produce.
pub const KNOWN_QUERY_TYPES: &[&str] = &[
    "menu_inquiry",
    "order_history",
    "price_update",
    "pdf_ingestion",
    "general",
    "correction",
    "clarification",
];

/// Top-level Maitre configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MaitreConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Completion service settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Classification behavior: thresholds, cache, follow-up detection, fixtures.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Supported query types and the domain schema used for parameter extraction.
    #[serde(default)]
    pub schema: SchemaConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the service.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "maitre".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// OpenAI-compatible completion service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the chat completions API (without `/chat/completions`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Fixed model identifier used for every classification call.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature. Kept low so classifications are stable.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Upper bound on a single completion call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_timeout_secs() -> u64 {
    10
}

/// Classification behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Results below this confidence ask the user for clarification (0.0-1.0).
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Confidence removed for each required parameter the result lacks.
    #[serde(default = "default_missing_parameter_penalty")]
    pub missing_parameter_penalty: f64,

    /// Number of trailing conversation turns embedded in prompts and cache keys.
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Enable the in-process result cache.
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,

    /// Cache entry lifetime in seconds. `None` keeps entries until cleared.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: Option<u64>,

    /// Ask the completion service whether a query continues the previous
    /// turn before inheriting parameters from it.
    #[serde(default = "default_followup_check")]
    pub followup_check: bool,

    /// Serve the fixed sample inputs in `fixtures` without calling the
    /// completion service. Development and integration testing only.
    #[serde(default)]
    pub fixtures_enabled: bool,

    /// Fixed sample inputs and their outputs.
    #[serde(default)]
    pub fixtures: Vec<FixtureConfig>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            missing_parameter_penalty: default_missing_parameter_penalty(),
            context_window: default_context_window(),
            cache_enabled: default_cache_enabled(),
            cache_ttl_secs: default_cache_ttl_secs(),
            followup_check: default_followup_check(),
            fixtures_enabled: false,
            fixtures: Vec::new(),
        }
    }
}

fn default_confidence_threshold() -> f64 {
    0.6
}

fn default_missing_parameter_penalty() -> f64 {
    0.15
}

fn default_context_window() -> usize {
    5
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl_secs() -> Option<u64> {
    Some(3600)
}

fn default_followup_check() -> bool {
    true
}

/// A fixed sample input and the classification it always produces.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureConfig {
    /// Query text, matched exactly after trimming.
    pub query: String,

    /// Query type tag of the fixed output.
    pub query_type: String,

    /// Confidence of the fixed output.
    #[serde(default = "default_fixture_confidence")]
    pub confidence: f64,

    /// Parameters of the fixed output.
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

fn default_fixture_confidence() -> f64 {
    0.99
}

/// Schema description: supported query types plus the domain schema
/// relevant to parameter extraction.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Supported query types, in the order they are presented to the model.
    #[serde(default = "default_query_types")]
    pub query_types: Vec<QueryTypeConfig>,

    /// Database tables and their columns.
    #[serde(default = "default_tables")]
    pub tables: BTreeMap<String, Vec<String>>,

    /// Known values per parameter name (e.g. `item_name` -> menu item names).
    #[serde(default)]
    pub entities: BTreeMap<String, Vec<String>>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            query_types: default_query_types(),
            tables: default_tables(),
            entities: BTreeMap::new(),
        }
    }
}

/// One supported query type.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueryTypeConfig {
    /// Query type tag, one of [`KNOWN_QUERY_TYPES`].
    pub name: String,

    /// What requests of this type look like.
    pub description: String,

    /// Downstream agent that handles this type.
    pub target_agent: String,

    /// Parameters the model should extract for this type.
    #[serde(default)]
    pub parameters: Vec<ParameterConfig>,
}

/// One extractable parameter of a query type.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterConfig {
    /// Parameter name as it appears in `parameters`.
    pub name: String,

    /// Shape and meaning of the value.
    pub description: String,

    /// Whether the downstream handler cannot act without it.
    #[serde(default)]
    pub required: bool,
}

fn param(name: &str, description: &str, required: bool) -> ParameterConfig {
    ParameterConfig {
        name: name.to_string(),
        description: description.to_string(),
        required,
    }
}

fn query_type(
    name: &str,
    description: &str,
    target_agent: &str,
    parameters: Vec<ParameterConfig>,
) -> QueryTypeConfig {
    QueryTypeConfig {
        name: name.to_string(),
        description: description.to_string(),
        target_agent: target_agent.to_string(),
        parameters,
    }
}

fn default_query_types() -> Vec<QueryTypeConfig> {
    vec![
        query_type(
            "menu_inquiry",
            "Questions about menu items, categories, availability, descriptions",
            "menu-qa-agent",
            vec![
                param("item_name", "menu item the question is about", false),
                param("category", "menu category, e.g. desserts", false),
                param("attribute", "what is asked: price, ingredients, availability", false),
            ],
        ),
        query_type(
            "order_history",
            "Requests for past order information, sales data, analytics",
            "order-history-qa-agent",
            vec![
                param("date_range", "period such as \"last week\" or \"2024-01-01 to 2024-01-31\"", true),
                param("item_name", "restrict to one menu item", false),
                param("metric", "aggregate requested: count, revenue, average", false),
            ],
        ),
        query_type(
            "price_update",
            "Requests to modify item prices or costs",
            "price-update-agent",
            vec![
                param("item_name", "menu item whose price changes", true),
                param("new_price", "target price as a decimal amount, e.g. 12.50", true),
            ],
        ),
        query_type(
            "pdf_ingestion",
            "Document processing, file uploads, data extraction requests",
            "pdf-ingestion-agent",
            vec![
                param("file_name", "name of the uploaded document", false),
                param("document_type", "kind of document: menu, invoice, report", false),
            ],
        ),
        query_type(
            "general",
            "General questions that don't fit other categories",
            "menu-qa-agent",
            vec![param("topic", "subject matter of the question", false)],
        ),
        query_type(
            "correction",
            "The user corrects a value from their previous request",
            "orchestrator",
            vec![
                param("corrected_value", "the value the user actually meant", false),
                param("previous_value", "the value being replaced", false),
                param("corrects", "query type of the request being corrected", false),
            ],
        ),
        query_type(
            "clarification",
            "The user answers a clarification question or narrows a previous request",
            "orchestrator",
            vec![param("detail", "the additional detail supplied", false)],
        ),
    ]
}

fn default_tables() -> BTreeMap<String, Vec<String>> {
    let table = |cols: &[&str]| cols.iter().map(|c| c.to_string()).collect::<Vec<_>>();
    BTreeMap::from([
        (
            "orders".to_string(),
            table(&[
                "id", "created_at", "updated_at", "deleted_at", "customer_id", "vendor_id",
                "location_id", "status", "total", "tax", "instructions", "type", "marker_id",
                "fee", "loyalty_id", "fee_percent", "tip",
            ]),
        ),
        (
            "order_items".to_string(),
            table(&[
                "id", "created_at", "updated_at", "deleted_at", "item_id", "quantity",
                "order_id", "instructions",
            ]),
        ),
        (
            "items".to_string(),
            table(&[
                "id", "created_at", "updated_at", "deleted_at", "name", "description", "price",
                "category_id", "disabled", "seq_num",
            ]),
        ),
        (
            "categories".to_string(),
            table(&[
                "id", "created_at", "updated_at", "deleted_at", "name", "description", "menu_id",
                "disabled", "start_time", "end_time", "seq_num",
            ]),
        ),
        (
            "menus".to_string(),
            table(&[
                "id", "created_at", "updated_at", "deleted_at", "name", "description",
                "location_id", "disabled",
            ]),
        ),
        (
            "options".to_string(),
            table(&[
                "id", "created_at", "updated_at", "deleted_at", "name", "description", "min",
                "max", "item_id", "disabled",
            ]),
        ),
        (
            "option_items".to_string(),
            table(&[
                "id", "created_at", "updated_at", "deleted_at", "name", "description", "price",
                "option_id", "disabled",
            ]),
        ),
        (
            "locations".to_string(),
            table(&[
                "id", "created_at", "updated_at", "deleted_at", "name", "description", "timezone",
                "latitude", "longitude", "active", "disabled", "code", "tax_rate", "settings",
            ]),
        ),
        (
            "users".to_string(),
            table(&[
                "id", "created_at", "updated_at", "deleted_at", "first_name", "last_name", "email",
                "picture", "phone",
            ]),
        ),
    ])
}
