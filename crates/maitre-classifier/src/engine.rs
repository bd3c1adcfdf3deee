// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI classification engine.
//!
//! Per call: cache lookup, fixture interception, prompt construction, one
//! bounded completion call, parse and validation, optional context
//! resolution, cache write. Any failure after the cache and fixture steps
//! hands the query to the [`RuleClassifier`]; no error leaves this module.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use maitre_config::MaitreConfig;
use maitre_core::traits::ProviderAdapter;
use maitre_core::types::{ProviderRequest, ProviderResponse};
use maitre_core::MaitreError;
use tracing::{debug, info, warn};

use crate::cache::{ClassificationCache, fingerprint};
use crate::fixtures::FixtureSet;
use crate::parse::{parse_followup_answer, parse_response};
use crate::policy::{ClassificationDraft, ClassificationPolicy};
use crate::prompt::PromptBuilder;
use crate::rules::RuleClassifier;
use crate::schema::SchemaDescription;
use crate::types::{
    ClassificationResult, ClassificationSource, ConversationContext, Parameters, QueryType,
};

/// Completion-call and context settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on each completion call.
    pub timeout: Duration,
    /// Trailing turns embedded in prompts and fingerprints.
    pub context_window: usize,
    pub cache_enabled: bool,
}

impl EngineSettings {
    pub fn from_config(config: &MaitreConfig) -> Self {
        Self {
            model: config.openai.model.clone(),
            temperature: config.openai.temperature,
            max_tokens: config.openai.max_tokens,
            timeout: Duration::from_secs(config.openai.timeout_secs),
            context_window: config.classifier.context_window,
            cache_enabled: config.classifier.cache_enabled,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&MaitreConfig::default())
    }
}

/// Per-call options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Read and write the result cache for this call.
    pub use_cache: bool,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self { use_cache: true }
    }
}

impl ClassifyOptions {
    pub fn no_cache() -> Self {
        Self { use_cache: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Context only shapes the prompt.
    Plain,
    /// Inherit parameters when the answer is ambiguous or flagged as a follow-up.
    Context,
    /// Inherit parameters when a separate follow-up check says yes.
    FollowupCheck,
}

/// LLM-backed classifier with rule-based fallback.
pub struct AiClassifier {
    provider: Arc<dyn ProviderAdapter>,
    schema: Arc<SchemaDescription>,
    policy: ClassificationPolicy,
    rules: RuleClassifier,
    cache: ClassificationCache,
    fixtures: Option<FixtureSet>,
    settings: EngineSettings,
    system_prompt: String,
}

impl AiClassifier {
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        schema: Arc<SchemaDescription>,
        policy: ClassificationPolicy,
        settings: EngineSettings,
    ) -> Self {
        let system_prompt = PromptBuilder::system_prompt(&schema);
        Self {
            provider,
            rules: RuleClassifier::new(schema.clone(), policy),
            schema,
            policy,
            cache: ClassificationCache::new(None),
            fixtures: None,
            settings,
            system_prompt,
        }
    }

    /// Builds an engine from validated configuration.
    pub fn from_config(
        provider: Arc<dyn ProviderAdapter>,
        config: &MaitreConfig,
    ) -> Result<Self, MaitreError> {
        maitre_config::validation::validate_config(config).map_err(|errors| {
            MaitreError::Config(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

        let schema = Arc::new(SchemaDescription::from_config(&config.schema)?);
        let fixtures = FixtureSet::from_config(&config.classifier, &schema)?;
        let cache = ClassificationCache::new(config.classifier.cache_ttl_secs.map(Duration::from_secs));

        info!(
            provider = provider.name(),
            query_types = schema.query_types().len(),
            fixtures = fixtures.as_ref().map_or(0, FixtureSet::len),
            cache_enabled = config.classifier.cache_enabled,
            "classification engine initialized"
        );

        Ok(Self::new(
            provider,
            schema,
            ClassificationPolicy::from_config(&config.classifier),
            EngineSettings::from_config(config),
        )
        .with_cache(cache)
        .with_fixtures(fixtures))
    }

    pub fn with_cache(mut self, cache: ClassificationCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_fixtures(mut self, fixtures: Option<FixtureSet>) -> Self {
        self.fixtures = fixtures;
        self
    }

    pub fn schema(&self) -> &Arc<SchemaDescription> {
        &self.schema
    }

    pub fn policy(&self) -> &ClassificationPolicy {
        &self.policy
    }

    pub fn provider(&self) -> &Arc<dyn ProviderAdapter> {
        &self.provider
    }

    pub fn rules(&self) -> &RuleClassifier {
        &self.rules
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        let evicted = self.cache.len();
        self.cache.clear();
        info!(evicted, "classification cache cleared");
    }

    /// Classifies a query. Context, if any, only informs the prompt.
    pub async fn classify(
        &self,
        query_text: &str,
        context: Option<&ConversationContext>,
        options: ClassifyOptions,
    ) -> ClassificationResult {
        self.run(query_text, context, options, Mode::Plain).await
    }

    /// Classifies a query and fills missing parameters from the most recent
    /// matching turn when the answer is ambiguous or flagged as a follow-up.
    pub async fn classify_with_context(
        &self,
        query_text: &str,
        context: &ConversationContext,
        options: ClassifyOptions,
    ) -> ClassificationResult {
        self.run(query_text, Some(context), options, Mode::Context).await
    }

    /// Like [`classify_with_context`](Self::classify_with_context), but the
    /// decision to inherit comes from a separate yes/no completion call made
    /// concurrently with the classification call.
    pub async fn classify_with_followup_check(
        &self,
        query_text: &str,
        context: &ConversationContext,
        options: ClassifyOptions,
    ) -> ClassificationResult {
        self.run(query_text, Some(context), options, Mode::FollowupCheck)
            .await
    }

    /// Asks the completion service whether `query_text` continues the last
    /// turn. Any failure or unclear answer counts as no.
    pub async fn check_if_followup(&self, query_text: &str, context: &ConversationContext) -> bool {
        let Some(previous) = context.last() else {
            return false;
        };
        let prompts = PromptBuilder::build_followup(previous, query_text);
        match self.complete(prompts.system, prompts.user).await {
            Ok(response) => {
                let answer = parse_followup_answer(&response.content);
                debug!(?answer, "follow-up check answered");
                answer.unwrap_or(false)
            }
            Err(e) => {
                warn!(error = %e, "follow-up check failed, treating as new request");
                false
            }
        }
    }

    async fn run(
        &self,
        query_text: &str,
        context: Option<&ConversationContext>,
        options: ClassifyOptions,
        mode: Mode,
    ) -> ClassificationResult {
        let window = self.settings.context_window;
        let context = context.filter(|c| !c.is_empty());
        let key = fingerprint(query_text, context, window);
        let short_key = &key[..12];
        let use_cache = options.use_cache && self.settings.cache_enabled;

        if use_cache && let Some(hit) = self.cache.get(&key) {
            debug!(fingerprint = short_key, "classification cache hit");
            return hit.with_source(ClassificationSource::Cache);
        }

        if let Some(fixtures) = &self.fixtures
            && let Some(draft) = fixtures.lookup(query_text)
        {
            debug!(fingerprint = short_key, "classification served from fixture");
            return self.policy.finalize(&self.schema, draft);
        }

        let previous = context.and_then(|c| c.last()).map(|turn| &turn.result);

        if query_text.trim().is_empty() {
            return self.rules.classify(query_text, previous);
        }

        if let Some(previous) = previous
            && let Some(correction) = self.rules.detect_correction(query_text.trim(), previous)
        {
            debug!(fingerprint = short_key, corrects = %previous.query_type, "lexical correction detected");
            return correction;
        }

        match self.classify_remote(query_text, context, mode).await {
            Ok(result) => {
                debug!(
                    fingerprint = short_key,
                    query_type = %result.query_type,
                    confidence = result.confidence,
                    "classified by completion service"
                );
                if use_cache {
                    self.cache.insert(key, result.clone());
                }
                result
            }
            Err(e) => {
                warn!(
                    error = %e,
                    fingerprint = short_key,
                    query_len = query_text.len(),
                    "AI classification failed, using rule-based fallback"
                );
                self.rules.classify(query_text, previous)
            }
        }
    }

    async fn classify_remote(
        &self,
        query_text: &str,
        context: Option<&ConversationContext>,
        mode: Mode,
    ) -> Result<ClassificationResult, MaitreError> {
        let window = self.settings.context_window;
        let user_prompt = PromptBuilder::user_prompt(query_text, context, window);
        debug!(
            system_len = self.system_prompt.len(),
            user_len = user_prompt.len(),
            "sending classification request"
        );
        let classification_call = self.complete(self.system_prompt.clone(), user_prompt);

        let (response, confirmed_followup) = match (mode, context) {
            (Mode::FollowupCheck, Some(ctx)) => {
                // A failed classification call drops the pending follow-up check.
                let (response, followup) = tokio::try_join!(classification_call, async {
                    Ok::<_, MaitreError>(self.check_if_followup(query_text, ctx).await)
                })?;
                (response, Some(followup))
            }
            _ => (classification_call.await?, None),
        };

        let parsed = parse_response(&response.content)?;
        let query_type = QueryType::from_str(&parsed.query_type)
            .ok()
            .filter(|qt| self.schema.is_supported(*qt))
            .ok_or_else(|| MaitreError::UnsupportedQueryType(parsed.query_type.clone()))?;

        let mut parameters = parsed.parameters;
        let inherit = match mode {
            Mode::Plain => false,
            Mode::Context => {
                parsed.is_followup == Some(true)
                    || parsed.confidence < self.policy.confidence_threshold()
                    || !self.schema.missing_required(query_type, &parameters).is_empty()
            }
            Mode::FollowupCheck => confirmed_followup.unwrap_or(false),
        };
        if inherit && let Some(ctx) = context {
            self.inherit_parameters(query_type, &mut parameters, ctx);
        }

        Ok(self.policy.finalize(
            &self.schema,
            ClassificationDraft {
                query_type,
                confidence: parsed.confidence,
                parameters,
                reasoning: parsed.reasoning,
                source: ClassificationSource::Ai,
            },
        ))
    }

    /// Copies parameters absent from `parameters` out of the most recent
    /// turn of the same type.
    fn inherit_parameters(
        &self,
        query_type: QueryType,
        parameters: &mut Parameters,
        context: &ConversationContext,
    ) {
        let Some(turn) = context.last_of_type(query_type, self.settings.context_window) else {
            return;
        };
        let mut inherited = Vec::new();
        for (name, value) in &turn.result.parameters {
            if !parameters.contains_key(name) && !value.is_null() {
                parameters.insert(name.clone(), value.clone());
                inherited.push(name.as_str());
            }
        }
        if !inherited.is_empty() {
            debug!(?inherited, query_type = %query_type, "parameters inherited from context");
        }
    }

    async fn complete(
        &self,
        system_prompt: String,
        user_prompt: String,
    ) -> Result<ProviderResponse, MaitreError> {
        let request = ProviderRequest {
            model: self.settings.model.clone(),
            system_prompt,
            user_prompt,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            timeout: self.settings.timeout,
        };
        match tokio::time::timeout(self.settings.timeout, self.provider.complete(request)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(MaitreError::Timeout {
                duration: self.settings.timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{CLASSIFY_PREFIX, FOLLOWUP_QUESTION};
    use crate::types::ConversationTurn;
    use maitre_test_utils::{MockProvider, classification_json};
    use serde_json::json;
    use tracing_test::traced_test;

    fn engine(mock: &MockProvider) -> AiClassifier {
        AiClassifier::new(
            Arc::new(mock.clone()),
            Arc::new(SchemaDescription::restaurant().unwrap()),
            ClassificationPolicy::default(),
            EngineSettings::default(),
        )
    }

    fn context() -> ConversationContext {
        let result = ClassificationResult {
            query_type: QueryType::MenuInquiry,
            confidence: 0.9,
            parameters: [("category".to_string(), json!("desserts"))].into(),
            needs_clarification: false,
            clarification_question: None,
            reasoning: None,
            source: ClassificationSource::Ai,
        };
        ConversationContext::new(vec![ConversationTurn::new("What desserts do you have?", result)])
    }

    #[test]
    fn settings_follow_config() {
        let mut config = MaitreConfig::default();
        config.openai.timeout_secs = 3;
        config.classifier.context_window = 2;
        let settings = EngineSettings::from_config(&config);
        assert_eq!(settings.timeout, Duration::from_secs(3));
        assert_eq!(settings.context_window, 2);
        assert_eq!(settings.model, "gpt-4o-mini");
        assert!(ClassifyOptions::default().use_cache);
        assert!(!ClassifyOptions::no_cache().use_cache);
    }

    #[tokio::test]
    async fn followup_check_reads_yes_and_no() {
        let mock = MockProvider::new();
        let engine = engine(&mock);
        mock.add_response("Yes").await;
        mock.add_response("no, this is a new topic").await;
        mock.add_response("{\"is_followup\": true}").await;
        mock.add_response("maybe").await;

        assert!(engine.check_if_followup("and the vegan ones?", &context()).await);
        assert!(!engine.check_if_followup("show me sales", &context()).await);
        assert!(engine.check_if_followup("and cakes?", &context()).await);
        assert!(!engine.check_if_followup("hmm", &context()).await);

        let requests = mock.requests().await;
        assert!(requests[0].user_prompt.contains("What desserts do you have?"));
        assert!(requests[0].user_prompt.contains(FOLLOWUP_QUESTION));
    }

    #[tokio::test]
    async fn followup_check_without_history_makes_no_call() {
        let mock = MockProvider::new();
        let engine = engine(&mock);
        assert!(!engine.check_if_followup("anything", &ConversationContext::default()).await);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_classification_does_not_wait_for_followup_check() {
        let mock = MockProvider::new();
        mock.fail_when(CLASSIFY_PREFIX, "503 service unavailable").await;
        mock.respond_when(FOLLOWUP_QUESTION, "yes").await;
        mock.delay_when(FOLLOWUP_QUESTION, Duration::from_secs(25)).await;
        let engine = engine(&mock);

        let started = tokio::time::Instant::now();
        let result = engine
            .classify_with_followup_check("what about cakes?", &context(), ClassifyOptions::default())
            .await;
        assert_eq!(result.source, ClassificationSource::RuleBasedFallback);
        assert!(started.elapsed() < Duration::from_secs(1), "{:?}", started.elapsed());
    }

    #[tokio::test]
    async fn interjection_with_context_reaches_the_model() {
        let mock = MockProvider::new();
        mock.respond_when(
            CLASSIFY_PREFIX,
            classification_json("order_history", 0.9, json!({"date_range": "last 30 days"})),
        )
        .await;
        let engine = engine(&mock);
        let previous = ClassificationResult {
            query_type: QueryType::OrderHistory,
            confidence: 0.9,
            parameters: [("date_range".to_string(), json!("last week"))].into(),
            needs_clarification: false,
            clarification_question: None,
            reasoning: None,
            source: ClassificationSource::Ai,
        };
        let context =
            ConversationContext::new(vec![ConversationTurn::new("How many orders last week?", previous)]);

        let result = engine
            .classify_with_context(
                "Actually, show me sales for the last 30 days",
                &context,
                ClassifyOptions::default(),
            )
            .await;
        assert_eq!(result.query_type, QueryType::OrderHistory);
        assert_eq!(result.source, ClassificationSource::Ai);
        assert_eq!(result.parameters["date_range"], "last 30 days");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn fixture_results_are_not_cached() {
        let mock = MockProvider::new();
        let mut fixtures = FixtureSet::default();
        fixtures.insert("ping", QueryType::General, 0.99, Parameters::new());
        let engine = engine(&mock).with_fixtures(Some(fixtures));

        let result = engine.classify("ping", None, ClassifyOptions::default()).await;
        assert_eq!(result.source, ClassificationSource::Mock);
        assert_eq!(engine.cache_len(), 0);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn context_mode_inherits_on_low_confidence() {
        let mock = MockProvider::new();
        mock.respond_when(
            CLASSIFY_PREFIX,
            classification_json("menu_inquiry", 0.5, json!({"attribute": "ingredients"})),
        )
        .await;
        let engine = engine(&mock);

        let result = engine
            .classify_with_context("what's in them", &context(), ClassifyOptions::default())
            .await;
        assert_eq!(result.parameters["category"], "desserts");
        assert_eq!(result.parameters["attribute"], "ingredients");
        // Inheritance fills parameters; it does not raise confidence.
        assert!(result.needs_clarification);
    }

    #[tokio::test]
    async fn plain_mode_never_inherits() {
        let mock = MockProvider::new();
        mock.respond_when(
            CLASSIFY_PREFIX,
            json!({
                "query_type": "menu_inquiry",
                "confidence": 0.9,
                "parameters": {},
                "is_followup": true
            })
            .to_string(),
        )
        .await;
        let engine = engine(&mock);

        let result = engine
            .classify("and the prices?", Some(&context()), ClassifyOptions::default())
            .await;
        assert!(result.parameters.is_empty());
        let requests = mock.requests().await;
        assert!(requests[0].user_prompt.contains("What desserts do you have?"));
    }

    #[tokio::test]
    #[traced_test]
    async fn fallback_is_logged_without_query_text() {
        let mock = MockProvider::failing();
        let engine = engine(&mock);

        let result = engine
            .classify("secret menu for table nine", None, ClassifyOptions::default())
            .await;
        assert_eq!(result.source, ClassificationSource::RuleBasedFallback);
        assert!(logs_contain("AI classification failed, using rule-based fallback"));
        assert!(logs_contain("injected failure"));
        assert!(!logs_contain("table nine"));
    }
}
