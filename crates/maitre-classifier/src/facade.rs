// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classifier façade: the only entry point other subsystems use.

use std::collections::{BTreeMap, BTreeSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use maitre_config::MaitreConfig;
use maitre_core::traits::ProviderAdapter;
use maitre_core::types::HealthStatus;
use maitre_core::MaitreError;
use tracing::error;

use crate::engine::{AiClassifier, ClassifyOptions};
use crate::policy::ClassificationDraft;
use crate::routing::RoutedClassification;
use crate::rules::MIN_RULE_CONFIDENCE;
use crate::schema::SchemaDescription;
use crate::types::{
    ClassificationResult, ClassificationSource, ConversationContext, Parameters, QueryType,
};

/// Classifies queries and never fails once constructed.
pub struct QueryClassifier {
    engine: AiClassifier,
    followup_check: bool,
}

impl QueryClassifier {
    /// Wraps an engine. `followup_check` selects the follow-up-checked entry
    /// point for queries that come with context.
    pub fn new(engine: AiClassifier, followup_check: bool) -> Self {
        Self {
            engine,
            followup_check,
        }
    }

    /// Builds the engine from configuration. Configuration errors are the
    /// only errors this type ever returns.
    pub fn from_config(
        config: &MaitreConfig,
        provider: Arc<dyn ProviderAdapter>,
    ) -> Result<Self, MaitreError> {
        let engine = AiClassifier::from_config(provider, config)?;
        Ok(Self::new(engine, config.classifier.followup_check))
    }

    /// Classifies `query_text` with default options.
    pub async fn classify_query(
        &self,
        query_text: &str,
        context: Option<&ConversationContext>,
    ) -> ClassificationResult {
        self.classify_query_with(query_text, context, ClassifyOptions::default())
            .await
    }

    /// Classifies `query_text`. Always returns a well-formed result.
    pub async fn classify_query_with(
        &self,
        query_text: &str,
        context: Option<&ConversationContext>,
        options: ClassifyOptions,
    ) -> ClassificationResult {
        let call = async {
            match context.filter(|c| !c.is_empty()) {
                Some(ctx) if self.followup_check => {
                    self.engine
                        .classify_with_followup_check(query_text, ctx, options)
                        .await
                }
                Some(ctx) => self.engine.classify_with_context(query_text, ctx, options).await,
                None => self.engine.classify(query_text, None, options).await,
            }
        };

        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(result) if self.is_consistent(&result) => result,
            Ok(result) => {
                error!(
                    query_type = %result.query_type,
                    confidence = result.confidence,
                    source = %result.source,
                    "classification violated result invariants, returning guard result"
                );
                self.guard_result()
            }
            Err(_panic) => {
                error!("classification panicked, returning guard result");
                self.guard_result()
            }
        }
    }

    /// Classifies and attaches the routing decision.
    pub async fn route(
        &self,
        query_text: &str,
        context: Option<&ConversationContext>,
    ) -> RoutedClassification {
        let classification = self.classify_query(query_text, context).await;
        RoutedClassification::new(self.engine.schema(), classification)
    }

    /// Supported query types, from the schema.
    pub fn get_supported_types(&self) -> BTreeSet<QueryType> {
        self.engine.schema().supported_types()
    }

    /// Target agent for every supported type.
    pub fn agent_mapping(&self) -> BTreeMap<QueryType, String> {
        self.engine.schema().agent_mapping()
    }

    pub fn schema(&self) -> &SchemaDescription {
        self.engine.schema()
    }

    /// Confidence below which results ask for clarification.
    pub fn confidence_threshold(&self) -> f64 {
        self.engine.policy().confidence_threshold()
    }

    /// Whether `result` agrees with the threshold and required-parameter rules.
    pub fn is_consistent(&self, result: &ClassificationResult) -> bool {
        self.engine.policy().is_consistent(self.engine.schema(), result)
    }

    pub fn clear_cache(&self) {
        self.engine.clear_cache();
    }

    pub fn cache_len(&self) -> usize {
        self.engine.cache_len()
    }

    /// Health of the completion service.
    pub async fn health_check(&self) -> Result<HealthStatus, MaitreError> {
        self.engine.provider().health_check().await
    }

    /// Low-confidence `general` result asking for clarification.
    fn guard_result(&self) -> ClassificationResult {
        self.engine.policy().finalize(
            self.engine.schema(),
            ClassificationDraft {
                query_type: QueryType::General,
                confidence: MIN_RULE_CONFIDENCE,
                parameters: Parameters::new(),
                reasoning: Some("classification failed unexpectedly".to_string()),
                source: ClassificationSource::RuleBasedFallback,
            },
        )
    }
}
