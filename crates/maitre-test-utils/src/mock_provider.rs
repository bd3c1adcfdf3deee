// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with scripted responses so
//! classifier tests run without network access. Responses come from three
//! places, checked in order:
//!
//! 1. prompt rules registered with [`MockProvider::respond_when`]
//! 2. a FIFO queue
//! 3. a default response
//!
//! Failure and latency can be injected to exercise fallback paths.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use maitre_core::MaitreError;
use maitre_core::traits::adapter::PluginAdapter;
use maitre_core::traits::provider::ProviderAdapter;
use maitre_core::types::{HealthStatus, ProviderRequest, ProviderResponse, TokenUsage};

/// A scripted reply: either response text or an injected provider error.
#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

/// A mock completion provider with scripted responses.
///
/// Cloning shares the underlying state, so a test can keep a handle for
/// assertions while the classifier owns another.
#[derive(Clone)]
pub struct MockProvider {
    rules: Arc<Mutex<Vec<(String, Reply)>>>,
    queue: Arc<Mutex<VecDeque<Reply>>>,
    default_response: Arc<Mutex<Reply>>,
    fail_all: Arc<AtomicBool>,
    delay: Arc<Mutex<Option<Duration>>>,
    delay_rules: Arc<Mutex<Vec<(String, Duration)>>>,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
}

impl MockProvider {
    /// Create a mock provider with no scripted responses.
    pub fn new() -> Self {
        Self {
            rules: Arc::new(Mutex::new(Vec::new())),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            default_response: Arc::new(Mutex::new(Reply::Text("mock response".to_string()))),
            fail_all: Arc::new(AtomicBool::new(false)),
            delay: Arc::new(Mutex::new(None)),
            delay_rules: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider pre-loaded with queued responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        let provider = Self::new();
        if let Ok(mut queue) = provider.queue.try_lock() {
            queue.extend(responses.into_iter().map(Reply::Text));
        }
        provider
    }

    /// Create a mock provider whose every call fails with a provider error.
    pub fn failing() -> Self {
        let provider = Self::new();
        provider.fail_all.store(true, Ordering::SeqCst);
        provider
    }

    /// Append a response to the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.queue.lock().await.push_back(Reply::Text(text.into()));
    }

    /// Append an injected failure to the queue.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.queue.lock().await.push_back(Reply::Fail(message.into()));
    }

    /// Answer with `text` whenever the system or user prompt contains `needle`.
    ///
    /// Rules are checked before the queue, in registration order. They are
    /// not consumed, which keeps concurrent calls deterministic.
    pub async fn respond_when(&self, needle: impl Into<String>, text: impl Into<String>) {
        self.rules
            .lock()
            .await
            .push((needle.into(), Reply::Text(text.into())));
    }

    /// Fail whenever the system or user prompt contains `needle`.
    pub async fn fail_when(&self, needle: impl Into<String>, message: impl Into<String>) {
        self.rules
            .lock()
            .await
            .push((needle.into(), Reply::Fail(message.into())));
    }

    /// Replace the response used when no rule matches and the queue is empty.
    pub async fn set_default_response(&self, text: impl Into<String>) {
        *self.default_response.lock().await = Reply::Text(text.into());
    }

    /// Toggle failure of every call.
    pub fn set_failing(&self, failing: bool) {
        self.fail_all.store(failing, Ordering::SeqCst);
    }

    /// Sleep for `delay` before answering each call.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().await = delay;
    }

    /// Sleep for `delay` before answering calls whose prompts contain
    /// `needle`. Overrides [`set_delay`](Self::set_delay) for those calls.
    pub async fn delay_when(&self, needle: impl Into<String>, delay: Duration) {
        self.delay_rules.lock().await.push((needle.into(), delay));
    }

    /// Number of `complete` calls received so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in arrival order.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    async fn delay_for(&self, request: &ProviderRequest) -> Option<Duration> {
        let matched = self
            .delay_rules
            .lock()
            .await
            .iter()
            .find(|(needle, _)| {
                request.user_prompt.contains(needle.as_str())
                    || request.system_prompt.contains(needle.as_str())
            })
            .map(|(_, delay)| *delay);
        match matched {
            Some(delay) => Some(delay),
            None => *self.delay.lock().await,
        }
    }

    async fn next_reply(&self, request: &ProviderRequest) -> Reply {
        if self.fail_all.load(Ordering::SeqCst) {
            return Reply::Fail("injected failure".to_string());
        }

        let rules = self.rules.lock().await;
        let matched = rules.iter().find(|(needle, _)| {
            request.user_prompt.contains(needle.as_str())
                || request.system_prompt.contains(needle.as_str())
        });
        if let Some((_, reply)) = matched {
            return reply.clone();
        }
        drop(rules);

        if let Some(reply) = self.queue.lock().await.pop_front() {
            return reply;
        }
        self.default_response.lock().await.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a classification reply the way the completion service would.
pub fn classification_json(
    query_type: &str,
    confidence: f64,
    parameters: serde_json::Value,
) -> String {
    serde_json::json!({
        "query_type": query_type,
        "confidence": confidence,
        "parameters": parameters,
    })
    .to_string()
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, MaitreError> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Unhealthy("injected failure".to_string()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MaitreError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, MaitreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());

        if let Some(delay) = self.delay_for(&request).await {
            tokio::time::sleep(delay).await;
        }

        match self.next_reply(&request).await {
            Reply::Text(content) => Ok(ProviderResponse {
                id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
                content,
                model: request.model,
                finish_reason: Some("stop".to_string()),
                usage: TokenUsage {
                    input_tokens: 10,
                    output_tokens: 20,
                },
            }),
            Reply::Fail(message) => Err(MaitreError::Provider {
                message,
                source: None,
            }),
        }
    }
}
