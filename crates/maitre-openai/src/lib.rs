// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible completion provider for the Maitre classifier.
//!
//! This crate implements [`ProviderAdapter`] over the chat completions API.
//! Each classification call becomes one system message plus one user message.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use maitre_config::MaitreConfig;
use maitre_core::error::MaitreError;
use maitre_core::traits::{PluginAdapter, ProviderAdapter};
use maitre_core::types::{HealthStatus, ProviderRequest, ProviderResponse, TokenUsage};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatMessage, ChatRequest};

/// Chat completions provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Creates a provider from the `[openai]` section of the configuration.
    pub fn new(config: &MaitreConfig) -> Result<Self, MaitreError> {
        let api_key = resolve_api_key(&config.openai.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            &config.openai.base_url,
            Duration::from_secs(config.openai.timeout_secs),
        )?;

        info!(
            model = config.openai.model,
            base_url = config.openai.base_url,
            "OpenAI provider initialized"
        );

        Ok(Self { client })
    }

    /// Creates a provider with an existing client.
    pub fn with_client(client: OpenAiClient) -> Self {
        Self { client }
    }
}

fn to_chat_request(request: &ProviderRequest) -> ChatRequest {
    ChatRequest {
        model: request.model.clone(),
        messages: vec![
            ChatMessage::system(request.system_prompt.clone()),
            ChatMessage::user(request.user_prompt.clone()),
        ],
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    }
}

/// Resolves the API key: config value first, then `OPENAI_API_KEY`.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, MaitreError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            MaitreError::Config(
                "OpenAI API key not found. Set openai.api_key in config or OPENAI_API_KEY environment variable.".into(),
            )
        })
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, MaitreError> {
        match self.client.probe().await {
            Ok(status) if status.is_success() => Ok(HealthStatus::Healthy),
            Ok(status) => Ok(HealthStatus::Degraded(format!(
                "model listing returned {status}"
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), MaitreError> {
        debug!("OpenAI provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, MaitreError> {
        let chat_request = to_chat_request(&request);
        let response = self.client.complete_chat(&chat_request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| MaitreError::Provider {
                message: "response contained no choices".into(),
                source: None,
            })?;
        let content = choice.message.content.unwrap_or_default();
        let usage = response.usage.unwrap_or_default();

        debug!(
            input_tokens = usage.prompt_tokens,
            output_tokens = usage.completion_tokens,
            "completion finished"
        );

        Ok(ProviderResponse {
            id: response.id,
            content,
            model: response.model,
            finish_reason: choice.finish_reason,
            usage: TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}
