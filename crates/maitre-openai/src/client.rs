// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat completions endpoints.
//!
//! [`OpenAiClient`] builds the request, attaches bearer authentication and
//! maps every failure (transport, status, body) onto [`MaitreError::Provider`].
//! It makes a single attempt per call.

use std::time::Duration;

use maitre_core::MaitreError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

/// HTTP client for chat completions.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    endpoint: String,
}

impl OpenAiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `api_key` - bearer token
    /// * `base_url` - API root, e.g. `https://api.openai.com/v1`
    /// * `timeout` - transport-level timeout for each request
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, MaitreError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                MaitreError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| MaitreError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            endpoint: format!("{base_url}/chat/completions"),
            base_url,
        })
    }

    /// The full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one completion request and returns the parsed response.
    pub async fn complete_chat(&self, request: &ChatRequest) -> Result<ChatResponse, MaitreError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| MaitreError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "chat completion response received");

        let body = response.text().await.map_err(|e| MaitreError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => match api_err.error.type_ {
                    Some(kind) => format!("OpenAI API error ({kind}): {}", api_err.error.message),
                    None => format!("OpenAI API error: {}", api_err.error.message),
                },
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(MaitreError::Provider {
                message,
                source: None,
            });
        }

        serde_json::from_str(&body).map_err(|e| MaitreError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Lists models at `{base_url}/models` and returns the HTTP status.
    ///
    /// Used for health checks; consumes no tokens.
    pub async fn probe(&self) -> Result<reqwest::StatusCode, MaitreError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MaitreError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(response.status())
    }
}
