// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion-service request and response types shared by all provider adapters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// A single completion request: one system prompt, one user prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// Fixed model identifier.
    pub model: String,
    /// Schema-derived instructions.
    pub system_prompt: String,
    /// The query (and condensed context) to classify.
    pub user_prompt: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on the whole call, enforced by the caller.
    pub timeout: Duration,
}

/// Token usage reported by the completion service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A completion response. `content` is free-form text; it is usually,
/// but not always, a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub finish_reason: Option<String>,
    pub usage: TokenUsage,
}
