// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM completion services.

use async_trait::async_trait;

use crate::error::MaitreError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for an external completion service.
///
/// Implementations make exactly one attempt per call. Timeouts are enforced
/// by the caller using [`ProviderRequest::timeout`]; retries are not the
/// adapter's business.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, MaitreError>;
}
