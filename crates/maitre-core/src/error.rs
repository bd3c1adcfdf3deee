// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Maitre classifier.

use thiserror::Error;

/// The primary error type used across Maitre adapters and the classification core.
///
/// Only [`MaitreError::Config`] is expected to reach a caller in steady state:
/// every other variant is absorbed by the rule-based fallback.
#[derive(Debug, Error)]
pub enum MaitreError {
    /// Configuration errors (invalid schema, empty type list, bad TOML values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Completion service errors (network failure, non-2xx status, unreadable body).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A completion call exceeded its bounded timeout.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// The completion service answered with text that is not a usable classification.
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    /// The model named a query type outside the configured set.
    #[error("unsupported query type `{0}`")]
    UnsupportedQueryType(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MaitreError {
    /// Returns true for errors that come from the completion service itself
    /// rather than from the content it returned.
    pub fn is_transient(&self) -> bool {
        matches!(self, MaitreError::Provider { .. } | MaitreError::Timeout { .. })
    }
}
