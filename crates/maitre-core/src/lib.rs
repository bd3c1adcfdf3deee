// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Maitre query classifier.
//!
//! This crate provides the error type, the completion-service request and
//! response types, and the adapter traits every completion backend
//! implements. The classification core depends only on these.

pub mod error;
pub mod traits;
pub mod types;

pub use error::MaitreError;
pub use traits::{PluginAdapter, ProviderAdapter};
pub use types::{HealthStatus, ProviderRequest, ProviderResponse, TokenUsage};
