// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Maitre integration tests.

pub mod mock_provider;

pub use mock_provider::{MockProvider, classification_json};
