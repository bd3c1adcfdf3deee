// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query classification for the Maitre restaurant assistant.
//!
//! A natural-language request is mapped to a [`QueryType`], a confidence,
//! and extracted parameters, then routed to the agent that handles it.
//! The completion service is the primary path; the [`RuleClassifier`]
//! answers whenever that path fails. [`QueryClassifier`] is the façade
//! other subsystems call and never returns an error after construction.

pub mod cache;
pub mod engine;
pub mod facade;
pub mod fixtures;
pub mod parse;
pub mod policy;
pub mod prompt;
pub mod routing;
pub mod rules;
pub mod schema;
pub mod types;

pub use cache::ClassificationCache;
pub use engine::{AiClassifier, ClassifyOptions, EngineSettings};
pub use facade::QueryClassifier;
pub use fixtures::FixtureSet;
pub use policy::{ClassificationDraft, ClassificationPolicy};
pub use routing::{RoutedClassification, RoutingDecision};
pub use rules::RuleClassifier;
pub use schema::SchemaDescription;
pub use types::{
    ClassificationResult, ClassificationSource, ConversationContext, ConversationTurn,
    Parameters, QueryType,
};
