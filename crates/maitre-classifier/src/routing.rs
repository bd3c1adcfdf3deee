// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing decisions: which downstream agent handles a classification.

use serde::{Deserialize, Serialize};

use crate::schema::SchemaDescription;
use crate::types::{ClassificationResult, QueryType};

/// Agent used when a type has no configured target.
pub const DEFAULT_TARGET_AGENT: &str = "orchestrator";

/// Where a classified query goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub target_agent: String,
    pub query_type: QueryType,
    pub confidence: f64,
}

impl RoutingDecision {
    pub fn for_result(schema: &SchemaDescription, result: &ClassificationResult) -> Self {
        Self {
            target_agent: schema
                .target_agent(result.query_type)
                .unwrap_or(DEFAULT_TARGET_AGENT)
                .to_string(),
            query_type: result.query_type,
            confidence: result.confidence,
        }
    }
}

/// A classification together with its routing decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedClassification {
    pub classification: ClassificationResult,
    pub routing: RoutingDecision,
}

impl RoutedClassification {
    pub fn new(schema: &SchemaDescription, classification: ClassificationResult) -> Self {
        let routing = RoutingDecision::for_result(schema, &classification);
        Self {
            classification,
            routing,
        }
    }
}
