// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `maitre health` command implementation.
//!
//! Checks the classification schema and completion-service reachability.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use maitre_classifier::SchemaDescription;
use maitre_config::MaitreConfig;
use maitre_core::MaitreError;
use maitre_core::types::HealthStatus;

use crate::classify::build_classifier;

/// Status of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

/// Run `maitre health`. Fails when any check fails.
pub async fn run_health(config: &MaitreConfig, plain: bool) -> Result<(), MaitreError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = vec![check_schema(config), check_completion_service(config).await];

    println!();
    println!("  maitre health");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", render_line(result, use_color));
    }
    println!();

    let failed = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    if failed > 0 {
        return Err(MaitreError::Internal(format!("{failed} health check(s) failed")));
    }
    Ok(())
}

fn check_schema(config: &MaitreConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match SchemaDescription::from_config(&config.schema) {
        Ok(schema) => (
            CheckStatus::Pass,
            format!("{} query types", schema.query_types().len()),
        ),
        Err(e) => (CheckStatus::Fail, e.to_string()),
    };
    CheckResult {
        name: "Schema".to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

async fn check_completion_service(config: &MaitreConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match build_classifier(config) {
        Err(e) => (CheckStatus::Fail, e.to_string()),
        Ok(classifier) => health_to_check(classifier.health_check().await, &config.openai.model),
    };
    CheckResult {
        name: "Completion service".to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

fn health_to_check(
    health: Result<HealthStatus, MaitreError>,
    model: &str,
) -> (CheckStatus, String) {
    match health {
        Ok(HealthStatus::Healthy) => (CheckStatus::Pass, format!("reachable (model {model})")),
        Ok(HealthStatus::Degraded(reason)) => (CheckStatus::Warn, reason),
        Ok(HealthStatus::Unhealthy(reason)) => (CheckStatus::Fail, reason),
        Err(e) => (CheckStatus::Fail, e.to_string()),
    }
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!("    {symbol} {:<20} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!("    {tag} {:<20} {} ({duration_ms}ms)", result.name, result.message)
    }
}
