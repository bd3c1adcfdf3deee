// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maitre - query classification for restaurant management assistants.
//!
//! This is the binary entry point. Results are written to stdout as JSON;
//! logs go to stderr.

mod classify;
mod health;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use maitre_config::MaitreConfig;

/// Maitre - query classification for restaurant management assistants.
#[derive(Parser, Debug)]
#[command(name = "maitre", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a query and print the result.
    Classify {
        /// Query text.
        text: String,
        /// JSON file holding earlier conversation turns, oldest first.
        #[arg(long, value_name = "FILE")]
        context: Option<PathBuf>,
        /// Skip the result cache for this call.
        #[arg(long)]
        no_cache: bool,
        /// Use only the local rules, without calling the completion service.
        #[arg(long)]
        rules_only: bool,
    },
    /// Classify a query and print where it would be routed.
    Route {
        /// Query text.
        text: String,
        /// JSON file holding earlier conversation turns, oldest first.
        #[arg(long, value_name = "FILE")]
        context: Option<PathBuf>,
    },
    /// List supported query types and their target agents.
    Types,
    /// Validate configuration and exit.
    CheckConfig,
    /// Check configuration and completion-service reachability.
    Health {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            maitre_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.agent.log_level);
    tracing::debug!(config_path = ?cli.config, agent = %config.agent.name, "configuration loaded");

    let outcome = match cli.command {
        Commands::Classify {
            text,
            context,
            no_cache,
            rules_only,
        } => {
            classify::run_classify(&config, &text, context.as_deref(), no_cache, rules_only).await
        }
        Commands::Route { text, context } => {
            classify::run_route(&config, &text, context.as_deref()).await
        }
        Commands::Types => classify::run_types(&config),
        Commands::CheckConfig => {
            eprintln!("maitre: config OK (agent.name={})", config.agent.name);
            Ok(())
        }
        Commands::Health { plain } => health::run_health(&config, plain).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<MaitreConfig, Vec<maitre_config::ConfigError>> {
    match path {
        Some(path) => maitre_config::load_and_validate_path(path),
        None => maitre_config::load_and_validate(),
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("maitre={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
