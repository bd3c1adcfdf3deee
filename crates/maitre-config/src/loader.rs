// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./maitre.toml` > `~/.config/maitre/maitre.toml` > `/etc/maitre/maitre.toml`
//! with environment variable overrides via `MAITRE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MaitreConfig;

/// Sections reachable through `MAITRE_<SECTION>_<KEY>` environment variables.
const ENV_SECTIONS: &[&str] = &["agent", "openai", "classifier"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/maitre/maitre.toml`
/// 3. `~/.config/maitre/maitre.toml`
/// 4. `./maitre.toml`
/// 5. `MAITRE_*` environment variables
pub fn load_config() -> Result<MaitreConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<MaitreConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MaitreConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MaitreConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MaitreConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for XDG config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MaitreConfig::default()))
        .merge(Toml::file("/etc/maitre/maitre.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("maitre/maitre.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("maitre.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `MAITRE_OPENAI_API_KEY` to `openai.api_key`.
///
/// Only the first underscore after the section name becomes a dot, so keys
/// that contain underscores (`confidence_threshold`) survive intact.
fn env_provider() -> Env {
    Env::prefixed("MAITRE_").map(|key| {
        let key_str = key.as_str();
        ENV_SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key_str.to_string())
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_maps_section_and_keeps_underscores() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("MAITRE_CLASSIFIER_CONFIDENCE_THRESHOLD", "0.75");
            jail.set_env("MAITRE_OPENAI_API_KEY", "sk-from-env");
            let config: MaitreConfig = Figment::new()
                .merge(Serialized::defaults(MaitreConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.classifier.confidence_threshold, 0.75);
            assert_eq!(config.openai.api_key.as_deref(), Some("sk-from-env"));
            Ok(())
        });
    }

    #[test]
    fn file_in_working_directory_is_picked_up() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "maitre.toml",
                r#"
[agent]
name = "from-file"
"#,
            )?;
            let config = load_config()?;
            assert_eq!(config.agent.name, "from-file");
            Ok(())
        });
    }
}
