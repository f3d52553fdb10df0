// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./mentor.toml` > `~/.config/mentor/mentor.toml` > `/etc/mentor/mentor.toml`
//! with environment variable overrides via `MENTOR_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MentorConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/mentor/mentor.toml`
/// 3. `~/.config/mentor/mentor.toml`
/// 4. `./mentor.toml`
/// 5. `MENTOR_*` environment variables
pub fn load_config() -> Result<MentorConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<MentorConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MentorConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MentorConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MentorConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MentorConfig::default()))
        .merge(Toml::file("/etc/mentor/mentor.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("mentor/mentor.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("mentor.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that
/// `MENTOR_OLLAMA_BASE_URL` maps to `ollama.base_url`, not `ollama.base.url`.
fn env_provider() -> Env {
    Env::prefixed("MENTOR_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("server_", "server.", 1)
            .replacen("ollama_", "ollama.", 1)
            .replacen("logging_", "logging.", 1);
        mapped.into()
    })
}
