// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for Mentor: the `[server]`, `[ollama]` and `[logging]`
//! sections, read from TOML files and `MENTOR_*` environment variables.
//!
//! ```no_run
//! let config = mentor_config::load_and_validate().expect("config errors");
//! println!("model: {}", config.ollama.model);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::MentorConfig;

/// Loads from the standard locations, then validates.
pub fn load_and_validate() -> Result<MentorConfig, Vec<ConfigError>> {
    checked(loader::load_config())
}

/// Loads from `path` plus environment overrides, then validates.
pub fn load_and_validate_path(path: &Path) -> Result<MentorConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path))
}

/// Loads from an inline TOML document, then validates.
pub fn load_and_validate_str(toml: &str) -> Result<MentorConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml))
}

fn checked(
    loaded: Result<MentorConfig, figment::Error>,
) -> Result<MentorConfig, Vec<ConfigError>> {
    let config = loaded.map_err(diagnostic::from_figment)?;
    validation::validate_config(&config)?;
    Ok(config)
}
