// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config errors as miette diagnostics.

#![allow(unused_assignments)] // emitted by the miette Diagnostic derive

use figment::error::Kind;
use miette::Diagnostic;
use thiserror::Error;

/// Jaro-Winkler score a known key needs before it is offered as a fix.
const SUGGESTION_THRESHOLD: f64 = 0.75;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown key `{key}` in {section}")]
    #[diagnostic(code(mentor::config::unknown_key), help("{}", key_help(suggestion.as_deref(), known)))]
    UnknownKey {
        key: String,
        section: String,
        suggestion: Option<String>,
        known: String,
    },

    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(mentor::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        found: String,
        expected: String,
    },

    #[error("missing key `{key}`")]
    #[diagnostic(code(mentor::config::missing_key))]
    MissingKey { key: String },

    #[error("{message}")]
    #[diagnostic(code(mentor::config::validation))]
    Validation { message: String },

    #[error("{0}")]
    #[diagnostic(code(mentor::config::other))]
    Other(String),
}

fn key_help(suggestion: Option<&str>, known: &str) -> String {
    match suggestion {
        Some(key) => format!("did you mean `{key}`? known keys: {known}"),
        None => format!("known keys: {known}"),
    }
}

/// Splits a figment error into one diagnostic per underlying failure.
pub fn from_figment(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| {
            let path = error.path.join(".");
            match error.kind {
                Kind::UnknownField(key, known) => ConfigError::UnknownKey {
                    suggestion: suggest_key(&key, known),
                    section: if path.is_empty() {
                        "the top level".to_string()
                    } else {
                        format!("[{path}]")
                    },
                    known: known.join(", "),
                    key,
                },
                Kind::InvalidType(found, expected) => ConfigError::InvalidType {
                    key: path,
                    found: found.to_string(),
                    expected,
                },
                Kind::MissingField(key) => ConfigError::MissingKey {
                    key: key.into_owned(),
                },
                other => ConfigError::Other(other.to_string()),
            }
        })
        .collect()
}

/// Closest known key to a misspelled one, if any is close enough.
pub fn suggest_key(unknown: &str, known: &[&str]) -> Option<String> {
    known
        .iter()
        .map(|key| (*key, strsim::jaro_winkler(unknown, key)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key.to_string())
}

/// Prints every error to stderr with miette's graphical report.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("config error: {error}"),
        }
    }
}
