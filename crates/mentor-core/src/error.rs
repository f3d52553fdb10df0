// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Mentor tutor.

use thiserror::Error;

/// The primary error type used across adapter traits and the orchestrators.
///
/// Local, expected failures (a symbolic solve that finds nothing) never show
/// up here: they are recovered inside the orchestrators. What remains is
/// surfaced to the caller verbatim.
#[derive(Debug, Error)]
pub enum MentorError {
    /// Configuration errors (invalid TOML, bad header values, client build failure).
    #[error("configuration error: {0}")]
    Config(String),

    /// Inference service errors (unreachable, non-2xx status, malformed body).
    #[error("inference error: {message}")]
    Inference {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The outbound inference call exceeded its timeout.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MentorError {
    /// Shorthand for an inference error without an underlying source.
    pub fn inference(message: impl Into<String>) -> Self {
        MentorError::Inference {
            message: message.into(),
            source: None,
        }
    }
}
