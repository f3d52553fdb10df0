// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the orchestrators, the inference client and the
//! request handlers.

use std::fmt;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use futures_core::Stream;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::MentorError;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// How a math query should be answered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Ask the model for a worked, step-by-step explanation.
    StepByStep,
    /// Return only the final value, exact solve first.
    ResultOnly,
}

/// Shape of the answer requested at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delivery {
    /// Wait for the whole text.
    #[default]
    Blocking,
    /// Hand back a stream of text increments where the path supports it.
    Streaming,
}

/// Everything needed to issue one inference request, apart from the
/// deployment settings the client owns (model, keep-alive).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptPlan {
    /// Prompt text sent verbatim.
    pub prompt: String,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// Context window size.
    pub context_window: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Top-k truncation.
    pub top_k: u32,
    /// Repeat penalty, left to the server default when `None`.
    pub repeat_penalty: Option<f32>,
    /// Sequences that halt generation.
    pub stop: Vec<String>,
}

/// Full response from a blocking inference call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct InferenceResponse {
    /// Generated text. Missing or null on the wire becomes empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub response: String,
    /// Whether the server reported completion.
    #[serde(default)]
    pub done: bool,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One fragment of a streamed inference response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct InferenceChunk {
    /// Text increment, if any.
    #[serde(default)]
    pub response: Option<String>,
    /// Set on the final fragment.
    #[serde(default)]
    pub done: bool,
}

/// Fixed fallback texts returned when a resolution path yields nothing usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    /// A formula with variables but no values, and the model said nothing.
    NoNumericFormula,
    /// Step-by-step solving produced no text.
    Unsolved,
    /// The result-only fallback produced no text at all.
    NoNumber,
    /// A topic explanation produced no text.
    Unexplained,
}

impl Sentinel {
    /// The exact user-visible text.
    pub fn text(self) -> &'static str {
        match self {
            Sentinel::NoNumericFormula => "📐 Fórmula sin valores numéricos",
            Sentinel::Unsolved => "🛑 No pude resolver la ecuación.",
            Sentinel::NoNumber => "🛑 No reconozco un número.",
            Sentinel::Unexplained => "🛑 No pude explicar el tema.",
        }
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Result of a result-only math resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// Exact solve of an equation: `variable = value`.
    SymbolicSolution { variable: String, value: String },
    /// A bare number, either evaluated or pulled out of model text.
    NumericValue { value: String },
    /// Model text used as-is.
    ModelText { text: String },
    /// Nothing usable; rendered as the sentinel text.
    Failure(Sentinel),
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveOutcome::SymbolicSolution { variable, value } => write!(f, "{variable} = {value}"),
            SolveOutcome::NumericValue { value } => f.write_str(value),
            SolveOutcome::ModelText { text } => f.write_str(text),
            SolveOutcome::Failure(sentinel) => sentinel.fmt(f),
        }
    }
}

/// Lazy, single-pass sequence of text increments.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, MentorError>> + Send>>;

/// An orchestrator's answer: materialized text or a stream of increments.
pub enum Answer {
    Text(String),
    Stream(TextStream),
}

impl Answer {
    /// Returns true when the answer is still to be streamed.
    pub fn is_stream(&self) -> bool {
        matches!(self, Answer::Stream(_))
    }

    /// Drains the answer into a single string.
    pub async fn into_text(self) -> Result<String, MentorError> {
        match self {
            Answer::Text(text) => Ok(text),
            Answer::Stream(mut stream) => {
                let mut text = String::new();
                while let Some(piece) = stream.next().await {
                    text.push_str(&piece?);
                }
                Ok(text)
            }
        }
    }
}

impl fmt::Debug for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Answer::Stream(_) => f.write_str("Stream(<text stream>)"),
        }
    }
}

/// Category of an answered query, as shown to the user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum QueryKind {
    #[strum(serialize = "Matemáticas")]
    #[serde(rename = "Matemáticas")]
    Math,
    #[strum(serialize = "Tema General")]
    #[serde(rename = "Tema General")]
    Topic,
}

/// One answered query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(rename = "tipo")]
    pub kind: QueryKind,
    #[serde(rename = "pregunta")]
    pub question: String,
    #[serde(rename = "respuesta")]
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Creates an entry stamped with a fresh id and the current time.
    pub fn new(kind: QueryKind, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            question: question.into(),
            answer: answer.into(),
            created_at: Utc::now(),
        }
    }
}
