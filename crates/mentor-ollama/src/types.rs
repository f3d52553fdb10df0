// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Ollama `/api/generate` and `/api/tags` endpoints.

use mentor_core::PromptPlan;
use serde::{Deserialize, Serialize};

// --- Request types ---

/// A request to `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g., "qwen2.5:1.5b").
    pub model: String,

    /// Prompt text, sent verbatim.
    pub prompt: String,

    /// Whether the server should answer with line-delimited fragments.
    pub stream: bool,

    /// How long the model stays loaded after this request.
    pub keep_alive: String,

    /// Sampling and budget options.
    pub options: GenerateOptions,
}

/// Generation options. Unset fields are left to the server default.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_ctx: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_penalty: Option<f32>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

impl From<&PromptPlan> for GenerateOptions {
    fn from(plan: &PromptPlan) -> Self {
        Self {
            num_predict: Some(plan.max_tokens),
            temperature: Some(plan.temperature),
            top_p: Some(plan.top_p),
            top_k: Some(plan.top_k),
            num_ctx: Some(plan.context_window),
            repeat_penalty: plan.repeat_penalty,
            stop: plan.stop.clone(),
        }
    }
}

// --- Response types ---

/// One line of a streamed `/api/generate` response.
///
/// Ollama reports mid-stream failures as a line carrying only `error`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamFragment {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Error body returned with a non-2xx status.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// Body of `GET /api/tags`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

/// A locally available model.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelTag {
    pub name: String,
}
