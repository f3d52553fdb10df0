// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inference adapter trait for language-model services.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::MentorError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InferenceChunk, InferenceResponse, PromptPlan};

/// Raw fragment stream returned by [`InferenceAdapter::generate_stream`].
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<InferenceChunk, MentorError>> + Send>>;

/// Adapter for a model-inference endpoint.
///
/// A [`PromptPlan`] fully determines the request; the adapter adds only
/// its own deployment settings (model identifier, keep-alive).
#[async_trait]
pub trait InferenceAdapter: PluginAdapter {
    /// Sends a request and waits for the full response.
    async fn generate(&self, plan: &PromptPlan) -> Result<InferenceResponse, MentorError>;

    /// Sends a streaming request and returns the fragments as they arrive.
    async fn generate_stream(&self, plan: &PromptPlan) -> Result<ChunkStream, MentorError>;
}
