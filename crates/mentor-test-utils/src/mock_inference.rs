// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock inference adapter for deterministic testing.
//!
//! `MockInference` implements `InferenceAdapter` with pre-configured replies
//! and keeps every received plan so tests can assert on prompts and budgets.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use tokio::sync::Mutex;

use mentor_core::{
    ChunkStream, HealthStatus, InferenceAdapter, InferenceChunk, InferenceResponse, MentorError,
    PluginAdapter, PromptPlan,
};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Full text. Streamed as word-sized increments followed by a done fragment.
    Text(String),
    /// Exact fragments for a streaming call, emitted as given.
    Chunks(Vec<InferenceChunk>),
    /// The call fails with an inference error carrying this message.
    Error(String),
}

/// A request the mock has received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub plan: PromptPlan,
    pub streamed: bool,
}

/// A mock inference adapter that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned.
#[derive(Clone, Default)]
pub struct MockInference {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockInference {
    /// Create a new mock with an empty reply queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock pre-loaded with text replies.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let replies: VecDeque<MockReply> = responses
            .into_iter()
            .map(|s| MockReply::Text(s.into()))
            .collect();
        Self {
            replies: Arc::new(Mutex::new(replies)),
            requests: Arc::default(),
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn push(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// All requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of inference calls made.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// The most recent plan, if any call was made.
    pub async fn last_plan(&self) -> Option<PromptPlan> {
        self.requests.lock().await.last().map(|r| r.plan.clone())
    }

    async fn next_reply(&self, plan: &PromptPlan, streamed: bool) -> MockReply {
        self.requests.lock().await.push(RecordedRequest {
            plan: plan.clone(),
            streamed,
        });
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::Text("mock response".to_string()))
    }
}

/// Splits text into increments that keep their trailing whitespace.
fn increments(text: &str) -> Vec<InferenceChunk> {
    let mut chunks: Vec<InferenceChunk> = text
        .split_inclusive(' ')
        .map(|piece| InferenceChunk {
            response: Some(piece.to_string()),
            done: false,
        })
        .collect();
    chunks.push(InferenceChunk {
        response: Some(String::new()),
        done: true,
    });
    chunks
}

#[async_trait]
impl PluginAdapter for MockInference {
    fn name(&self) -> &str {
        "mock-inference"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, MentorError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl InferenceAdapter for MockInference {
    async fn generate(&self, plan: &PromptPlan) -> Result<InferenceResponse, MentorError> {
        match self.next_reply(plan, false).await {
            MockReply::Text(response) => Ok(InferenceResponse {
                response,
                done: true,
            }),
            MockReply::Chunks(chunks) => Ok(InferenceResponse {
                response: chunks.into_iter().filter_map(|c| c.response).collect(),
                done: true,
            }),
            MockReply::Error(message) => Err(MentorError::inference(message)),
        }
    }

    async fn generate_stream(&self, plan: &PromptPlan) -> Result<ChunkStream, MentorError> {
        let chunks = match self.next_reply(plan, true).await {
            MockReply::Text(text) => increments(&text),
            MockReply::Chunks(chunks) => chunks,
            MockReply::Error(message) => return Err(MentorError::inference(message)),
        };
        Ok(Box::pin(stream::iter(chunks.into_iter().map(Ok))))
    }
}
