// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Ollama generate API.
//!
//! Provides [`OllamaClient`] which handles request construction, blocking and
//! streamed generation, the startup warm-up call, and the model listing used
//! for health checks. There are no retries: a failed call is reported once.

use std::time::Duration;

use mentor_config::model::OllamaConfig;
use mentor_core::{ChunkStream, InferenceResponse, MentorError, PromptPlan};
use tracing::debug;

use crate::stream::parse_ndjson_stream;
use crate::types::{ApiErrorResponse, GenerateOptions, GenerateRequest, TagsResponse};

/// Prompt used to load the model into memory.
const WARMUP_PROMPT: &str = "hi";

/// HTTP client for Ollama API communication.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    keep_alive: String,
    timeout: Duration,
}

impl OllamaClient {
    /// Creates a client from the `[ollama]` configuration section.
    pub fn new(config: &OllamaConfig) -> Result<Self, MentorError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MentorError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            keep_alive: config.keep_alive.clone(),
            timeout,
        })
    }

    /// Returns the configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    fn request(&self, prompt: &str, options: GenerateOptions, stream: bool) -> GenerateRequest {
        GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream,
            keep_alive: self.keep_alive.clone(),
            options,
        }
    }

    async fn post(&self, request: &GenerateRequest) -> Result<reqwest::Response, MentorError> {
        let response = self
            .client
            .post(self.generate_url())
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        let status = response.status();
        debug!(status = %status, stream = request.stream, "generate response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => format!("Ollama API error ({status}): {}", api_err.error),
            Err(_) => format!("API returned {status}: {body}"),
        };
        Err(MentorError::inference(message))
    }

    /// Sends a blocking request and returns the full response.
    pub async fn generate(&self, plan: &PromptPlan) -> Result<InferenceResponse, MentorError> {
        let request = self.request(&plan.prompt, GenerateOptions::from(plan), false);
        let response = self.post(&request).await?;

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        serde_json::from_str(&body).map_err(|e| MentorError::Inference {
            message: format!("failed to parse generate response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Sends a streaming request and returns the fragments as they arrive.
    pub async fn generate_stream(&self, plan: &PromptPlan) -> Result<ChunkStream, MentorError> {
        let request = self.request(&plan.prompt, GenerateOptions::from(plan), true);
        let response = self.post(&request).await?;
        Ok(parse_ndjson_stream(response.bytes_stream(), self.timeout))
    }

    /// Issues a tiny generation so the server loads the model before the
    /// first real query.
    pub async fn warm_up(&self) -> Result<(), MentorError> {
        let options = GenerateOptions {
            num_predict: Some(5),
            num_ctx: Some(128),
            ..Default::default()
        };
        let request = self.request(WARMUP_PROMPT, options, false);
        self.post(&request).await?;
        Ok(())
    }

    /// Lists the models available on the server.
    pub async fn list_models(&self) -> Result<Vec<String>, MentorError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MentorError::inference(format!("API returned {status}")));
        }
        let tags: TagsResponse = response.json().await.map_err(|e| MentorError::Inference {
            message: format!("failed to parse model list: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

/// Maps a reqwest failure, turning an expired deadline into [`MentorError::Timeout`].
pub(crate) fn transport_error(e: reqwest::Error, timeout: Duration) -> MentorError {
    if e.is_timeout() {
        MentorError::Timeout { duration: timeout }
    } else {
        MentorError::Inference {
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OllamaClient {
        let config = OllamaConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..Default::default()
        };
        OllamaClient::new(&config).unwrap()
    }

    fn test_plan() -> PromptPlan {
        PromptPlan {
            prompt: "Resuelve 2*x = ".into(),
            max_tokens: 15,
            context_window: 128,
            temperature: 0.0,
            top_p: 0.9,
            top_k: 5,
            repeat_penalty: None,
            stop: Vec::new(),
        }
    }

    #[tokio::test]
    async fn generate_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({
                "model": "qwen2.5:1.5b",
                "prompt": "Resuelve 2*x = ",
                "stream": false,
                "keep_alive": "10m",
                "options": {"num_predict": 15, "num_ctx": 128, "top_k": 5}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "qwen2.5:1.5b",
                "response": " 2",
                "done": true,
                "eval_count": 2
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.generate(&test_plan()).await.unwrap();
        assert_eq!(result.response, " 2");
        assert!(result.done);
    }

    #[tokio::test]
    async fn generate_surfaces_api_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"error": "model 'qwen2.5:1.5b' not found"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.generate(&test_plan()).await.unwrap_err().to_string();
        assert!(err.contains("not found"), "got: {err}");
        assert!(err.contains("404"), "got: {err}");
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.generate(&test_plan()).await.unwrap_err().to_string();
        assert!(err.contains("overloaded"), "got: {err}");
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response": "late", "done": true}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = OllamaConfig {
            base_url: server.uri(),
            timeout_secs: 1,
            ..Default::default()
        };
        let client = OllamaClient::new(&config).unwrap();
        let err = client.generate(&test_plan()).await.unwrap_err();
        assert!(matches!(err, MentorError::Timeout { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn unreachable_server_is_inference_error() {
        let client = test_client("http://127.0.0.1:9");
        let err = client.generate(&test_plan()).await.unwrap_err();
        assert!(matches!(err, MentorError::Inference { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn generate_stream_yields_fragments() {
        let server = MockServer::start().await;

        let body = concat!(
            "{\"response\":\"Paso 1\",\"done\":false}\n",
            "{\"response\":\". Fin\",\"done\":false}\n",
            "{\"response\":\"\",\"done\":true,\"eval_count\":4}\n",
        );
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({"stream": true})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/x-ndjson")
                    .set_body_string(body),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let chunks: Vec<_> = client
            .generate_stream(&test_plan())
            .await
            .unwrap()
            .collect()
            .await;

        let text: String = chunks
            .iter()
            .filter_map(|c| c.as_ref().unwrap().response.clone())
            .collect();
        assert_eq!(text, "Paso 1. Fin");
        assert!(chunks.last().unwrap().as_ref().unwrap().done);
    }

    #[tokio::test]
    async fn warm_up_sends_minimal_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({
                "prompt": "hi",
                "stream": false,
                "options": {"num_predict": 5, "num_ctx": 128}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response": "Hello", "done": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client.warm_up().await.unwrap();
    }

    #[tokio::test]
    async fn list_models_reads_tags() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{"name": "qwen2.5:1.5b"}, {"name": "llama3.2:3b"}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let models = client.list_models().await.unwrap();
        assert_eq!(models, vec!["qwen2.5:1.5b", "llama3.2:3b"]);
    }

    #[test]
    fn trailing_slash_in_base_url_is_ignored() {
        let client = test_client("http://localhost:11434/");
        assert_eq!(client.generate_url(), "http://localhost:11434/api/generate");
    }
}
