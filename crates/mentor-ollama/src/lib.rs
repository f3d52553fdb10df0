// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama inference adapter for the Mentor tutor.
//!
//! This crate implements [`InferenceAdapter`] for the Ollama native
//! `/api/generate` endpoint, providing both blocking generation and
//! line-delimited JSON streaming.

pub mod client;
pub mod stream;
pub mod types;

use async_trait::async_trait;
use mentor_config::model::OllamaConfig;
use mentor_core::{
    ChunkStream, HealthStatus, InferenceAdapter, InferenceResponse, MentorError, PluginAdapter,
    PromptPlan,
};
use tracing::{info, warn};

use crate::client::OllamaClient;

/// Ollama provider implementing [`InferenceAdapter`].
pub struct OllamaProvider {
    client: OllamaClient,
}

impl OllamaProvider {
    /// Creates a provider from the `[ollama]` configuration section.
    pub fn new(config: &OllamaConfig) -> Result<Self, MentorError> {
        let client = OllamaClient::new(config)?;
        info!(
            model = config.model,
            base_url = config.base_url,
            "Ollama provider initialized"
        );
        Ok(Self { client })
    }

    /// Loads the model ahead of the first query.
    ///
    /// Failures are logged and swallowed; the server still starts.
    pub async fn warm_up(&self) {
        match self.client.warm_up().await {
            Ok(()) => info!(model = self.client.model(), "model warmed up"),
            Err(e) => warn!(error = %e, "model warm-up failed"),
        }
    }
}

#[async_trait]
impl PluginAdapter for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, MentorError> {
        match self.client.list_models().await {
            Ok(models) => {
                let wanted = self.client.model();
                if models.iter().any(|m| m == wanted) {
                    Ok(HealthStatus::Healthy)
                } else {
                    Ok(HealthStatus::Degraded(format!("model {wanted} is not pulled")))
                }
            }
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl InferenceAdapter for OllamaProvider {
    async fn generate(&self, plan: &PromptPlan) -> Result<InferenceResponse, MentorError> {
        self.client.generate(plan).await
    }

    async fn generate_stream(&self, plan: &PromptPlan) -> Result<ChunkStream, MentorError> {
        self.client.generate_stream(plan).await
    }
}
