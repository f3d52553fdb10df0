// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /api/consulta, GET /api/historial, GET /health.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mentor_core::{
    Answer, Delivery, HealthStatus, HistoryEntry, MentorError, QueryKind, ResolutionMode,
};
use mentor_router::Tutor;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::RequestError;
use crate::server::GatewayState;

/// Request body shared by both query endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ConsultaRequest {
    /// One of `explicar`, `mate_pasos`, `mate_res`.
    #[serde(default)]
    pub metodo: Option<String>,
    /// Topic question, used by `explicar`.
    #[serde(default)]
    pub pregunta: Option<String>,
    /// Math expression, used by the `mate_*` methods.
    #[serde(default)]
    pub ecuacion: Option<String>,
}

/// How the client wants a query answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Explain,
    MathSteps,
    MathResult,
}

impl Method {
    fn parse(raw: Option<&str>) -> Result<Self, RequestError> {
        match raw {
            Some("explicar") => Ok(Method::Explain),
            Some("mate_pasos") => Ok(Method::MathSteps),
            Some("mate_res") => Ok(Method::MathResult),
            other => Err(RequestError::UnknownMethod(other.unwrap_or_default().to_string())),
        }
    }

    pub fn kind(self) -> QueryKind {
        match self {
            Method::Explain => QueryKind::Topic,
            Method::MathSteps | Method::MathResult => QueryKind::Math,
        }
    }
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidQuery {
    pub method: Method,
    /// Trimmed, non-empty question or expression.
    pub text: String,
}

impl ConsultaRequest {
    /// Checks the method first, then the input it needs.
    pub fn validate(self) -> Result<ValidQuery, RequestError> {
        let method = Method::parse(self.metodo.as_deref())?;
        let (input, missing) = match method {
            Method::Explain => (self.pregunta, RequestError::MissingQuestion),
            Method::MathSteps | Method::MathResult => (self.ecuacion, RequestError::MissingEquation),
        };
        let text = input.as_deref().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(missing);
        }
        Ok(ValidQuery {
            method,
            text: text.to_string(),
        })
    }
}

/// Routes a validated query to the right orchestrator operation.
pub(crate) async fn dispatch(
    tutor: &Tutor,
    query: &ValidQuery,
    delivery: Delivery,
) -> Result<Answer, MentorError> {
    match query.method {
        Method::Explain => tutor.explain_topic(&query.text, delivery).await,
        Method::MathSteps => {
            tutor
                .resolve_math(&query.text, ResolutionMode::StepByStep, delivery)
                .await
        }
        Method::MathResult => {
            tutor
                .resolve_math(&query.text, ResolutionMode::ResultOnly, delivery)
                .await
        }
    }
}

/// Response body for POST /api/consulta.
#[derive(Debug, Serialize)]
pub struct ConsultaResponse {
    pub tipo: QueryKind,
    pub pregunta: String,
    pub respuesta: String,
    /// Wall time spent answering, e.g. `"1.3s"`.
    pub tiempo: String,
}

/// POST /api/consulta
///
/// Answers synchronously and records the answer in the history.
pub async fn post_consulta(
    State(state): State<GatewayState>,
    body: Result<Json<ConsultaRequest>, JsonRejection>,
) -> Result<Json<ConsultaResponse>, RequestError> {
    let start = Instant::now();
    let Json(body) = body.inspect_err(|e| warn!(error = %e, "unreadable request body"))?;
    let query = body.validate()?;

    let answer = match dispatch(&state.tutor, &query, Delivery::Blocking).await {
        Ok(answer) => answer.into_text().await?,
        Err(e) => {
            error!(method = ?query.method, error = %e, "query failed");
            return Err(e.into());
        }
    };

    let kind = query.method.kind();
    let entry = HistoryEntry::new(kind, query.text.clone(), answer.clone());
    if let Err(e) = state.history.append(entry).await {
        warn!(error = %e, "failed to record history entry");
    }

    let elapsed = start.elapsed();
    info!(method = ?query.method, elapsed_ms = elapsed.as_millis() as u64, "query answered");

    Ok(Json(ConsultaResponse {
        tipo: kind,
        pregunta: query.text,
        respuesta: answer,
        tiempo: format!("{:.1}s", elapsed.as_secs_f64()),
    }))
}

/// Query parameters for GET /api/historial.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    /// Maximum number of entries to return.
    pub limit: Option<usize>,
}

/// GET /api/historial
///
/// Returns answered queries, newest first.
pub async fn get_history(
    State(state): State<GatewayState>,
    Query(params): Query<HistoryParams>,
) -> Response {
    match state.history.recent(params.limit).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => RequestError::Server(e).into_response(),
    }
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when inference is healthy, `degraded` otherwise.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the gateway state was created.
    pub uptime_secs: u64,
    /// Inference adapter status, with the reason when not healthy.
    pub inference: String,
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> (StatusCode, Json<HealthResponse>) {
    let inference = match state.health.inference.health_check().await {
        Ok(status) => status,
        Err(e) => HealthStatus::Unhealthy(e.to_string()),
    };
    let (status, inference) = match inference {
        HealthStatus::Healthy => ("ok", "healthy".to_string()),
        HealthStatus::Degraded(reason) => ("degraded", format!("degraded: {reason}")),
        HealthStatus::Unhealthy(reason) => ("degraded", format!("unhealthy: {reason}")),
    };
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: state.health.start_time.elapsed().as_secs(),
            inference,
        }),
    )
}
