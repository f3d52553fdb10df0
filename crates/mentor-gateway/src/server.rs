// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use mentor_config::model::ServerConfig;
use mentor_core::{HistoryStore, MentorError, PluginAdapter};
use mentor_router::Tutor;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::sse;

/// Health state for the `/health` endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: Instant,
    /// Inference adapter checked on every health request.
    pub inference: Arc<dyn PluginAdapter>,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Answers queries. Stateless, shared by every request.
    pub tutor: Arc<Tutor>,
    /// Where completed answers are recorded.
    pub history: Arc<dyn HistoryStore>,
    /// Health state for the unauthenticated health endpoint.
    pub health: HealthState,
}

/// Builds the router with every route and middleware layer.
///
/// Routes:
/// - POST /api/consulta
/// - POST /api/consulta_stream (SSE)
/// - GET /api/historial
/// - GET /health
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/consulta", post(handlers::post_consulta))
        .route("/api/consulta_stream", post(sse::post_consulta_stream))
        .route("/api/historial", get(handlers::get_history))
        .route("/health", get(handlers::get_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds to the configured host:port and serves until `cancel` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), MentorError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MentorError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| MentorError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
