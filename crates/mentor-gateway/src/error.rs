// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request-level errors and their HTTP rendering.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mentor_core::MentorError;
use serde::Serialize;
use thiserror::Error;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Why a query could not be answered.
#[derive(Debug, Error)]
pub enum RequestError {
    /// `explicar` without a question.
    #[error("Escribe una pregunta.")]
    MissingQuestion,

    /// A math method without an expression.
    #[error("Escribe tu ecuación.")]
    MissingEquation,

    /// `metodo` is absent or not one of the known methods.
    #[error("Método inválido.")]
    UnknownMethod(String),

    /// The body is not JSON, or a field has the wrong type.
    #[error("Error del servidor: {0}")]
    Body(#[from] JsonRejection),

    /// The orchestrator failed, almost always at the inference call.
    #[error("Error del servidor: {0}")]
    Server(#[from] MentorError),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::MissingQuestion
            | RequestError::MissingEquation
            | RequestError::UnknownMethod(_) => StatusCode::BAD_REQUEST,
            RequestError::Body(_) | RequestError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
