// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events streaming for POST /api/consulta_stream.
//!
//! Every event is a bare `data:` line carrying one JSON object:
//! ```text
//! data: {"tipo": "Matemáticas", "pregunta": "2x+3=7", "start": true}
//!
//! data: {"chunk": "Paso 1: "}
//!
//! data: {"done": true, "respuesta": "Paso 1: ..."}
//! ```
//!
//! Failures are sent as a single `{"error": "..."}` event and end the stream.
//! Only answers whose model stream delivered its final fragment reach `done`
//! and are recorded in the history.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::{self, Stream, StreamExt};
use mentor_core::{Answer, Delivery, HistoryEntry, HistoryStore, QueryKind, TextStream};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::RequestError;
use crate::handlers::{dispatch, ConsultaRequest};
use crate::server::GatewayState;

/// Boxed event stream handed to [`Sse`].
pub type EventStream = Pin<Box<dyn Stream<Item = Result<Event, Infallible>> + Send>>;

fn event(payload: serde_json::Value) -> Result<Event, Infallible> {
    Ok(Event::default().data(payload.to_string()))
}

fn error_event(message: &str) -> Result<Event, Infallible> {
    event(json!({ "error": message }))
}

/// POST /api/consulta_stream
pub async fn post_consulta_stream(
    State(state): State<GatewayState>,
    body: Result<Json<ConsultaRequest>, JsonRejection>,
) -> Sse<EventStream> {
    match body {
        Ok(Json(body)) => Sse::new(answer_events(state, body).await),
        Err(e) => {
            warn!(error = %e, "unreadable request body");
            let message = RequestError::from(e).to_string();
            Sse::new(Box::pin(stream::iter([error_event(&message)])))
        }
    }
}

async fn answer_events(state: GatewayState, body: ConsultaRequest) -> EventStream {
    let query = match body.validate() {
        Ok(query) => query,
        Err(e) => return Box::pin(stream::iter([error_event(&e.to_string())])),
    };

    let answer = match dispatch(&state.tutor, &query, Delivery::Streaming).await {
        Ok(answer) => answer,
        Err(e) => {
            warn!(method = ?query.method, error = %e, "streamed query failed");
            return Box::pin(stream::iter([error_event(&e.to_string())]));
        }
    };

    let kind = query.method.kind();
    let start = event(json!({ "tipo": kind, "pregunta": query.text, "start": true }));

    match answer {
        Answer::Text(text) => {
            record(
                state.history.as_ref(),
                HistoryEntry::new(kind, query.text, text.clone()),
            )
            .await;
            Box::pin(stream::iter([
                start,
                event(json!({ "chunk": text })),
                event(json!({ "done": true, "respuesta": text })),
            ]))
        }
        Answer::Stream(pieces) => {
            let relay = Relay {
                pieces,
                full: String::new(),
                history: state.history,
                kind,
                question: query.text,
            };
            Box::pin(stream::iter([start]).chain(relay_events(relay)))
        }
    }
}

async fn record(history: &dyn HistoryStore, entry: HistoryEntry) {
    if let Err(e) = history.append(entry).await {
        warn!(error = %e, "failed to record history entry");
    }
}

/// Forwards text increments as they arrive, accumulating the full answer.
struct Relay {
    pieces: TextStream,
    full: String,
    history: Arc<dyn HistoryStore>,
    kind: QueryKind,
    question: String,
}

fn relay_events(relay: Relay) -> impl Stream<Item = Result<Event, Infallible>> + Send {
    stream::unfold(Some(relay), |state| async move {
        let mut relay = state?;
        match relay.pieces.next().await {
            Some(Ok(piece)) => {
                relay.full.push_str(&piece);
                Some((event(json!({ "chunk": piece })), Some(relay)))
            }
            Some(Err(e)) => {
                warn!(error = %e, "stream interrupted");
                Some((error_event(&e.to_string()), None))
            }
            // a clean end means the final fragment arrived
            None => {
                debug!(chars = relay.full.chars().count(), "stream complete");
                let entry = HistoryEntry::new(relay.kind, relay.question, relay.full.clone());
                record(relay.history.as_ref(), entry).await;
                Some((event(json!({ "done": true, "respuesta": relay.full })), None))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use mentor_core::InferenceChunk;
    use mentor_test_utils::{MockInference, MockReply};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::server::build_router;
    use crate::test_support::state_with;

    async fn stream_events(state: GatewayState, body: Value) -> Vec<Value> {
        stream_raw(state, body.to_string()).await
    }

    async fn stream_raw(state: GatewayState, body: String) -> Vec<Value> {
        let response = build_router(state)
            .oneshot(
                Request::post("/api/consulta_stream")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec())
            .unwrap()
            .lines()
            .filter_map(|line| line.strip_prefix("data: "))
            .map(|data| serde_json::from_str(data).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn streamed_steps_relay_every_fragment() {
        let inference = MockInference::with_responses(["Paso 1. Paso 2."]);
        let state = state_with(inference);
        let events = stream_events(
            state.clone(),
            json!({"metodo": "mate_pasos", "ecuacion": "2x+3=7"}),
        )
        .await;

        assert_eq!(events[0]["start"], true);
        assert_eq!(events[0]["tipo"], "Matemáticas");
        assert_eq!(events[0]["pregunta"], "2x+3=7");
        let chunks: String = events[1..events.len() - 1]
            .iter()
            .map(|e| e["chunk"].as_str().unwrap())
            .collect();
        assert_eq!(chunks, "Paso 1. Paso 2.");
        let last = events.last().unwrap();
        assert_eq!(last["done"], true);
        assert_eq!(last["respuesta"], "Paso 1. Paso 2.");

        let history = state.history.recent(None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].answer, "Paso 1. Paso 2.");
    }

    #[tokio::test]
    async fn result_only_is_a_single_chunk() {
        let events = stream_events(
            state_with(MockInference::new()),
            json!({"metodo": "mate_res", "ecuacion": "2x+3=7"}),
        )
        .await;
        assert_eq!(events.len(), 3);
        assert_eq!(events[1]["chunk"], "x = 2");
        assert_eq!(events[2]["respuesta"], "x = 2");
    }

    #[tokio::test]
    async fn stream_stops_at_done() {
        let inference = MockInference::new();
        let chunk = |text: &str, done| InferenceChunk {
            response: Some(text.to_string()),
            done,
        };
        inference
            .push(MockReply::Chunks(vec![
                chunk("La luz ", false),
                chunk("", true),
                chunk("sobra", false),
            ]))
            .await;
        let events = stream_events(
            state_with(inference),
            json!({"metodo": "explicar", "pregunta": "luz"}),
        )
        .await;

        // start, two chunks (the empty final fragment included), done
        assert_eq!(events.len(), 4);
        assert_eq!(events[2]["chunk"], "");
        assert_eq!(events[3]["respuesta"], "La luz ");
    }

    #[tokio::test]
    async fn validation_error_is_an_event() {
        let state = state_with(MockInference::new());
        let events = stream_events(state.clone(), json!({"metodo": "explicar"})).await;
        assert_eq!(events, vec![json!({"error": "Escribe una pregunta."})]);
        assert!(state.history.recent(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inference_error_is_an_event() {
        let inference = MockInference::new();
        inference.push(MockReply::Error("model not found".into())).await;
        let state = state_with(inference);
        let events = stream_events(
            state.clone(),
            json!({"metodo": "mate_pasos", "ecuacion": "x+1=2"}),
        )
        .await;
        assert_eq!(events, vec![json!({"error": "inference error: model not found"})]);
        assert!(state.history.recent(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stream_cut_before_done_is_not_recorded() {
        let inference = MockInference::new();
        inference
            .push(MockReply::Chunks(vec![InferenceChunk {
                response: Some("Paso 1. ".into()),
                done: false,
            }]))
            .await;
        let state = state_with(inference);
        let events = stream_events(
            state.clone(),
            json!({"metodo": "mate_pasos", "ecuacion": "2x+3=7"}),
        )
        .await;

        assert_eq!(events.len(), 3);
        assert_eq!(events[1]["chunk"], "Paso 1. ");
        assert_eq!(
            events[2],
            json!({"error": "inference error: stream ended before the final fragment"})
        );
        assert!(events.iter().all(|e| e.get("done").is_none()));
        assert!(state.history.recent(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_an_error_event() {
        let state = state_with(MockInference::new());
        let events = stream_raw(state.clone(), "{\"metodo\": ".into()).await;
        assert_eq!(events.len(), 1);
        let message = events[0]["error"].as_str().unwrap();
        assert!(message.starts_with("Error del servidor: "), "{message}");
        assert!(state.history.recent(None).await.unwrap().is_empty());
    }
}
