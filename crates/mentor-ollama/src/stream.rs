// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line-delimited JSON parser for streamed `/api/generate` responses.
//!
//! Turns a response byte stream into [`InferenceChunk`]s. Network reads can
//! split a line anywhere (including inside a multi-byte character), so bytes
//! are buffered until a full line is available.

use std::pin::Pin;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures::stream::{self, Stream, StreamExt};
use mentor_core::{ChunkStream, InferenceChunk, MentorError};
use tracing::{debug, warn};

use crate::client::transport_error;
use crate::types::StreamFragment;

struct LineState<S> {
    body: Pin<Box<S>>,
    buffer: BytesMut,
    body_finished: bool,
    done: bool,
}

/// Parses a streaming body into inference fragments.
///
/// The stream ends after the fragment with `done = true`, at the end of the
/// body, or after the first error. Blank lines are skipped; a line that is
/// not valid JSON or carries an `error` field is yielded as an error.
pub fn parse_ndjson_stream<S>(body: S, timeout: Duration) -> ChunkStream
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    let state = LineState {
        body: Box::pin(body),
        buffer: BytesMut::new(),
        body_finished: false,
        done: false,
    };

    Box::pin(stream::unfold(state, move |mut state| async move {
        if state.done {
            return None;
        }
        loop {
            if let Some(line) = next_line(&mut state.buffer, state.body_finished) {
                let Some(item) = parse_line(&line) else {
                    continue;
                };
                state.done = matches!(item, Ok(InferenceChunk { done: true, .. }) | Err(_));
                return Some((item, state));
            }
            if state.body_finished {
                return None;
            }
            match state.body.next().await {
                Some(Ok(bytes)) => state.buffer.extend_from_slice(&bytes),
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(transport_error(e, timeout)), state));
                }
                None => {
                    if !state.buffer.is_empty() {
                        debug!(bytes = state.buffer.len(), "body ended without trailing newline");
                    }
                    state.body_finished = true;
                }
            }
        }
    }))
}

/// Splits the next complete line off the buffer. Once the body has ended,
/// whatever remains counts as the last line.
fn next_line(buffer: &mut BytesMut, body_finished: bool) -> Option<Bytes> {
    if let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
        let mut line = buffer.split_to(pos + 1);
        line.truncate(pos);
        return Some(line.freeze());
    }
    if body_finished && !buffer.is_empty() {
        return Some(buffer.split().freeze());
    }
    None
}

/// Returns `None` for blank lines.
fn parse_line(line: &[u8]) -> Option<Result<InferenceChunk, MentorError>> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let fragment = match serde_json::from_str::<StreamFragment>(text) {
        Ok(fragment) => fragment,
        Err(e) => {
            warn!(line = %text, "malformed stream fragment");
            return Some(Err(MentorError::Inference {
                message: format!("malformed stream fragment: {e}"),
                source: Some(Box::new(e)),
            }));
        }
    };

    if let Some(error) = fragment.error {
        return Some(Err(MentorError::inference(format!(
            "inference server error: {error}"
        ))));
    }
    Some(Ok(InferenceChunk {
        response: fragment.response,
        done: fragment.done,
    }))
}
