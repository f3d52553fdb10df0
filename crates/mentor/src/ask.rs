// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mentor solve` and `mentor explain`: one query, answer on stdout.

use std::io::Write;
use std::sync::Arc;

use futures::StreamExt;
use mentor_algebra::SymbolicEngine;
use mentor_config::MentorConfig;
use mentor_core::{Answer, Delivery, MentorError, ResolutionMode};
use mentor_ollama::OllamaProvider;
use mentor_router::Tutor;

fn tutor(config: &MentorConfig) -> Result<Tutor, MentorError> {
    let provider = OllamaProvider::new(&config.ollama)?;
    Ok(Tutor::new(Arc::new(provider), Arc::new(SymbolicEngine)))
}

fn delivery(stream: bool) -> Delivery {
    if stream {
        Delivery::Streaming
    } else {
        Delivery::Blocking
    }
}

pub async fn run_solve(
    config: &MentorConfig,
    expression: &str,
    steps: bool,
    stream: bool,
) -> Result<(), MentorError> {
    let mode = if steps {
        ResolutionMode::StepByStep
    } else {
        ResolutionMode::ResultOnly
    };
    let answer = tutor(config)?
        .resolve_math(expression, mode, delivery(stream))
        .await?;
    print_answer(answer).await
}

pub async fn run_explain(
    config: &MentorConfig,
    question: &str,
    stream: bool,
) -> Result<(), MentorError> {
    let answer = tutor(config)?
        .explain_topic(question, delivery(stream))
        .await?;
    print_answer(answer).await
}

async fn print_answer(answer: Answer) -> Result<(), MentorError> {
    match answer {
        Answer::Text(text) => println!("{text}"),
        Answer::Stream(mut pieces) => {
            let mut stdout = std::io::stdout();
            while let Some(piece) = pieces.next().await {
                write!(stdout, "{}", piece?).map_err(io_error)?;
                stdout.flush().map_err(io_error)?;
            }
            writeln!(stdout).map_err(io_error)?;
        }
    }
    Ok(())
}

fn io_error(e: std::io::Error) -> MentorError {
    MentorError::Internal(format!("failed to write answer: {e}"))
}
