// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mentor serve` command implementation.
//!
//! Builds the Ollama provider, warms the model up when configured, and
//! serves the gateway until SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::Instant;

use mentor_algebra::SymbolicEngine;
use mentor_config::MentorConfig;
use mentor_core::MentorError;
use mentor_gateway::{start_server, GatewayState, HealthState, MemoryHistory};
use mentor_ollama::OllamaProvider;
use mentor_router::Tutor;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn run_serve(config: MentorConfig) -> Result<(), MentorError> {
    let provider = Arc::new(OllamaProvider::new(&config.ollama)?);
    if config.ollama.warmup {
        provider.warm_up().await;
    }

    let state = GatewayState {
        tutor: Arc::new(Tutor::new(provider.clone(), Arc::new(SymbolicEngine))),
        history: Arc::new(MemoryHistory::new()),
        health: HealthState {
            start_time: Instant::now(),
            inference: provider,
        },
    };

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));
    start_server(&config.server, state, cancel).await?;

    info!("mentor serve shutdown complete");
    Ok(())
}

/// Cancels `cancel` on the first SIGINT or SIGTERM.
async fn cancel_on_signal(cancel: CancellationToken) {
    let signal = tokio::select! {
        () = interrupted() => "SIGINT",
        () = terminated() => "SIGTERM",
    };
    info!(signal, "stopping server");
    cancel.cancel();
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Ctrl+C will not stop the server");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminated() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            warn!(error = %e, "SIGTERM will not stop the server");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminated() {
    std::future::pending::<()>().await;
}
