// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mentor - a math and topic tutor.
//!
//! This is the binary entry point: it loads configuration, initializes
//! tracing, and runs either the HTTP server or a one-shot query.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod ask;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Mentor - a math and topic tutor.
#[derive(Parser, Debug)]
#[command(name = "mentor", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Start the HTTP server (the default).
    Serve,
    /// Solve or evaluate a math expression.
    Solve {
        /// Expression or equation, e.g. "2x+3=7".
        expression: String,
        /// Ask for a worked, step-by-step solution.
        #[arg(long)]
        steps: bool,
        /// Print the answer as it is generated.
        #[arg(long)]
        stream: bool,
    },
    /// Explain a general topic.
    Explain {
        /// The question to answer.
        question: String,
        /// Print the answer as it is generated.
        #[arg(long)]
        stream: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => mentor_config::load_and_validate_path(path),
        None => mentor_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            mentor_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Solve {
            expression,
            steps,
            stream,
        } => ask::run_solve(&config, &expression, steps, stream).await,
        Commands::Explain { question, stream } => {
            ask::run_explain(&config, &question, stream).await
        }
    };

    if let Err(e) = result {
        eprintln!("mentor: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mentor={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
