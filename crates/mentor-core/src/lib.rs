// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Mentor tutor.
//!
//! This crate provides the error type, the shared data model, and the
//! adapter traits used throughout the Mentor workspace. The inference
//! client and the history store implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MentorError;
pub use types::{
    Answer, Delivery, HealthStatus, HistoryEntry, InferenceChunk, InferenceResponse, PromptPlan,
    QueryKind, ResolutionMode, Sentinel, SolveOutcome, TextStream,
};

pub use traits::{ChunkStream, HistoryStore, InferenceAdapter, PluginAdapter};
