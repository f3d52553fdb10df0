// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! All adapters use `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod history;
pub mod inference;

pub use adapter::PluginAdapter;
pub use history::HistoryStore;
pub use inference::{ChunkStream, InferenceAdapter};
