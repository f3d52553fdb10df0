// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! History store trait for answered queries.

use async_trait::async_trait;

use crate::error::MentorError;
use crate::types::HistoryEntry;

/// Append-only record of answered queries.
///
/// Owned by the request-handling layer. The orchestrators never read or
/// write it.
#[async_trait]
pub trait HistoryStore: Send + Sync + 'static {
    /// Atomically appends one entry.
    async fn append(&self, entry: HistoryEntry) -> Result<(), MentorError>;

    /// Returns entries newest first, at most `limit` of them when set.
    async fn recent(&self, limit: Option<usize>) -> Result<Vec<HistoryEntry>, MentorError>;
}
