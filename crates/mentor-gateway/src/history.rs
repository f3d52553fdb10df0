// SPDX-FileCopyrightText: 2026 Mentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process history of answered queries.

use async_trait::async_trait;
use mentor_core::{HistoryEntry, HistoryStore, MentorError};
use tokio::sync::RwLock;

/// History kept in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: RwLock<Vec<HistoryEntry>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn append(&self, entry: HistoryEntry) -> Result<(), MentorError> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn recent(&self, limit: Option<usize>) -> Result<Vec<HistoryEntry>, MentorError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .rev()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use mentor_core::QueryKind;

    #[tokio::test]
    async fn recent_is_newest_first() {
        let history = MemoryHistory::new();
        history
            .append(HistoryEntry::new(QueryKind::Math, "2x+3=7", "x = 2"))
            .await
            .unwrap();
        history
            .append(HistoryEntry::new(QueryKind::Topic, "Roma", "Un imperio."))
            .await
            .unwrap();

        let entries = history.recent(None).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].question, "Roma");
        assert_eq!(entries[1].question, "2x+3=7");

        let latest = history.recent(Some(1)).await.unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].kind, QueryKind::Topic);
    }

    #[tokio::test]
    async fn concurrent_appends_are_all_kept() {
        let history = Arc::new(MemoryHistory::new());
        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let history = Arc::clone(&history);
                tokio::spawn(async move {
                    history
                        .append(HistoryEntry::new(QueryKind::Math, format!("{i}+1"), "ok"))
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(history.recent(None).await.unwrap().len(), 32);
    }
}
