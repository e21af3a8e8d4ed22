// src/checker/batch.rs
// =============================================================================
// Checks bookmarks by id: one at a time (`check_one`) or as an ordered batch
// (`check_batch`).
//
// Batch contract:
// - output[i] always answers input[i], duplicates included
// - ids the store does not know become NOT_FOUND, with no request sent
// - nothing inside the batch can fail the batch as a whole
// - at most `concurrency` probes are in flight at once
// =============================================================================

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use super::http::UrlHealthChecker;
use super::status::{BatchEntry, BatchStatus, CheckResult};
use crate::config::clamp_concurrency;
use crate::error::LinkCheckError;
use crate::store::{BookmarkId, BookmarkStore};

pub struct BatchChecker {
    checker: UrlHealthChecker,
    store: Arc<dyn BookmarkStore>,
    concurrency: usize,
}

impl BatchChecker {
    pub fn new(checker: UrlHealthChecker, store: Arc<dyn BookmarkStore>, concurrency: usize) -> Self {
        Self {
            checker,
            store,
            concurrency: clamp_concurrency(concurrency),
        }
    }

    /// Checks a single bookmark on demand.
    ///
    /// Unlike the batch, an unknown id is an error for the caller.
    pub async fn check_one(&self, id: BookmarkId) -> Result<CheckResult, LinkCheckError> {
        let bookmark = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(LinkCheckError::NotFound(id))?;

        let status = self.checker.check_link(&bookmark.url).await;
        Ok(CheckResult::now(id, status))
    }

    /// Checks every id, returning one entry per input position.
    pub async fn check_batch(&self, ids: &[BookmarkId]) -> Vec<BatchEntry> {
        log::debug!(
            "checking batch of {} id(s) with {} worker(s)",
            ids.len(),
            self.concurrency
        );

        let futures = ids.iter().map(|&id| self.check_entry(id));

        stream::iter(futures)
            .buffered(self.concurrency)
            .collect()
            .await
    }

    async fn check_entry(&self, id: BookmarkId) -> BatchEntry {
        let status = match self.store.find_by_id(id).await {
            Ok(Some(bookmark)) => self.checker.check_link(&bookmark.url).await.into(),
            Ok(None) => BatchStatus::NotFound,
            Err(e) => {
                // The lookup failed, not the link; report it in place
                log::warn!("store lookup for bookmark {} failed: {}", id, e);
                BatchStatus::Error
            }
        };

        BatchEntry { id, status }
    }
}
