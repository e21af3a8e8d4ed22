// src/checker/dead_links.rs
// =============================================================================
// Finds one owner's bookmarks whose links are dead or erroring *right now*.
//
// Every bookmark is re-checked live; the status persisted by the sweep is
// not consulted. Results keep the store's order.
// =============================================================================

use std::sync::Arc;

use super::http::UrlHealthChecker;
use crate::config::clamp_concurrency;
use crate::error::LinkCheckError;
use crate::store::{Bookmark, BookmarkStore, OwnerId, OwnerResolver};

pub struct DeadLinkScanner {
    checker: UrlHealthChecker,
    store: Arc<dyn BookmarkStore>,
    owners: Arc<dyn OwnerResolver>,
    concurrency: usize,
}

impl DeadLinkScanner {
    pub fn new(
        checker: UrlHealthChecker,
        store: Arc<dyn BookmarkStore>,
        owners: Arc<dyn OwnerResolver>,
        concurrency: usize,
    ) -> Self {
        Self {
            checker,
            store,
            owners,
            concurrency: clamp_concurrency(concurrency),
        }
    }

    /// Resolves `username` to an owner, then scans that owner's bookmarks.
    pub async fn scan_for_user(&self, username: &str) -> Result<Vec<Bookmark>, LinkCheckError> {
        let owner = self
            .owners
            .resolve_owner(username)
            .await?
            .ok_or_else(|| LinkCheckError::UnknownOwner(username.to_string()))?;

        self.scan_dead_links(owner).await
    }

    /// Returns the owner's bookmarks that currently check as DEAD or ERROR.
    pub async fn scan_dead_links(&self, owner: OwnerId) -> Result<Vec<Bookmark>, LinkCheckError> {
        let mut bookmarks = self.store.find_by_owner(owner).await?;

        // Never trust the collaborator with the ownership boundary
        let before = bookmarks.len();
        bookmarks.retain(|b| b.owner_id == owner);
        if bookmarks.len() != before {
            log::warn!(
                "store returned {} bookmark(s) not owned by {}; ignoring them",
                before - bookmarks.len(),
                owner
            );
        }

        let checked = self
            .checker
            .check_bookmarks(bookmarks, self.concurrency)
            .await;

        let dead: Vec<Bookmark> = checked
            .into_iter()
            .filter(|(_, status)| status.is_broken())
            .map(|(bookmark, _)| bookmark)
            .collect();

        log::info!("owner {}: {} dead or erroring link(s)", owner, dead.len());
        Ok(dead)
    }
}
