// src/store/memory.rs
// =============================================================================
// In-memory bookmark store.
//
// Bookmarks live in a BTreeMap keyed by id, so "all bookmarks" and "an
// owner's bookmarks" always come back in id order. A tokio RwLock lets the
// interactive commands read while a sweep writes; writes are last-write-wins.
// =============================================================================

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{Bookmark, BookmarkId, BookmarkStore, Owner, OwnerId, OwnerResolver, StatusUpdate};
use crate::error::StoreError;

/// Serialized form of a whole store: who exists and what they saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub owners: Vec<Owner>,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
}

#[derive(Debug, Default)]
struct StoreState {
    owners: BTreeMap<String, OwnerId>,
    bookmarks: BTreeMap<BookmarkId, Bookmark>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a document. Later duplicates of an id win.
    pub fn from_document(document: StoreDocument) -> Self {
        let mut state = StoreState::default();
        for owner in document.owners {
            state.owners.insert(owner.username, owner.id);
        }
        for bookmark in document.bookmarks {
            state.bookmarks.insert(bookmark.id, bookmark);
        }
        Self {
            state: RwLock::new(state),
        }
    }

    /// Snapshot of the current contents, suitable for writing to disk.
    pub async fn to_document(&self) -> StoreDocument {
        let state = self.state.read().await;
        let mut owners: Vec<Owner> = state
            .owners
            .iter()
            .map(|(username, id)| Owner {
                id: *id,
                username: username.clone(),
            })
            .collect();
        owners.sort_by_key(|owner| owner.id);

        StoreDocument {
            owners,
            bookmarks: state.bookmarks.values().cloned().collect(),
        }
    }

    pub async fn add_owner(&self, id: u64, username: impl Into<String>) {
        self.state
            .write()
            .await
            .owners
            .insert(username.into(), OwnerId(id));
    }

    /// Inserts or replaces a bookmark.
    pub async fn insert(&self, bookmark: Bookmark) {
        self.state
            .write()
            .await
            .bookmarks
            .insert(bookmark.id, bookmark);
    }
}

#[async_trait]
impl BookmarkStore for MemoryStore {
    async fn find_by_id(&self, id: BookmarkId) -> Result<Option<Bookmark>, StoreError> {
        Ok(self.state.read().await.bookmarks.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner: OwnerId) -> Result<Vec<Bookmark>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .bookmarks
            .values()
            .filter(|b| b.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Bookmark>, StoreError> {
        Ok(self.state.read().await.bookmarks.values().cloned().collect())
    }

    async fn write_statuses(&self, updates: &[StatusUpdate]) -> Result<usize, StoreError> {
        let mut state = self.state.write().await;
        let mut written = 0;
        for update in updates {
            if let Some(bookmark) = state.bookmarks.get_mut(&update.id) {
                bookmark.last_link_status = Some(update.status);
                bookmark.last_checked_at = Some(update.checked_at);
                written += 1;
            }
        }
        Ok(written)
    }
}

#[async_trait]
impl OwnerResolver for MemoryStore {
    async fn resolve_owner(&self, username: &str) -> Result<Option<OwnerId>, StoreError> {
        Ok(self.state.read().await.owners.get(username).copied())
    }
}
