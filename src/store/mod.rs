// src/store/mod.rs
// =============================================================================
// The bookmark store collaborator.
//
// The checker never owns bookmarks. It asks a store for URLs (by id, by
// owner, or everything) and, during the sweep, hands back status updates.
// Anything that implements these traits can be plugged in:
// - memory: in-process map, used by tests and embedders
// - json: a JSON file on disk, used by the CLI
// =============================================================================

mod json;
mod memory;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checker::LinkStatus;
use crate::error::StoreError;

pub use json::JsonFileStore;
pub use memory::{MemoryStore, StoreDocument};

/// Primary key of a bookmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(pub u64);

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Primary key of the user owning bookmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub u64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A stored bookmark, as much of it as link checking cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub owner_id: OwnerId,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Written only by the sweep; absent until the first sweep sees the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_link_status: Option<LinkStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl Bookmark {
    /// A fresh, never-swept bookmark.
    pub fn new(id: u64, owner_id: u64, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: BookmarkId(id),
            owner_id: OwnerId(owner_id),
            title: title.into(),
            url: url.into(),
            description: None,
            tags: Vec::new(),
            last_link_status: None,
            last_checked_at: None,
        }
    }
}

/// One sweep result to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub id: BookmarkId,
    pub status: LinkStatus,
    pub checked_at: DateTime<Utc>,
}

/// A user known to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub username: String,
}

/// Read access to bookmarks plus the sweep's bulk status write-back.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn find_by_id(&self, id: BookmarkId) -> Result<Option<Bookmark>, StoreError>;

    async fn find_by_owner(&self, owner: OwnerId) -> Result<Vec<Bookmark>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Bookmark>, StoreError>;

    /// Writes `last_link_status` / `last_checked_at` for each update.
    ///
    /// Updates for ids that no longer exist are ignored. Returns how many
    /// bookmarks were written.
    async fn write_statuses(&self, updates: &[StatusUpdate]) -> Result<usize, StoreError>;
}

/// Maps a caller identity (username) to the owner id used by the store.
#[async_trait]
pub trait OwnerResolver: Send + Sync {
    async fn resolve_owner(&self, username: &str) -> Result<Option<OwnerId>, StoreError>;
}
