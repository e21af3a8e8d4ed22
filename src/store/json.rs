// src/store/json.rs
// =============================================================================
// A bookmark store backed by one JSON file.
//
// File format:
//   {
//     "owners":    [ { "id": 1, "username": "alice" } ],
//     "bookmarks": [ { "id": 1, "owner_id": 1, "title": "...", "url": "..." } ]
//   }
//
// The whole document is loaded into a MemoryStore on open. Reads are served
// from memory. Status write-back rewrites the file first (temp file + rename,
// so a crash never leaves half a document behind) and only then updates
// memory, so memory never holds statuses the file does not.
// =============================================================================

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::memory::{MemoryStore, StoreDocument};
use super::{Bookmark, BookmarkId, BookmarkStore, OwnerId, OwnerResolver, StatusUpdate};
use crate::error::StoreError;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
    // Serializes file rewrites
    persist: Mutex<()>,
}

impl JsonFileStore {
    /// Loads the store document at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let raw = tokio::fs::read(&path)
            .await
            .map_err(|source| io_error(&path, source))?;
        let document: StoreDocument = serde_json::from_slice(&raw)?;

        log::debug!(
            "loaded {} bookmark(s) and {} owner(s) from {}",
            document.bookmarks.len(),
            document.owners.len(),
            path.display()
        );

        Ok(Self {
            path,
            inner: MemoryStore::from_document(document),
            persist: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_document(&self, document: &StoreDocument) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(document)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|source| io_error(&tmp, source))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| io_error(&self.path, source))?;
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[async_trait]
impl BookmarkStore for JsonFileStore {
    async fn find_by_id(&self, id: BookmarkId) -> Result<Option<Bookmark>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_owner(&self, owner: OwnerId) -> Result<Vec<Bookmark>, StoreError> {
        self.inner.find_by_owner(owner).await
    }

    async fn find_all(&self) -> Result<Vec<Bookmark>, StoreError> {
        self.inner.find_all().await
    }

    async fn write_statuses(&self, updates: &[StatusUpdate]) -> Result<usize, StoreError> {
        let _guard = self.persist.lock().await;

        // Apply to a copy, get it on disk, then publish to readers
        let staged = MemoryStore::from_document(self.inner.to_document().await);
        let written = staged.write_statuses(updates).await?;
        self.write_document(&staged.to_document().await).await?;

        self.inner.write_statuses(updates).await?;
        Ok(written)
    }
}

#[async_trait]
impl OwnerResolver for JsonFileStore {
    async fn resolve_owner(&self, username: &str) -> Result<Option<OwnerId>, StoreError> {
        self.inner.resolve_owner(username).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::LinkStatus;
    use chrono::Utc;

    const DOCUMENT: &str = r#"{
        "owners": [ { "id": 7, "username": "alice" } ],
        "bookmarks": [
            { "id": 1, "owner_id": 7, "title": "Rust", "url": "https://www.rust-lang.org", "tags": ["lang"] },
            { "id": 2, "owner_id": 7, "title": "Docs", "url": "https://docs.rs" }
        ]
    }"#;

    #[tokio::test]
    async fn opens_and_persists_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        std::fs::write(&path, DOCUMENT).unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(store.resolve_owner("alice").await.unwrap(), Some(OwnerId(7)));
        assert_eq!(store.find_all().await.unwrap().len(), 2);

        let update = StatusUpdate {
            id: BookmarkId(2),
            status: LinkStatus::Dead,
            checked_at: Utc::now(),
        };
        assert_eq!(store.write_statuses(&[update]).await.unwrap(), 1);

        // A fresh open sees what the sweep wrote
        let reopened = JsonFileStore::open(&path).await.unwrap();
        let bookmark = reopened.find_by_id(BookmarkId(2)).await.unwrap().unwrap();
        assert_eq!(bookmark.last_link_status, Some(LinkStatus::Dead));
        let untouched = reopened.find_by_id(BookmarkId(1)).await.unwrap().unwrap();
        assert_eq!(untouched.last_link_status, None);
        assert_eq!(untouched.tags, vec!["lang".to_string()]);
    }

    #[tokio::test]
    async fn failed_write_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        std::fs::write(&path, DOCUMENT).unwrap();
        let store = JsonFileStore::open(&path).await.unwrap();

        // A non-empty directory in place of the file makes the rename fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("blocker"), "x").unwrap();

        let update = StatusUpdate {
            id: BookmarkId(1),
            status: LinkStatus::Dead,
            checked_at: Utc::now(),
        };
        let err = store.write_statuses(&[update]).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));

        let bookmark = store.find_by_id(BookmarkId(1)).await.unwrap().unwrap();
        assert_eq!(bookmark.last_link_status, None);
        assert_eq!(bookmark.last_checked_at, None);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileStore::open(dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[tokio::test]
    async fn invalid_json_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
