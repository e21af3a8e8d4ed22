// src/checker/status.rs
// =============================================================================
// The classifications a check can produce, and the small result records
// handed back to callers.
//
// JSON shape matters here: statuses serialize as "ALIVE", "DEAD", "ERROR"
// and, in batch results only, "NOT_FOUND".
// =============================================================================

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::BookmarkId;

/// Liveness of one URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkStatus {
    /// Server answered with a status in [200, 400)
    Alive,
    /// Server answered with any other status
    Dead,
    /// No usable answer: bad URL, DNS, refusal, timeout...
    Error,
}

impl LinkStatus {
    /// Dead and error links are both reported by the dead-link scan.
    pub fn is_broken(self) -> bool {
        matches!(self, LinkStatus::Dead | LinkStatus::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkStatus::Alive => "ALIVE",
            LinkStatus::Dead => "DEAD",
            LinkStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A batch entry's status: a real classification, or "no such bookmark".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Alive,
    Dead,
    Error,
    NotFound,
}

impl From<LinkStatus> for BatchStatus {
    fn from(status: LinkStatus) -> Self {
        match status {
            LinkStatus::Alive => BatchStatus::Alive,
            LinkStatus::Dead => BatchStatus::Dead,
            LinkStatus::Error => BatchStatus::Error,
        }
    }
}

impl BatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BatchStatus::Alive => "ALIVE",
            BatchStatus::Dead => "DEAD",
            BatchStatus::Error => "ERROR",
            BatchStatus::NotFound => "NOT_FOUND",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Outcome of an on-demand check of one bookmark. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub bookmark_id: BookmarkId,
    pub status: LinkStatus,
    pub checked_at: DateTime<Utc>,
}

impl CheckResult {
    pub fn now(bookmark_id: BookmarkId, status: LinkStatus) -> Self {
        Self {
            bookmark_id,
            status,
            checked_at: Utc::now(),
        }
    }
}

/// One position of a batch response: `{ "id": .., "status": .. }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub id: BookmarkId,
    pub status: BatchStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_serialize_in_upper_case() {
        assert_eq!(serde_json::to_string(&LinkStatus::Alive).unwrap(), "\"ALIVE\"");
        assert_eq!(
            serde_json::to_string(&BatchStatus::NotFound).unwrap(),
            "\"NOT_FOUND\""
        );
    }

    #[test]
    fn batch_entry_has_id_and_status_fields() {
        let entry = BatchEntry {
            id: BookmarkId(999),
            status: BatchStatus::NotFound,
        };
        let json = serde_json::to_value(entry).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 999, "status": "NOT_FOUND" }));
    }

    #[test]
    fn only_dead_and_error_are_broken() {
        assert!(!LinkStatus::Alive.is_broken());
        assert!(LinkStatus::Dead.is_broken());
        assert!(LinkStatus::Error.is_broken());
    }

    #[test]
    fn link_status_converts_into_batch_status() {
        assert_eq!(BatchStatus::from(LinkStatus::Dead), BatchStatus::Dead);
        assert_eq!(BatchStatus::from(LinkStatus::Error).to_string(), "ERROR");
    }
}
