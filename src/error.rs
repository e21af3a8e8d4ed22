// src/error.rs
// =============================================================================
// Error types for the whole library.
//
// There are three layers of failure:
// - ProbeError: why a single URL probe did not come back "alive". These are
//   NEVER returned to callers of the checker; they are folded into a
//   LinkStatus (see checker::http).
// - StoreError: the bookmark store could not be read or written.
// - LinkCheckError: what interactive operations (single check, dead-link
//   scan) can surface to their caller.
//
// The binary wraps all of these in anyhow::Error for context-rich messages.
// =============================================================================

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::checker::LinkStatus;
use crate::store::BookmarkId;

/// The transport-level reason a probe failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailureKind {
    Timeout,
    Connect,
    Dns,
    Tls,
    Redirect,
    Other,
}

impl fmt::Display for NetworkFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NetworkFailureKind::Timeout => "timeout",
            NetworkFailureKind::Connect => "connection failed",
            NetworkFailureKind::Dns => "dns lookup failed",
            NetworkFailureKind::Tls => "tls error",
            NetworkFailureKind::Redirect => "too many redirects",
            NetworkFailureKind::Other => "transport error",
        };
        f.pad(label)
    }
}

/// Why a URL probe did not produce an alive response.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The input could not be parsed as a probeable http(s) URL.
    #[error("malformed URL '{input}': {reason}")]
    MalformedInput { input: String, reason: String },

    /// Timeout, refusal, DNS failure and friends.
    #[error("{kind}: {message}")]
    NetworkFailure {
        kind: NetworkFailureKind,
        message: String,
    },

    /// The server answered, but outside the [200, 400) range.
    #[error("remote responded with HTTP {status}")]
    RemoteError { status: u16 },
}

impl ProbeError {
    /// Folds the failure into the classification callers see.
    ///
    /// Only a real HTTP answer makes a link `Dead`; everything else is `Error`.
    pub fn link_status(&self) -> LinkStatus {
        match self {
            ProbeError::RemoteError { .. } => LinkStatus::Dead,
            ProbeError::MalformedInput { .. } | ProbeError::NetworkFailure { .. } => {
                LinkStatus::Error
            }
        }
    }
}

/// Failures of the bookmark store collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store document is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by interactive operations.
#[derive(Debug, Error)]
pub enum LinkCheckError {
    #[error("bookmark not found with id: {0}")]
    NotFound(BookmarkId),

    #[error("unknown user: {0}")]
    UnknownOwner(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_are_dead_everything_else_is_error() {
        let remote = ProbeError::RemoteError { status: 404 };
        assert_eq!(remote.link_status(), LinkStatus::Dead);

        let malformed = ProbeError::MalformedInput {
            input: "not-a-url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert_eq!(malformed.link_status(), LinkStatus::Error);

        let timeout = ProbeError::NetworkFailure {
            kind: NetworkFailureKind::Timeout,
            message: "operation timed out".to_string(),
        };
        assert_eq!(timeout.link_status(), LinkStatus::Error);
    }

    #[test]
    fn not_found_message_names_the_id() {
        let err = LinkCheckError::NotFound(BookmarkId(42));
        assert_eq!(err.to_string(), "bookmark not found with id: 42");
    }
}
