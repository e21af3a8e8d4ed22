// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - status: the ALIVE / DEAD / ERROR (and NOT_FOUND) classifications
// - http: probes one URL and classifies it (UrlHealthChecker)
// - batch: checks bookmarks by id, singly or in ordered batches
// - dead_links: re-checks one owner's bookmarks and keeps the broken ones
// =============================================================================

mod batch;
mod dead_links;
mod http;
mod status;

pub use batch::BatchChecker;
pub use dead_links::DeadLinkScanner;
pub use http::UrlHealthChecker;
pub use status::{BatchEntry, BatchStatus, CheckResult, LinkStatus};
