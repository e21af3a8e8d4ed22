// src/lib.rs
// =============================================================================
// link-vigil: is a bookmarked URL still alive?
//
// Layout, leaf to root:
// - checker::UrlHealthChecker  classify one URL as ALIVE / DEAD / ERROR
// - checker::BatchChecker      check bookmarks by id, ordered, bounded fan-out
// - checker::DeadLinkScanner   one owner's bookmarks that are broken right now
// - sweep::SweepScheduler      re-check the whole store and persist statuses
//
// Bookmarks themselves belong to a store (see `store`); this crate only
// reads URLs from it and writes statuses back during the sweep.
// =============================================================================

pub mod checker;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod sweep;

pub use checker::{
    BatchChecker, BatchEntry, BatchStatus, CheckResult, DeadLinkScanner, LinkStatus,
    UrlHealthChecker,
};
pub use config::CheckerConfig;
pub use error::{LinkCheckError, ProbeError, StoreError};
pub use store::{Bookmark, BookmarkId, BookmarkStore, OwnerId, OwnerResolver};
pub use sweep::{run_schedule, ScheduleConfig, SweepOutcome, SweepScheduler, Trigger};
