// src/sweep/scheduler.rs
// =============================================================================
// The full-store sweep and the loop that fires it on a schedule.
//
// One sweep run:
// 1. read every bookmark in the store
// 2. check each URL through the bounded worker pool
// 3. write all statuses back in one bulk call
//
// A broken link never stops the run. A store failure (read or write) ends
// that run; it is logged with the counts gathered so far and the next
// scheduled run starts from scratch.
//
// Only one run may be active at a time. The scheduler owns a mutex; a
// trigger that finds it held is skipped, not queued.
// =============================================================================

use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinSet;

use super::trigger::Trigger;
use crate::checker::{LinkStatus, UrlHealthChecker};
use crate::config::clamp_concurrency;
use crate::error::StoreError;
use crate::store::{BookmarkStore, StatusUpdate};

/// Aggregate counts for one sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub checked: usize,
    pub alive: usize,
    pub dead: usize,
    pub error: usize,
}

impl SweepStats {
    fn record(&mut self, status: LinkStatus) {
        self.checked += 1;
        match status {
            LinkStatus::Alive => self.alive += 1,
            LinkStatus::Dead => self.dead += 1,
            LinkStatus::Error => self.error += 1,
        }
    }
}

/// What happened when the sweep job was invoked.
#[derive(Debug)]
pub enum SweepOutcome {
    /// Every status was checked and written back.
    Completed(SweepStats),
    /// Another run held the guard; nothing was done.
    Skipped,
    /// The store failed; nothing from this run is guaranteed persisted.
    Failed { stats: SweepStats, error: StoreError },
}

pub struct SweepScheduler {
    checker: UrlHealthChecker,
    store: Arc<dyn BookmarkStore>,
    concurrency: usize,
    running: Mutex<()>,
}

impl SweepScheduler {
    pub fn new(checker: UrlHealthChecker, store: Arc<dyn BookmarkStore>, concurrency: usize) -> Self {
        Self {
            checker,
            store,
            concurrency: clamp_concurrency(concurrency),
            running: Mutex::new(()),
        }
    }

    /// True while a sweep run holds the guard.
    pub fn is_running(&self) -> bool {
        self.running.try_lock().is_err()
    }

    /// The sweep job: re-check every stored URL and persist the statuses.
    pub async fn run_sweep(&self) -> SweepOutcome {
        let Ok(_guard) = self.running.try_lock() else {
            log::warn!("link sweep already in progress; skipping this trigger");
            return SweepOutcome::Skipped;
        };

        let started = Instant::now();
        log::info!("link sweep started");

        let bookmarks = match self.store.find_all().await {
            Ok(bookmarks) => bookmarks,
            Err(error) => return fail(SweepStats::default(), error),
        };

        let results = self
            .checker
            .check_bookmarks(bookmarks, self.concurrency)
            .await;

        let checked_at = Utc::now();
        let mut stats = SweepStats::default();
        let updates: Vec<StatusUpdate> = results
            .into_iter()
            .map(|(bookmark, status)| {
                stats.record(status);
                StatusUpdate {
                    id: bookmark.id,
                    status,
                    checked_at,
                }
            })
            .collect();

        match self.store.write_statuses(&updates).await {
            Ok(written) => {
                log::info!(
                    "link sweep finished in {:.1}s: checked={} alive={} dead={} error={} written={}",
                    started.elapsed().as_secs_f64(),
                    stats.checked,
                    stats.alive,
                    stats.dead,
                    stats.error,
                    written
                );
                SweepOutcome::Completed(stats)
            }
            Err(error) => fail(stats, error),
        }
    }
}

fn fail(stats: SweepStats, error: StoreError) -> SweepOutcome {
    log::error!(
        "link sweep failed: {} (checked={} alive={} dead={} error={})",
        error,
        stats.checked,
        stats.alive,
        stats.dead,
        stats.error
    );
    SweepOutcome::Failed { stats, error }
}

/// How the schedule loop runs.
#[derive(Debug, Clone, Default)]
pub struct ScheduleConfig {
    pub trigger: Trigger,
    /// Stop after this many fires; `None` runs until Ctrl+C.
    pub max_runs: Option<u32>,
}

/// Tally of a schedule loop's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub triggered: u32,
    pub completed: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl ScheduleSummary {
    fn apply(&mut self, outcome: &SweepOutcome) {
        match outcome {
            SweepOutcome::Completed(_) => self.completed += 1,
            SweepOutcome::Skipped => self.skipped += 1,
            SweepOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Fires `scheduler.run_sweep()` whenever the trigger comes due.
///
/// Each fire runs in its own task so the timer keeps ticking during a long
/// sweep; overlapping fires are skipped by the scheduler's guard. Stops on
/// Ctrl+C or after `max_runs` fires, then waits for runs still in flight.
pub async fn run_schedule(scheduler: Arc<SweepScheduler>, config: ScheduleConfig) -> ScheduleSummary {
    let mut summary = ScheduleSummary::default();
    let mut in_flight: JoinSet<SweepOutcome> = JoinSet::new();

    log::info!("link sweep scheduled {}", config.trigger);

    loop {
        if config.max_runs.is_some_and(|max| summary.triggered >= max) {
            break;
        }

        let wait = config.trigger.delay_from(Local::now().naive_local());
        log::debug!("next link sweep in {:.1}s", wait.as_secs_f64());
        let next_fire = tokio::time::sleep(wait);
        tokio::pin!(next_fire);

        // Reap finished runs while waiting for the next fire
        let interrupted = loop {
            tokio::select! {
                _ = &mut next_fire => break false,
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    record_join(&mut summary, joined);
                }
                _ = tokio::signal::ctrl_c() => break true,
            }
        };

        if interrupted {
            log::info!("scheduler received Ctrl+C; no further sweeps will start");
            break;
        }

        summary.triggered += 1;
        let job = Arc::clone(&scheduler);
        in_flight.spawn(async move { job.run_sweep().await });
    }

    while let Some(joined) = in_flight.join_next().await {
        record_join(&mut summary, joined);
    }

    log::info!(
        "scheduler stopped: triggered={} completed={} skipped={} failed={}",
        summary.triggered,
        summary.completed,
        summary.skipped,
        summary.failed
    );
    summary
}

fn record_join(summary: &mut ScheduleSummary, joined: Result<SweepOutcome, tokio::task::JoinError>) {
    match joined {
        Ok(outcome) => summary.apply(&outcome),
        Err(e) => {
            log::error!("link sweep task aborted: {}", e);
            summary.failed += 1;
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why try_lock() instead of lock().await?
//    - lock().await would queue the second trigger behind the first
//    - try_lock() fails immediately, so an overlapping trigger is skipped
//
// 2. What is a JoinSet?
//    - A collection of spawned tasks you can await one by one
//    - join_next() yields whichever task finishes first
// -----------------------------------------------------------------------------
