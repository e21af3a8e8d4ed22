// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Global options (store location, timeouts, worker count, log level) apply
// to every subcommand; each subcommand maps onto one checker operation:
//   check       -> BatchChecker::check_one
//   batch       -> BatchChecker::check_batch
//   dead-links  -> DeadLinkScanner::scan_for_user
//   schedule    -> run_schedule(SweepScheduler)
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use link_vigil::config::{
    CheckerConfig, DEFAULT_CONCURRENCY, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS,
};
use link_vigil::sweep::{parse_time_of_day, ScheduleConfig, Trigger};

#[derive(Parser, Debug)]
#[command(
    name = "link-vigil",
    version,
    about = "Check whether bookmarked links are still alive",
    long_about = "link-vigil checks the URLs stored in a bookmark store. It can check single \
                  bookmarks, ordered batches, everything one user owns, or sweep the whole \
                  store on a schedule and record each link's status."
)]
pub struct Cli {
    /// Path to the JSON bookmark store
    #[arg(long, global = true, default_value = "bookmarks.json")]
    pub store: PathBuf,

    /// Seconds allowed to open a connection
    #[arg(long, global = true, default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    pub connect_timeout: u64,

    /// Seconds allowed for the response once connected. reqwest has no
    /// per-read timer, so this is added to --connect-timeout to form one
    /// overall deadline per check
    #[arg(long, global = true, default_value_t = DEFAULT_READ_TIMEOUT_SECS)]
    pub read_timeout: u64,

    /// Maximum number of links checked at the same time (1-64)
    #[arg(long, global = true, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Log level (error, warn, info, debug, trace); RUST_LOG is also honored
    #[arg(long, global = true, default_value = "info")]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check one bookmark's link right now
    ///
    /// Example: link-vigil check 42
    Check {
        /// Bookmark id
        id: u64,

        /// Output results in JSON format instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check several bookmarks; results keep the order given
    ///
    /// Example: link-vigil batch 1 2 999
    Batch {
        /// Bookmark ids (repeats are checked again)
        #[arg(required = true)]
        ids: Vec<u64>,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List a user's bookmarks whose links are dead or erroring
    ///
    /// Example: link-vigil dead-links --user alice
    DeadLinks {
        /// Username whose bookmarks are scanned
        #[arg(long)]
        user: String,

        /// Output the full bookmark records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the recurring full-store sweep in the foreground
    ///
    /// Example: link-vigil schedule --at 02:00
    Schedule {
        /// Local time of day for the daily sweep, HH:MM (default 02:00)
        #[arg(long, value_parser = parse_time_of_day, conflicts_with = "every")]
        at: Option<NaiveTime>,

        /// Sweep every N seconds instead of daily
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        every: Option<u64>,

        /// Stop after this many sweeps
        #[arg(long)]
        max_runs: Option<u32>,
    },
}

impl Cli {
    pub fn checker_config(&self) -> CheckerConfig {
        CheckerConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout),
            read_timeout: Duration::from_secs(self.read_timeout),
            ..CheckerConfig::default()
        }
    }
}

/// Builds the schedule from the `schedule` subcommand's flags.
pub fn schedule_config(at: Option<NaiveTime>, every: Option<u64>, max_runs: Option<u32>) -> ScheduleConfig {
    let trigger = match (at, every) {
        (_, Some(secs)) => Trigger::Every(Duration::from_secs(secs)),
        (Some(at), None) => Trigger::Daily { at },
        (None, None) => Trigger::default(),
    };
    ScheduleConfig { trigger, max_runs }
}
