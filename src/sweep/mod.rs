// src/sweep/mod.rs
// =============================================================================
// Background re-checking of every stored bookmark.
//
// - trigger: when the next sweep is due (daily wall-clock time or interval)
// - scheduler: the sweep job itself, its overlap guard, and the loop that
//   fires it
// =============================================================================

mod scheduler;
mod trigger;

pub use scheduler::{
    run_schedule, ScheduleConfig, ScheduleSummary, SweepOutcome, SweepScheduler, SweepStats,
};
pub use trigger::{parse_time_of_day, Trigger, DEFAULT_SWEEP_HOUR};
