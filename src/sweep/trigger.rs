// src/sweep/trigger.rs
// =============================================================================
// When the sweep fires.
//
// A Trigger only answers "how long until the next fire, given the current
// local time?". The schedule loop does the sleeping, which keeps this part
// a pure function that is easy to test.
// =============================================================================

use std::fmt;
use std::time::Duration;

use chrono::{NaiveDateTime, NaiveTime};

/// Default daily sweep time: 02:00 local.
pub const DEFAULT_SWEEP_HOUR: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Once a day at a fixed local wall-clock time.
    Daily { at: NaiveTime },
    /// Repeatedly with a fixed gap between fires.
    Every(Duration),
}

impl Default for Trigger {
    fn default() -> Self {
        Trigger::Daily {
            at: NaiveTime::from_hms_opt(DEFAULT_SWEEP_HOUR, 0, 0).unwrap_or_default(),
        }
    }
}

impl Trigger {
    /// Time to wait from `now` (local wall clock) until the next fire.
    ///
    /// A daily trigger whose time is exactly `now` fires tomorrow, so one
    /// fire can never be counted twice.
    pub fn delay_from(&self, now: NaiveDateTime) -> Duration {
        match *self {
            Trigger::Every(gap) => gap.max(Duration::from_millis(1)),
            Trigger::Daily { at } => {
                let today = now.date().and_time(at);
                let next = if today > now {
                    today
                } else {
                    today + chrono::Duration::days(1)
                };
                (next - now).to_std().unwrap_or(Duration::ZERO)
            }
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Daily { at } => write!(f, "daily at {}", at.format("%H:%M")),
            Trigger::Every(gap) => write!(f, "every {}s", gap.as_secs_f64()),
        }
    }
}

/// Parses a `HH:MM` time of day, as accepted by `--at`.
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|e| format!("expected HH:MM (24h), got '{}': {}", raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn daily_fires_later_today() {
        let trigger = Trigger::default();
        assert_eq!(trigger.delay_from(at(1, 30)), Duration::from_secs(30 * 60));
    }

    #[test]
    fn daily_rolls_over_to_tomorrow() {
        let trigger = Trigger::default();
        assert_eq!(trigger.delay_from(at(2, 0)), Duration::from_secs(24 * 3600));
        assert_eq!(trigger.delay_from(at(23, 0)), Duration::from_secs(3 * 3600));
    }

    #[test]
    fn every_is_constant() {
        let trigger = Trigger::Every(Duration::from_secs(90));
        assert_eq!(trigger.delay_from(at(12, 0)), Duration::from_secs(90));
        assert_eq!(trigger.to_string(), "every 90s");
    }

    #[test]
    fn parses_time_of_day() {
        assert_eq!(
            parse_time_of_day("02:00").unwrap(),
            NaiveTime::from_hms_opt(2, 0, 0).unwrap()
        );
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("2am").is_err());
    }
}
