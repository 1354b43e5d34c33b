//! Tracker configuration.
//!
//! The tracking-horizon length is caller-supplied configuration, not an
//! ambient global; the embedding application loads it from its own config
//! file and computes each member's horizon at request time.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

fn default_tracker_length_days() -> i64 {
    90
}

/// Read-tracker configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// How many days back content is tracked. Content older than this is
    /// always treated as read.
    #[serde(default = "default_tracker_length_days")]
    pub tracker_length_days: i64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tracker_length_days: default_tracker_length_days(),
        }
    }
}

impl TrackerConfig {
    /// A member's tracking horizon: the later of their join date and the
    /// configured tracker length counted back from `now`. Content at or
    /// before it is never tracked.
    pub fn reads_cutoff(&self, joined_on: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
        let length_cutoff = now - TimeDelta::days(self.tracker_length_days);
        joined_on.max(length_cutoff)
    }
}
