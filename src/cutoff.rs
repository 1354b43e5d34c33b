//! Date cutoff policy.
//!
//! Single predicate gating every "should this content be tracked at all"
//! decision. Evaluated before any watermark lookup: untracked content
//! short-circuits to read/not-new without touching storage.

use chrono::{DateTime, Utc};

use crate::models::Member;

/// Whether `date` falls inside the member's tracking window.
///
/// Content at or before the member's horizon is never tracked. When a
/// coarser watermark (`cutoff`, typically a category or thread
/// `last_read_on`) is supplied, content at or before it is untracked too.
pub fn is_date_tracked(
    date: DateTime<Utc>,
    member: &Member,
    cutoff: Option<DateTime<Utc>>,
) -> bool {
    if date <= member.reads_cutoff {
        return false;
    }
    if let Some(cutoff) = cutoff {
        if date <= cutoff {
            return false;
        }
    }
    true
}
