//! Signal observer trait.
//!
//! The tracker emits two signals from the advance path: "thread newly
//! tracked" (first watermark created for a (user, thread) pair) and
//! "thread fully read" (read point reached the thread's newest post).
//! Subscribers such as activity feeds implement this trait; the tracker
//! only emits. Observers are invoked after the advance transaction commits.

use crate::models::{Member, Thread};

/// Trait for observing tracker signals.
pub trait TrackerObserver: Send + Sync {
    /// Called when a thread watermark is created for the first time.
    fn on_thread_tracked(&self, member: &Member, thread: &Thread) {
        let _ = (member, thread);
    }

    /// Called when a member's read point reaches the thread's newest post.
    fn on_thread_read(&self, member: &Member, thread: &Thread) {
        let _ = (member, thread);
    }
}
