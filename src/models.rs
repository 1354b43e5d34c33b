//! Value types exchanged with the embedding forum application.
//!
//! Threads, posts and categories are owned by the forum; the tracker only
//! ever sees read-only snapshots of them. Read state is returned alongside
//! as explicit values, never written back onto forum entities.

use chrono::{DateTime, Utc};

use crate::db::watermarks::ThreadRead;

/// The identity annotation and advance operations run on behalf of.
#[derive(Debug, Clone)]
pub enum Reader {
    /// Guest session. Everything is read, nothing is tracked.
    Anonymous,
    /// Signed-in forum member.
    Member(Member),
}

impl Reader {
    /// The member, if this reader is signed in.
    pub fn member(&self) -> Option<&Member> {
        match self {
            Reader::Anonymous => None,
            Reader::Member(member) => Some(member),
        }
    }
}

/// A signed-in member's tracking identity.
///
/// `reads_cutoff` is the member's tracking horizon: content at or before it
/// is never tracked. Compute it with [`crate::config::TrackerConfig::reads_cutoff`].
#[derive(Debug, Clone)]
pub struct Member {
    pub id: i64,
    pub reads_cutoff: DateTime<Utc>,
}

/// Snapshot of a forum thread.
#[derive(Debug, Clone)]
pub struct Thread {
    pub id: i64,
    pub category_id: i64,
    /// Timestamp of the newest post in the thread.
    pub last_post_on: DateTime<Utc>,
    /// Total reply count, excluding the starting post.
    pub replies: i64,
}

/// Snapshot of a forum post.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: i64,
    pub thread_id: i64,
    pub posted_on: DateTime<Utc>,
}

/// A category whose own read state the caller has already resolved.
///
/// Passed to batch annotation when every thread in the batch belongs to one
/// known category; lets a fully-read category short-circuit the whole batch.
#[derive(Debug, Clone)]
pub struct TrackedCategory {
    pub id: i64,
    pub is_read: bool,
    pub last_read_on: DateTime<Utc>,
}

/// Derived read state for one thread.
///
/// Immutable after construction. `last_read_on` is populated only by the
/// single-thread annotation path; post annotation and the advance path
/// require it and fail fast when handed a batch-derived state.
#[derive(Debug, Clone)]
pub struct ThreadReadState {
    pub is_read: bool,
    pub is_new: bool,
    pub unread_replies: i64,
    pub last_read_on: Option<DateTime<Utc>>,
    /// The thread watermark record, when one was found. Reused by the
    /// advance path to update in place instead of re-querying.
    pub read_record: Option<ThreadRead>,
}

impl ThreadReadState {
    /// State for a thread that is fully read and not new.
    pub(crate) fn read() -> Self {
        Self {
            is_read: true,
            is_new: false,
            unread_replies: 0,
            last_read_on: None,
            read_record: None,
        }
    }
}

/// Derived read state for one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostReadState {
    pub is_read: bool,
}
