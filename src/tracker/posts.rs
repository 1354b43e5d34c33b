//! Per-post read annotation.

use crate::cutoff::is_date_tracked;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Post, PostReadState, Reader, ThreadReadState};

/// Derive read state for a thread's posts.
///
/// `state` must come from `ThreadsTracker::thread_read_state`; batch-derived
/// states carry no read point and are rejected. A fully-read thread marks
/// every post read without per-post date math; otherwise a post is read
/// when it predates the member's horizon or the thread's read point.
pub fn posts_read_states(
    reader: &Reader,
    state: &ThreadReadState,
    posts: &[Post],
) -> TrackerResult<Vec<PostReadState>> {
    let Some(last_read_on) = state.last_read_on else {
        return Err(TrackerError::ThreadNotReadAware);
    };

    if state.is_read {
        return Ok(posts.iter().map(|_| PostReadState { is_read: true }).collect());
    }

    let member = match reader {
        Reader::Anonymous => {
            return Ok(posts.iter().map(|_| PostReadState { is_read: true }).collect());
        }
        Reader::Member(member) => member,
    };

    Ok(posts
        .iter()
        .map(|post| {
            let is_read = if is_date_tracked(post.posted_on, member, None) {
                post.posted_on <= last_read_on
            } else {
                true
            };
            PostReadState { is_read }
        })
        .collect())
}
