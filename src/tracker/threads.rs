//! Thread read-state annotation.
//!
//! Batch annotation classifies each thread against the coarse category
//! watermark first, then refines provisionally-unread threads against their
//! thread watermarks in one bulk query. The single-thread path additionally
//! resolves the exact read point and lazily starts category tracking on
//! first contact.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::ThreadsTracker;
use crate::cutoff::is_date_tracked;
use crate::db::{DbError, watermarks};
use crate::error::TrackerResult;
use crate::models::{Member, Reader, Thread, ThreadReadState, TrackedCategory};

/// Provisional classification from a coarse watermark alone.
///
/// Batch passes leave `is_new` set even on threads classified read; only
/// refinement against a thread watermark clears it.
fn provisional_state(
    member: &Member,
    thread: &Thread,
    cutoff: Option<DateTime<Utc>>,
) -> ThreadReadState {
    let is_read = !is_date_tracked(thread.last_post_on, member, cutoff);
    ThreadReadState {
        is_read,
        is_new: true,
        unread_replies: if is_read { 0 } else { thread.replies },
        last_read_on: None,
        read_record: None,
    }
}

impl ThreadsTracker {
    /// Derive read state for a batch of threads without mutating storage.
    ///
    /// Pass `category` when every thread in the batch belongs to it and its
    /// own read state is already resolved; a fully-read category then
    /// short-circuits the whole batch. Without it, each thread is matched
    /// against its own category's watermark, bulk-fetched in one query.
    ///
    /// Returned states are in input order.
    pub async fn threads_read_states(
        &self,
        reader: &Reader,
        threads: &[Thread],
        category: Option<&TrackedCategory>,
    ) -> TrackerResult<Vec<ThreadReadState>> {
        if threads.is_empty() {
            return Ok(Vec::new());
        }

        let member = match reader {
            Reader::Anonymous => {
                return Ok(threads.iter().map(|_| ThreadReadState::read()).collect());
            }
            Reader::Member(member) => member,
        };

        match category {
            Some(category) => {
                self.category_threads_read_states(member, category, threads)
                    .await
            }
            None => self.categories_threads_read_states(member, threads).await,
        }
    }

    /// Batch annotation when the common category is known.
    async fn category_threads_read_states(
        &self,
        member: &Member,
        category: &TrackedCategory,
        threads: &[Thread],
    ) -> TrackerResult<Vec<ThreadReadState>> {
        if category.is_read {
            return Ok(threads.iter().map(|_| ThreadReadState::read()).collect());
        }

        let mut states: Vec<ThreadReadState> = threads
            .iter()
            .map(|thread| provisional_state(member, thread, Some(category.last_read_on)))
            .collect();

        self.refine_unread(member, threads, &mut states).await?;
        Ok(states)
    }

    /// Batch annotation across arbitrary categories.
    async fn categories_threads_read_states(
        &self,
        member: &Member,
        threads: &[Thread],
    ) -> TrackerResult<Vec<ThreadReadState>> {
        let mut category_ids = Vec::new();
        for thread in threads {
            if !category_ids.contains(&thread.category_id) {
                category_ids.push(thread.category_id);
            }
        }

        let cutoffs =
            watermarks::category_cutoffs(self.db.pool(), member.id, &category_ids).await?;

        let mut states: Vec<ThreadReadState> = threads
            .iter()
            .map(|thread| {
                // Missing watermark: category never tracked, only the
                // member's horizon applies.
                provisional_state(member, thread, cutoffs.get(&thread.category_id).copied())
            })
            .collect();

        self.refine_unread(member, threads, &mut states).await?;
        Ok(states)
    }

    /// Refinement pass: match provisionally-unread threads against their
    /// thread watermarks. Threads without a record keep their provisional
    /// unread/new state.
    async fn refine_unread(
        &self,
        member: &Member,
        threads: &[Thread],
        states: &mut [ThreadReadState],
    ) -> TrackerResult<()> {
        let unread_ids: Vec<i64> = threads
            .iter()
            .zip(states.iter())
            .filter(|(_, state)| !state.is_read)
            .map(|(thread, _)| thread.id)
            .collect();

        if unread_ids.is_empty() {
            return Ok(());
        }

        let records = watermarks::thread_records(self.db.pool(), member.id, &unread_ids).await?;
        let by_thread: HashMap<i64, _> = records
            .into_iter()
            .map(|record| (record.thread_id, record))
            .collect();

        for (thread, state) in threads.iter().zip(states.iter_mut()) {
            if state.is_read {
                continue;
            }
            if let Some(record) = by_thread.get(&thread.id) {
                state.is_new = false;
                state.is_read = record.last_read_on >= thread.last_post_on;
                if state.is_read {
                    state.unread_replies = 0;
                } else {
                    // Floor of 1: never report zero unread on an unread
                    // thread, even when the counts cancel out.
                    state.unread_replies = (thread.replies - record.read_replies).max(1);
                }
            }
        }

        Ok(())
    }

    /// Derive the full read state for one thread, resolving the exact read
    /// point for post annotation and the advance path.
    ///
    /// This is the only annotation path that populates `last_read_on` and
    /// `read_record`, and the only one that may touch storage beyond reads:
    /// encountering a never-tracked category lazily starts its watermark.
    pub async fn thread_read_state(
        &self,
        reader: &Reader,
        thread: &Thread,
    ) -> TrackerResult<ThreadReadState> {
        let member = match reader {
            Reader::Anonymous => {
                let mut state = ThreadReadState::read();
                state.last_read_on = Some(Utc::now());
                return Ok(state);
            }
            Reader::Member(member) => member,
        };

        let mut state = ThreadReadState::read();
        state.last_read_on = Some(member.reads_cutoff);

        if !is_date_tracked(thread.last_post_on, member, None) {
            return Ok(state);
        }

        state.is_read = false;
        state.is_new = true;
        state.unread_replies = thread.replies;

        let mut conn = self.db.pool().acquire().await.map_err(DbError::from)?;

        let category_record =
            watermarks::category_record(&mut *conn, member.id, thread.category_id).await?;

        match category_record {
            Some(category_record) => {
                if thread.last_post_on > category_record.last_read_on {
                    if let Some(record) =
                        watermarks::thread_record(&mut *conn, member.id, thread.id).await?
                    {
                        state.last_read_on = Some(record.last_read_on);
                        state.is_new = false;
                        if thread.last_post_on <= record.last_read_on {
                            state.is_read = true;
                            state.unread_replies = 0;
                        } else {
                            state.unread_replies = (thread.replies - record.read_replies).max(1);
                        }
                        state.read_record = Some(record);
                    }
                } else {
                    // Category watermark covers the thread's newest post.
                    state.is_read = true;
                    state.is_new = false;
                    state.unread_replies = 0;
                }
            }
            None => {
                // Never tracked: start the category watermark lazily and
                // leave the thread flagged new/unread.
                self.categories
                    .start_record(&mut conn, member, thread.category_id)
                    .await?;
                debug!(
                    user_id = member.id,
                    category_id = thread.category_id,
                    "started category read record"
                );
            }
        }

        Ok(state)
    }
}
