//! The write path: advancing watermarks as the member reads.
//!
//! One transaction per advance. The reply count, the watermark write, the
//! category cascade and the notification clears either all apply or none
//! do; observers fire only after commit.

use tracing::debug;

use super::ThreadsTracker;
use crate::db::{DbError, posts, watermarks};
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Member, Post, Thread, ThreadReadState};

impl ThreadsTracker {
    /// Advance the member's read point in `thread` to `last_read_reply`.
    ///
    /// `state` must come from `thread_read_state` for the same member and
    /// thread. No-op unless the thread is currently unread and the reply is
    /// strictly newer than the current read point. Returns the advanced
    /// state, or `None` when nothing happened; feeding the returned state
    /// into a repeat call with the same reply is a no-op.
    pub async fn read_thread(
        &self,
        member: &Member,
        thread: &Thread,
        state: &ThreadReadState,
        last_read_reply: &Post,
    ) -> TrackerResult<Option<ThreadReadState>> {
        if state.is_read {
            return Ok(None);
        }

        let last_read_on = state
            .last_read_on
            .ok_or(TrackerError::ThreadNotReadAware)?;

        if last_read_on >= last_read_reply.posted_on {
            return Ok(None);
        }

        let advanced = self
            .sync_record(member, thread, state, last_read_reply)
            .await?;
        Ok(Some(advanced))
    }

    /// The atomic advance.
    async fn sync_record(
        &self,
        member: &Member,
        thread: &Thread,
        state: &ThreadReadState,
        last_read_reply: &Post,
    ) -> TrackerResult<ThreadReadState> {
        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        let mut notification_triggers = vec![format!("read_thread_{}", thread.id)];

        let read_replies =
            posts::count_read_replies(&mut *tx, thread.id, last_read_reply.posted_on).await?;

        let (record, newly_tracked) = match &state.read_record {
            Some(record) => {
                watermarks::update_thread_record(
                    &mut *tx,
                    record.id,
                    read_replies,
                    last_read_reply.posted_on,
                )
                .await?;
                let mut record = record.clone();
                record.read_replies = read_replies;
                record.last_read_on = last_read_reply.posted_on;
                (record, false)
            }
            None => {
                let record = watermarks::insert_thread_record(
                    &mut *tx,
                    member.id,
                    thread.category_id,
                    thread.id,
                    read_replies,
                    last_read_reply.posted_on,
                )
                .await?;
                notification_triggers.push(format!("see_thread_{}", thread.id));
                (record, true)
            }
        };

        let fully_read = last_read_reply.posted_on == thread.last_post_on;
        if fully_read {
            self.categories
                .sync_record(&mut tx, member, thread.category_id)
                .await?;
        }

        self.notifications
            .read_user_notifications(&mut tx, member, &notification_triggers, false)
            .await?;

        tx.commit().await.map_err(DbError::from)?;

        if newly_tracked {
            for observer in &self.observers {
                observer.on_thread_tracked(member, thread);
            }
        }
        if fully_read {
            for observer in &self.observers {
                observer.on_thread_read(member, thread);
            }
        }

        debug!(
            user_id = member.id,
            thread_id = thread.id,
            read_replies,
            newly_tracked,
            fully_read,
            "advanced thread read record"
        );

        Ok(ThreadReadState {
            is_read: fully_read,
            is_new: false,
            unread_replies: if fully_read {
                0
            } else {
                (thread.replies - read_replies).max(1)
            },
            last_read_on: Some(last_read_reply.posted_on),
            read_record: Some(record),
        })
    }
}
