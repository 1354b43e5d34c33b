//! Posts mirror queries.
//!
//! The tracker does not own posts; the embedding forum records them here so
//! the advance path can count read replies with moderation visibility
//! applied.

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

use crate::db::{DbError, to_micros};

/// Record a post in the mirror. Called by the forum on post creation and by
/// tests when seeding threads.
pub async fn record_post<'e, E>(
    executor: E,
    thread_id: i64,
    posted_on: DateTime<Utc>,
    is_moderated: bool,
) -> Result<i64, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO posts (thread_id, posted_on, is_moderated)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(thread_id)
    .bind(to_micros(posted_on))
    .bind(is_moderated)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Count replies the user has read: non-moderated posts up to and including
/// `last_read_on`, minus one for the thread's starting post.
pub(crate) async fn count_read_replies<'e, E>(
    executor: E,
    thread_id: i64,
    last_read_on: DateTime<Utc>,
) -> Result<i64, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM posts
        WHERE thread_id = ? AND is_moderated = 0 AND posted_on <= ?
        "#,
    )
    .bind(thread_id)
    .bind(to_micros(last_read_on))
    .fetch_one(executor)
    .await?;

    Ok(count - 1)
}
