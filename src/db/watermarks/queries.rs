//! Watermark queries.
//!
//! Free functions generic over the executor so the same queries run against
//! the pool (annotation reads) or inside the advance transaction (writes).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

use super::models::{CategoryRead, ThreadRead};
use crate::db::{DbError, from_micros, to_micros};

type ThreadReadRow = (i64, i64, i64, i64, i64, i64);

fn thread_read_from_row(row: ThreadReadRow) -> Result<ThreadRead, DbError> {
    let (id, user_id, category_id, thread_id, read_replies, last_read_on) = row;
    Ok(ThreadRead {
        id,
        user_id,
        category_id,
        thread_id,
        read_replies,
        last_read_on: from_micros(last_read_on)?,
    })
}

/// Bulk-fetch category watermarks for a set of categories.
///
/// Missing categories are simply absent from the map ("never tracked").
pub(crate) async fn category_cutoffs<'e, E>(
    executor: E,
    user_id: i64,
    category_ids: &[i64],
) -> Result<HashMap<i64, DateTime<Utc>>, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    if category_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders = vec!["?"; category_ids.len()].join(",");
    let sql = format!(
        "SELECT category_id, last_read_on FROM category_reads \
         WHERE user_id = ? AND category_id IN ({placeholders})"
    );

    let mut query = sqlx::query_as::<_, (i64, i64)>(&sql).bind(user_id);
    for id in category_ids {
        query = query.bind(id);
    }

    let rows = query.fetch_all(executor).await?;

    let mut cutoffs = HashMap::with_capacity(rows.len());
    for (category_id, last_read_on) in rows {
        cutoffs.insert(category_id, from_micros(last_read_on)?);
    }
    Ok(cutoffs)
}

/// Fetch a single category watermark by exact key.
pub(crate) async fn category_record<'e, E>(
    executor: E,
    user_id: i64,
    category_id: i64,
) -> Result<Option<CategoryRead>, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT id, last_read_on FROM category_reads
        WHERE user_id = ? AND category_id = ?
        "#,
    )
    .bind(user_id)
    .bind(category_id)
    .fetch_optional(executor)
    .await?;

    match row {
        Some((id, last_read_on)) => Ok(Some(CategoryRead {
            id,
            user_id,
            category_id,
            last_read_on: from_micros(last_read_on)?,
        })),
        None => Ok(None),
    }
}

/// Bulk-fetch thread watermarks for a set of threads.
pub(crate) async fn thread_records<'e, E>(
    executor: E,
    user_id: i64,
    thread_ids: &[i64],
) -> Result<Vec<ThreadRead>, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    if thread_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; thread_ids.len()].join(",");
    let sql = format!(
        "SELECT id, user_id, category_id, thread_id, read_replies, last_read_on \
         FROM thread_reads WHERE user_id = ? AND thread_id IN ({placeholders})"
    );

    let mut query = sqlx::query_as::<_, ThreadReadRow>(&sql).bind(user_id);
    for id in thread_ids {
        query = query.bind(id);
    }

    let rows = query.fetch_all(executor).await?;
    rows.into_iter().map(thread_read_from_row).collect()
}

/// Fetch a single thread watermark by exact key.
pub(crate) async fn thread_record<'e, E>(
    executor: E,
    user_id: i64,
    thread_id: i64,
) -> Result<Option<ThreadRead>, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, ThreadReadRow>(
        r#"
        SELECT id, user_id, category_id, thread_id, read_replies, last_read_on
        FROM thread_reads
        WHERE user_id = ? AND thread_id = ?
        "#,
    )
    .bind(user_id)
    .bind(thread_id)
    .fetch_optional(executor)
    .await?;

    row.map(thread_read_from_row).transpose()
}

/// Create a thread watermark. Fails on a duplicate (user, thread) key; the
/// advance path only inserts when annotation found no record.
pub(crate) async fn insert_thread_record<'e, E>(
    executor: E,
    user_id: i64,
    category_id: i64,
    thread_id: i64,
    read_replies: i64,
    last_read_on: DateTime<Utc>,
) -> Result<ThreadRead, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO thread_reads (user_id, category_id, thread_id, read_replies, last_read_on)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(category_id)
    .bind(thread_id)
    .bind(read_replies)
    .bind(to_micros(last_read_on))
    .execute(executor)
    .await?;

    Ok(ThreadRead {
        id: result.last_insert_rowid(),
        user_id,
        category_id,
        thread_id,
        read_replies,
        last_read_on,
    })
}

/// Advance an existing thread watermark in place.
pub(crate) async fn update_thread_record<'e, E>(
    executor: E,
    record_id: i64,
    read_replies: i64,
    last_read_on: DateTime<Utc>,
) -> Result<(), DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        UPDATE thread_reads SET read_replies = ?, last_read_on = ?
        WHERE id = ?
        "#,
    )
    .bind(read_replies)
    .bind(to_micros(last_read_on))
    .bind(record_id)
    .execute(executor)
    .await?;

    Ok(())
}

/// Upsert a category watermark.
///
/// With `overwrite` false this is the lazy-creation form: an existing row is
/// left untouched. With `overwrite` true the watermark advances to
/// `last_read_on`.
pub(crate) async fn upsert_category_record<'e, E>(
    executor: E,
    user_id: i64,
    category_id: i64,
    last_read_on: DateTime<Utc>,
    overwrite: bool,
) -> Result<(), DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = if overwrite {
        r#"
        INSERT INTO category_reads (user_id, category_id, last_read_on)
        VALUES (?, ?, ?)
        ON CONFLICT (user_id, category_id)
        DO UPDATE SET last_read_on = excluded.last_read_on
        "#
    } else {
        r#"
        INSERT OR IGNORE INTO category_reads (user_id, category_id, last_read_on)
        VALUES (?, ?, ?)
        "#
    };

    sqlx::query(sql)
        .bind(user_id)
        .bind(category_id)
        .bind(to_micros(last_read_on))
        .execute(executor)
        .await?;

    Ok(())
}
