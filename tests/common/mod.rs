//! Shared helpers for read-tracker integration tests: an in-memory
//! database, recording collaborator doubles and scenario seeding.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use sqlx::SqliteConnection;

use threadmarks::{
    CategoriesTracker, Database, DbError, Member, NotificationsGateway, Post, Thread,
    ThreadsTracker, TrackerObserver,
};

const BASE_TS: i64 = 1_700_000_000;

/// Microsecond-precise timestamp `hours` hours after a fixed base, so
/// values survive the integer-microsecond round trip through storage.
pub fn ts(hours: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(BASE_TS, 0).expect("valid base timestamp") + TimeDelta::hours(hours)
}

pub fn member(id: i64, reads_cutoff: DateTime<Utc>) -> Member {
    Member { id, reads_cutoff }
}

pub fn thread(id: i64, category_id: i64, last_post_on: DateTime<Utc>, replies: i64) -> Thread {
    Thread {
        id,
        category_id,
        last_post_on,
        replies,
    }
}

pub fn post(id: i64, thread_id: i64, posted_on: DateTime<Utc>) -> Post {
    Post {
        id,
        thread_id,
        posted_on,
    }
}

/// Category tracker double: records every call; `start_record` also writes
/// the baseline watermark so lazy creation is observable in storage.
pub struct RecordingCategories {
    pub started: Mutex<Vec<(i64, i64)>>,
    pub synced: Mutex<Vec<(i64, i64)>>,
}

impl RecordingCategories {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            started: Mutex::new(Vec::new()),
            synced: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CategoriesTracker for RecordingCategories {
    async fn start_record(
        &self,
        conn: &mut SqliteConnection,
        member: &Member,
        category_id: i64,
    ) -> Result<(), DbError> {
        self.started
            .lock()
            .expect("lock poisoned")
            .push((member.id, category_id));
        sqlx::query(
            "INSERT OR IGNORE INTO category_reads (user_id, category_id, last_read_on) \
             VALUES (?, ?, ?)",
        )
        .bind(member.id)
        .bind(category_id)
        .bind(member.reads_cutoff.timestamp_micros())
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn sync_record(
        &self,
        _conn: &mut SqliteConnection,
        member: &Member,
        category_id: i64,
    ) -> Result<(), DbError> {
        self.synced
            .lock()
            .expect("lock poisoned")
            .push((member.id, category_id));
        Ok(())
    }
}

/// Notification gateway double recording each batch of trigger keys.
pub struct RecordingNotifications {
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingNotifications {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl NotificationsGateway for RecordingNotifications {
    async fn read_user_notifications(
        &self,
        _conn: &mut SqliteConnection,
        _member: &Member,
        trigger_keys: &[String],
        _seen: bool,
    ) -> Result<(), DbError> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(trigger_keys.to_vec());
        Ok(())
    }
}

/// Gateway that always fails, for atomicity tests.
pub struct FailingNotifications;

#[async_trait]
impl NotificationsGateway for FailingNotifications {
    async fn read_user_notifications(
        &self,
        _conn: &mut SqliteConnection,
        _member: &Member,
        _trigger_keys: &[String],
        _seen: bool,
    ) -> Result<(), DbError> {
        Err(DbError::Sqlx(sqlx::Error::Protocol(
            "notification gateway down".into(),
        )))
    }
}

/// Observer double counting signal emissions.
#[derive(Default)]
pub struct CountingObserver {
    pub tracked: AtomicUsize,
    pub read: AtomicUsize,
}

impl TrackerObserver for CountingObserver {
    fn on_thread_tracked(&self, _member: &Member, _thread: &Thread) {
        self.tracked.fetch_add(1, Ordering::SeqCst);
    }

    fn on_thread_read(&self, _member: &Member, _thread: &Thread) {
        self.read.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct TestTracker {
    pub tracker: ThreadsTracker,
    pub categories: Arc<RecordingCategories>,
    pub notifications: Arc<RecordingNotifications>,
    pub observer: Arc<CountingObserver>,
}

pub fn tracker_over(db: Database) -> TestTracker {
    let categories = RecordingCategories::new();
    let notifications = RecordingNotifications::new();
    let observer = Arc::new(CountingObserver::default());

    let mut tracker = ThreadsTracker::new(db, categories.clone(), notifications.clone());
    tracker.add_observer(observer.clone());

    TestTracker {
        tracker,
        categories,
        notifications,
        observer,
    }
}

pub async fn memory_tracker() -> TestTracker {
    let db = Database::new(":memory:").await.expect("in-memory database");
    tracker_over(db)
}

pub async fn seed_category_read(
    db: &Database,
    user_id: i64,
    category_id: i64,
    last_read_on: DateTime<Utc>,
) {
    sqlx::query(
        "INSERT INTO category_reads (user_id, category_id, last_read_on) VALUES (?, ?, ?)",
    )
    .bind(user_id)
    .bind(category_id)
    .bind(last_read_on.timestamp_micros())
    .execute(db.pool())
    .await
    .expect("seed category read");
}

pub async fn seed_thread_read(
    db: &Database,
    user_id: i64,
    category_id: i64,
    thread_id: i64,
    read_replies: i64,
    last_read_on: DateTime<Utc>,
) {
    sqlx::query(
        "INSERT INTO thread_reads (user_id, category_id, thread_id, read_replies, last_read_on) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(category_id)
    .bind(thread_id)
    .bind(read_replies)
    .bind(last_read_on.timestamp_micros())
    .execute(db.pool())
    .await
    .expect("seed thread read");
}

/// Seed a thread's posts: `(posted_on, is_moderated)` tuples, first one
/// being the starter.
pub async fn seed_posts(db: &Database, thread_id: i64, posts: &[(DateTime<Utc>, bool)]) {
    for (posted_on, is_moderated) in posts {
        threadmarks::db::posts::record_post(db.pool(), thread_id, *posted_on, *is_moderated)
            .await
            .expect("seed post");
    }
}

pub async fn thread_read_row(db: &Database, user_id: i64, thread_id: i64) -> Option<(i64, i64)> {
    sqlx::query_as::<_, (i64, i64)>(
        "SELECT read_replies, last_read_on FROM thread_reads WHERE user_id = ? AND thread_id = ?",
    )
    .bind(user_id)
    .bind(thread_id)
    .fetch_optional(db.pool())
    .await
    .expect("query thread read")
}

pub async fn category_read_row(db: &Database, user_id: i64, category_id: i64) -> Option<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT last_read_on FROM category_reads WHERE user_id = ? AND category_id = ?",
    )
    .bind(user_id)
    .bind(category_id)
    .fetch_optional(db.pool())
    .await
    .expect("query category read")
}
