//! Watermark database models.

use chrono::{DateTime, Utc};

/// A per-(user, category) read watermark.
///
/// "User has read everything in this category up to `last_read_on`."
/// Existence alone is informative: it means the user has been exposed to
/// the category at least once.
#[derive(Debug, Clone)]
pub struct CategoryRead {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub last_read_on: DateTime<Utc>,
}

/// A per-(user, thread) read watermark.
///
/// Finer-grained than the category watermark; created once the user's
/// progress in a thread diverges from the category baseline. `read_replies`
/// excludes the thread's starting post.
#[derive(Debug, Clone)]
pub struct ThreadRead {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub thread_id: i64,
    pub read_replies: i64,
    pub last_read_on: DateTime<Utc>,
}
