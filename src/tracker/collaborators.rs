//! External collaborator contracts.
//!
//! The category tracker and the notification gateway belong to the
//! embedding forum; the read tracker only invokes them. Methods take the
//! caller's connection so collaborator writes share the advance
//! transaction's atomicity.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqliteConnection;

use crate::db::{DbError, watermarks};
use crate::models::Member;

/// Category watermark collaborator.
#[async_trait]
pub trait CategoriesTracker: Send + Sync {
    /// Lazily create a category watermark for a member who has never
    /// tracked this category.
    async fn start_record(
        &self,
        conn: &mut SqliteConnection,
        member: &Member,
        category_id: i64,
    ) -> Result<(), DbError>;

    /// Cascade after a member fully reads a thread in the category:
    /// advance the category watermark when no newer unread content remains.
    async fn sync_record(
        &self,
        conn: &mut SqliteConnection,
        member: &Member,
        category_id: i64,
    ) -> Result<(), DbError>;
}

/// Notification-clearing collaborator.
#[async_trait]
pub trait NotificationsGateway: Send + Sync {
    /// Clear pending notifications matching the given trigger keys.
    async fn read_user_notifications(
        &self,
        conn: &mut SqliteConnection,
        member: &Member,
        trigger_keys: &[String],
        seen: bool,
    ) -> Result<(), DbError>;
}

/// Watermark-only category tracker.
///
/// Covers the lazy-creation half of the contract exactly: the baseline
/// watermark starts at the member's horizon. The cascade is rendered as an
/// unconditional advance to now; deciding whether other threads in the
/// category remain unread requires the forum's category tree, so
/// applications that need the precise cascade supply their own
/// implementation.
pub struct BaselineCategories;

#[async_trait]
impl CategoriesTracker for BaselineCategories {
    async fn start_record(
        &self,
        conn: &mut SqliteConnection,
        member: &Member,
        category_id: i64,
    ) -> Result<(), DbError> {
        watermarks::upsert_category_record(
            &mut *conn,
            member.id,
            category_id,
            member.reads_cutoff,
            false,
        )
        .await
    }

    async fn sync_record(
        &self,
        conn: &mut SqliteConnection,
        member: &Member,
        category_id: i64,
    ) -> Result<(), DbError> {
        watermarks::upsert_category_record(&mut *conn, member.id, category_id, Utc::now(), true)
            .await
    }
}

/// Gateway for deployments without a notification system.
pub struct NoNotifications;

#[async_trait]
impl NotificationsGateway for NoNotifications {
    async fn read_user_notifications(
        &self,
        _conn: &mut SqliteConnection,
        _member: &Member,
        _trigger_keys: &[String],
        _seen: bool,
    ) -> Result<(), DbError> {
        Ok(())
    }
}
