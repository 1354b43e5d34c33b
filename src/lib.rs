//! threadmarks - per-user read tracking for forum content.
//!
//! Given batches of threads (and their posts), derives what a user has and
//! has not read relative to three watermark kinds: the user's global
//! tracking horizon, per-category read records and per-thread read records
//! with reply counts. Advancing watermarks as the user reads is a single
//! transaction per call and emits "thread newly tracked" / "thread fully
//! read" signals.
//!
//! Annotation is read-only and safe to run concurrently across requests;
//! concurrent advances for the same (user, thread) serialize on the
//! storage's unique (user_id, thread_id) key and only ever move watermarks
//! forward.

pub mod config;
pub mod cutoff;
pub mod db;
pub mod error;
pub mod models;
pub mod tracker;

pub use config::TrackerConfig;
pub use cutoff::is_date_tracked;
pub use db::{Database, DbError};
pub use db::watermarks::{CategoryRead, ThreadRead};
pub use error::{TrackerError, TrackerResult};
pub use models::{
    Member, Post, PostReadState, Reader, Thread, ThreadReadState, TrackedCategory,
};
pub use tracker::{
    BaselineCategories, CategoriesTracker, NoNotifications, NotificationsGateway,
    ThreadsTracker, TrackerObserver, posts_read_states,
};
