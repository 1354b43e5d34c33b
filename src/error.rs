//! Unified error handling for threadmarks.
//!
//! Storage errors stay in `db::DbError` next to sqlx (see `db/mod.rs`);
//! this module wraps them into the crate-level error surface and adds the
//! usage-contract violations callers can hit.

use thiserror::Error;

use crate::db::DbError;

/// Errors surfaced by tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("database error: {0}")]
    Db(#[from] DbError),

    /// Post annotation or a read advance was handed a thread state that did
    /// not come from the single-thread annotation path. Annotate the thread
    /// with `thread_read_state` first.
    #[error("thread state is not read-aware; annotate via thread_read_state first")]
    ThreadNotReadAware,
}

impl TrackerError {
    /// Static error code for log/metric labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Db(_) => "db_error",
            Self::ThreadNotReadAware => "thread_not_read_aware",
        }
    }
}

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
