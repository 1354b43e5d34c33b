//! Read-tracking operations.
//!
//! [`ThreadsTracker`] owns the database handle, the external collaborator
//! gateways and the signal observers. Annotation methods only read;
//! [`ThreadsTracker::read_thread`] is the sole write path and runs one
//! transaction per advance.

mod advance;
mod collaborators;
mod observer;
mod posts;
mod threads;

pub use collaborators::{
    BaselineCategories, CategoriesTracker, NoNotifications, NotificationsGateway,
};
pub use observer::TrackerObserver;
pub use posts::posts_read_states;

use std::sync::Arc;

use crate::db::Database;

/// Per-user read tracking over forum threads.
pub struct ThreadsTracker {
    db: Database,
    categories: Arc<dyn CategoriesTracker>,
    notifications: Arc<dyn NotificationsGateway>,
    observers: Vec<Arc<dyn TrackerObserver>>,
}

impl ThreadsTracker {
    /// Create a tracker over `db` with the given collaborator gateways.
    pub fn new(
        db: Database,
        categories: Arc<dyn CategoriesTracker>,
        notifications: Arc<dyn NotificationsGateway>,
    ) -> Self {
        Self {
            db,
            categories,
            notifications,
            observers: Vec::new(),
        }
    }

    /// Subscribe an observer to the tracker's outbound signals.
    pub fn add_observer(&mut self, observer: Arc<dyn TrackerObserver>) {
        self.observers.push(observer);
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}
