//! Repository abstractions for the Notifications domain

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{
    Activity, ActivityFilter, NewActivity, NewNotification, Notification, NotificationFilter,
};
use worklane_common::{Page, Result};

pub use memory::{InMemoryActivityRepository, InMemoryNotificationRepository};
pub use postgres::{PgActivityRepository, PgNotificationRepository};

pub type DynNotificationRepository = Arc<dyn NotificationRepository>;
pub type DynActivityRepository = Arc<dyn ActivityRepository>;

/// Persistence operations for the Notification aggregate
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: NewNotification) -> Result<Notification>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>>;

    async fn find_all(
        &self,
        filter: &NotificationFilter,
        page: i64,
        limit: i64,
    ) -> Result<Page<Notification>>;

    async fn mark_read(&self, id: Uuid) -> Result<Notification>;

    /// Mark every unread notification of one user; returns how many changed
    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Persistence operations for the append-only activity feed
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn record(&self, activity: NewActivity) -> Result<Activity>;

    async fn find_all(
        &self,
        filter: &ActivityFilter,
        page: i64,
        limit: i64,
    ) -> Result<Page<Activity>>;
}

/// Best-effort activity recording: failures are logged and swallowed so a
/// feed hiccup never fails the write that produced it.
pub async fn record_activity(activities: &dyn ActivityRepository, activity: NewActivity) {
    if let Err(e) = activities.record(activity).await {
        tracing::warn!(error = %e, "Failed to record activity");
    }
}

/// Best-effort notification delivery, same policy as `record_activity`
pub async fn notify(notifications: &dyn NotificationRepository, notification: NewNotification) {
    if let Err(e) = notifications.create(notification).await {
        tracing::warn!(error = %e, "Failed to deliver notification");
    }
}
