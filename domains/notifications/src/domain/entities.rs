//! Notification and Activity aggregates

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A message addressed to one user
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub body: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for `NotificationRepository::create`
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub body: Option<String>,
}

/// Filters for a user's notification feed
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    pub user_id: Option<Uuid>,
    pub unread_only: bool,
}

/// One append-only activity record: who did what to which resource
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub action: String,
    pub target_type: String,
    pub target_id: Uuid,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Input for `ActivityRepository::record`
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub actor_id: Uuid,
    pub action: String,
    pub target_type: String,
    pub target_id: Uuid,
    pub metadata: serde_json::Value,
}

/// Conjunctive filters for the activity feed
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub actor_id: Option<Uuid>,
    pub target_type: Option<String>,
    pub target_id: Option<Uuid>,
}
