//! Notification and activity-feed API handlers
//!
//! Implements:
//! - GET    /v1/notifications           — Own notification feed
//! - PATCH  /v1/notifications/{id}/read — Mark one read
//! - POST   /v1/notifications/read-all  — Mark the whole feed read
//! - DELETE /v1/notifications/{id}      — Delete a notification
//! - GET    /v1/activities              — Activity feed

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::NotificationsState;
use crate::application::notifications::{
    handle_delete_notification, handle_list_activities, handle_list_notifications,
    handle_mark_all_read, handle_mark_read, DeleteNotificationCommand, ListActivitiesQuery,
    ListNotificationsQuery, MarkAllReadCommand, MarkReadCommand,
};
use crate::domain::entities::{Activity, ActivityFilter, Notification};
use worklane_auth::AuthUser;
use worklane_common::extractors::FEED_LIMIT;
use worklane_common::{ApiResponse, Paginated, Pagination, Result};

/// Notification feed parameters
#[derive(Debug, Deserialize)]
pub struct NotificationListParams {
    #[serde(default)]
    pub unread_only: bool,
}

/// Activity feed parameters
#[derive(Debug, Deserialize)]
pub struct ActivityListParams {
    pub actor_id: Option<Uuid>,
    pub target_type: Option<String>,
    pub target_id: Option<Uuid>,
}

/// Notification response
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub body: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            kind: notification.kind,
            title: notification.title,
            body: notification.body,
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

/// Activity response
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub action: String,
    pub target_type: String,
    pub target_id: Uuid,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id,
            actor_id: activity.actor_id,
            action: activity.action,
            target_type: activity.target_type,
            target_id: activity.target_id,
            metadata: activity.metadata,
            created_at: activity.created_at,
        }
    }
}

/// Result of a read-all sweep
#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

/// GET /v1/notifications
pub async fn list_notifications(
    AuthUser(principal): AuthUser,
    State(state): State<NotificationsState>,
    Query(pagination): Query<Pagination>,
    Query(params): Query<NotificationListParams>,
) -> Result<Json<ApiResponse<Paginated<NotificationResponse>>>> {
    let (page, limit) = (pagination.page(), pagination.limit_or(FEED_LIMIT));
    let query = ListNotificationsQuery {
        user_id: principal.user_id,
        unread_only: params.unread_only,
        page,
        limit,
    };

    let notifications = handle_list_notifications(query, state.notifications.as_ref()).await?;
    let notifications = worklane_common::Page {
        data: notifications
            .data
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
        total: notifications.total,
    };

    Ok(Json(ApiResponse::ok(Paginated::new(
        notifications,
        page,
        limit,
    ))))
}

/// PATCH /v1/notifications/{id}/read
pub async fn mark_read(
    AuthUser(principal): AuthUser,
    State(state): State<NotificationsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<NotificationResponse>>> {
    let notification = handle_mark_read(
        &principal,
        MarkReadCommand {
            notification_id: id,
        },
        state.notifications.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(notification.into())))
}

/// POST /v1/notifications/read-all
pub async fn mark_all_read(
    AuthUser(principal): AuthUser,
    State(state): State<NotificationsState>,
) -> Result<Json<ApiResponse<MarkAllReadResponse>>> {
    let updated = handle_mark_all_read(
        MarkAllReadCommand {
            user_id: principal.user_id,
        },
        state.notifications.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(MarkAllReadResponse { updated })))
}

/// DELETE /v1/notifications/{id}
pub async fn delete_notification(
    AuthUser(principal): AuthUser,
    State(state): State<NotificationsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    handle_delete_notification(
        &principal,
        DeleteNotificationCommand {
            notification_id: id,
        },
        state.notifications.as_ref(),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/activities
pub async fn list_activities(
    AuthUser(_principal): AuthUser,
    State(state): State<NotificationsState>,
    Query(pagination): Query<Pagination>,
    Query(params): Query<ActivityListParams>,
) -> Result<Json<ApiResponse<Paginated<ActivityResponse>>>> {
    let (page, limit) = (pagination.page(), pagination.limit_or(FEED_LIMIT));
    let query = ListActivitiesQuery {
        filter: ActivityFilter {
            actor_id: params.actor_id,
            target_type: params.target_type,
            target_id: params.target_id,
        },
        page,
        limit,
    };

    let activities = handle_list_activities(query, state.activities.as_ref()).await?;
    let activities = worklane_common::Page {
        data: activities
            .data
            .into_iter()
            .map(ActivityResponse::from)
            .collect(),
        total: activities.total,
    };

    Ok(Json(ApiResponse::ok(Paginated::new(
        activities,
        page,
        limit,
    ))))
}
