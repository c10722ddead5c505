//! Route definitions for the Notifications domain API

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use super::handlers::notifications;
use super::NotificationsState;

/// Create all Notifications domain API routes
pub fn routes() -> Router<NotificationsState> {
    Router::new()
        .route("/v1/notifications", get(notifications::list_notifications))
        .route(
            "/v1/notifications/read-all",
            post(notifications::mark_all_read),
        )
        .route(
            "/v1/notifications/{id}/read",
            patch(notifications::mark_read),
        )
        .route(
            "/v1/notifications/{id}",
            delete(notifications::delete_notification),
        )
        .route("/v1/activities", get(notifications::list_activities))
}
