//! Notification and activity-feed use cases

use uuid::Uuid;

use crate::domain::entities::{
    Activity, ActivityFilter, Notification, NotificationFilter,
};
use crate::repository::{ActivityRepository, NotificationRepository};
use worklane_auth::Principal;
use worklane_common::{Error, Page, Result};

/// Read intent: the caller's notification feed
#[derive(Debug, Clone)]
pub struct ListNotificationsQuery {
    pub user_id: Uuid,
    pub unread_only: bool,
    pub page: i64,
    pub limit: i64,
}

/// Write intent: mark one notification read
#[derive(Debug, Clone, Copy)]
pub struct MarkReadCommand {
    pub notification_id: Uuid,
}

/// Write intent: mark the caller's whole feed read
#[derive(Debug, Clone, Copy)]
pub struct MarkAllReadCommand {
    pub user_id: Uuid,
}

/// Write intent: delete a notification
#[derive(Debug, Clone, Copy)]
pub struct DeleteNotificationCommand {
    pub notification_id: Uuid,
}

/// Read intent: the activity feed
#[derive(Debug, Clone)]
pub struct ListActivitiesQuery {
    pub filter: ActivityFilter,
    pub page: i64,
    pub limit: i64,
}

pub async fn handle_list_notifications(
    query: ListNotificationsQuery,
    notifications: &dyn NotificationRepository,
) -> Result<Page<Notification>> {
    let filter = NotificationFilter {
        user_id: Some(query.user_id),
        unread_only: query.unread_only,
    };
    notifications.find_all(&filter, query.page, query.limit).await
}

/// Load a notification and check the caller may touch it (owner or admin)
async fn load_owned(
    principal: &Principal,
    notification_id: Uuid,
    notifications: &dyn NotificationRepository,
) -> Result<Notification> {
    let notification = notifications
        .find_by_id(notification_id)
        .await?
        .ok_or_else(|| Error::NotFound("Notification not found".to_string()))?;

    if !principal.is_self_or_admin(notification.user_id) {
        return Err(Error::Authorization(
            "This notification belongs to another user".to_string(),
        ));
    }

    Ok(notification)
}

pub async fn handle_mark_read(
    principal: &Principal,
    command: MarkReadCommand,
    notifications: &dyn NotificationRepository,
) -> Result<Notification> {
    load_owned(principal, command.notification_id, notifications).await?;
    notifications.mark_read(command.notification_id).await
}

pub async fn handle_mark_all_read(
    command: MarkAllReadCommand,
    notifications: &dyn NotificationRepository,
) -> Result<u64> {
    notifications.mark_all_read(command.user_id).await
}

pub async fn handle_delete_notification(
    principal: &Principal,
    command: DeleteNotificationCommand,
    notifications: &dyn NotificationRepository,
) -> Result<()> {
    load_owned(principal, command.notification_id, notifications).await?;
    notifications.delete(command.notification_id).await
}

pub async fn handle_list_activities(
    query: ListActivitiesQuery,
    activities: &dyn ActivityRepository,
) -> Result<Page<Activity>> {
    activities.find_all(&query.filter, query.page, query.limit).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewNotification;
    use crate::repository::InMemoryNotificationRepository;
    use worklane_auth::Role;

    #[tokio::test]
    async fn test_mark_read_checks_ownership() {
        let repo = InMemoryNotificationRepository::new();
        let owner = Principal::new(Uuid::new_v4(), "owner@example.com", Role::Member);
        let notification = repo
            .create(NewNotification {
                user_id: owner.user_id,
                kind: "task_assigned".to_string(),
                title: "You were assigned".to_string(),
                body: None,
            })
            .await
            .unwrap();

        let other = Principal::new(Uuid::new_v4(), "other@example.com", Role::Member);
        let result = handle_mark_read(
            &other,
            MarkReadCommand {
                notification_id: notification.id,
            },
            &repo,
        )
        .await;
        assert!(matches!(result, Err(Error::Authorization(_))));

        let marked = handle_mark_read(
            &owner,
            MarkReadCommand {
                notification_id: notification.id,
            },
            &repo,
        )
        .await
        .unwrap();
        assert!(marked.is_read);

        // Admin bypasses ownership
        let admin = Principal::new(Uuid::new_v4(), "admin@example.com", Role::Admin);
        assert!(handle_delete_notification(
            &admin,
            DeleteNotificationCommand {
                notification_id: notification.id,
            },
            &repo,
        )
        .await
        .is_ok());
    }

    #[tokio::test]
    async fn test_list_scopes_to_caller() {
        let repo = InMemoryNotificationRepository::new();
        let user = Uuid::new_v4();
        repo.create(NewNotification {
            user_id: user,
            kind: "comment".to_string(),
            title: "mine".to_string(),
            body: None,
        })
        .await
        .unwrap();
        repo.create(NewNotification {
            user_id: Uuid::new_v4(),
            kind: "comment".to_string(),
            title: "someone else's".to_string(),
            body: None,
        })
        .await
        .unwrap();

        let page = handle_list_notifications(
            ListNotificationsQuery {
                user_id: user,
                unread_only: false,
                page: 1,
                limit: 50,
            },
            &repo,
        )
        .await
        .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].title, "mine");
    }
}
