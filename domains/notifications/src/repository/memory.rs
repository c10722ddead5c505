//! In-memory notification and activity repositories

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::entities::{
    Activity, ActivityFilter, NewActivity, NewNotification, Notification, NotificationFilter,
};
use crate::repository::{ActivityRepository, NotificationRepository};
use worklane_common::{Error, Page, Result};

fn page_newest_first<T, K>(mut rows: Vec<T>, key: K, page: i64, limit: i64) -> Page<T>
where
    K: Fn(&T) -> (chrono::DateTime<Utc>, Uuid),
{
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    let total = rows.len() as i64;
    let offset = ((page - 1) * limit).max(0) as usize;
    let data = rows
        .into_iter()
        .skip(offset)
        .take(limit.max(0) as usize)
        .collect();
    Page { data, total }
}

#[derive(Clone, Default)]
pub struct InMemoryNotificationRepository {
    notifications: Arc<Mutex<HashMap<Uuid, Notification>>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(notification: &Notification, filter: &NotificationFilter) -> bool {
        if let Some(user_id) = filter.user_id {
            if notification.user_id != user_id {
                return false;
            }
        }
        if filter.unread_only && notification.is_read {
            return false;
        }
        true
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(&self, notification: NewNotification) -> Result<Notification> {
        let created = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            kind: notification.kind,
            title: notification.title,
            body: notification.body,
            is_read: false,
            created_at: Utc::now(),
        };
        self.notifications
            .lock()
            .unwrap()
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
        Ok(self.notifications.lock().unwrap().get(&id).cloned())
    }

    async fn find_all(
        &self,
        filter: &NotificationFilter,
        page: i64,
        limit: i64,
    ) -> Result<Page<Notification>> {
        let notifications = self.notifications.lock().unwrap();
        let matching: Vec<Notification> = notifications
            .values()
            .filter(|n| Self::matches(n, filter))
            .cloned()
            .collect();
        Ok(page_newest_first(
            matching,
            |n| (n.created_at, n.id),
            page,
            limit,
        ))
    }

    async fn mark_read(&self, id: Uuid) -> Result<Notification> {
        let mut notifications = self.notifications.lock().unwrap();
        let notification = notifications
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Notification not found".to_string()))?;
        notification.is_read = true;
        Ok(notification.clone())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let mut notifications = self.notifications.lock().unwrap();
        let mut changed = 0;
        for notification in notifications.values_mut() {
            if notification.user_id == user_id && !notification.is_read {
                notification.is_read = true;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.notifications
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound("Notification not found".to_string()))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryActivityRepository {
    activities: Arc<Mutex<Vec<Activity>>>,
}

impl InMemoryActivityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(activity: &Activity, filter: &ActivityFilter) -> bool {
        if let Some(actor_id) = filter.actor_id {
            if activity.actor_id != actor_id {
                return false;
            }
        }
        if let Some(target_type) = &filter.target_type {
            if activity.target_type != *target_type {
                return false;
            }
        }
        if let Some(target_id) = filter.target_id {
            if activity.target_id != target_id {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl ActivityRepository for InMemoryActivityRepository {
    async fn record(&self, activity: NewActivity) -> Result<Activity> {
        let created = Activity {
            id: Uuid::new_v4(),
            actor_id: activity.actor_id,
            action: activity.action,
            target_type: activity.target_type,
            target_id: activity.target_id,
            metadata: activity.metadata,
            created_at: Utc::now(),
        };
        self.activities.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn find_all(
        &self,
        filter: &ActivityFilter,
        page: i64,
        limit: i64,
    ) -> Result<Page<Activity>> {
        let activities = self.activities.lock().unwrap();
        let matching: Vec<Activity> = activities
            .iter()
            .filter(|a| Self::matches(a, filter))
            .cloned()
            .collect();
        Ok(page_newest_first(
            matching,
            |a| (a.created_at, a.id),
            page,
            limit,
        ))
    }
}
