//! Postgres-backed notification and activity repositories

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::domain::entities::{
    Activity, ActivityFilter, NewActivity, NewNotification, Notification, NotificationFilter,
};
use crate::repository::{ActivityRepository, NotificationRepository};
use worklane_common::{Error, Page, Result};

const NOTIFICATION_COLUMNS: &str = "id, user_id, kind, title, body, is_read, created_at";

const ACTIVITY_COLUMNS: &str = "id, actor_id, action, target_type, target_id, metadata, created_at";

#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &NotificationFilter) {
        if let Some(user_id) = filter.user_id {
            builder.push(" AND user_id = ").push_bind(user_id);
        }
        if filter.unread_only {
            builder.push(" AND is_read = FALSE");
        }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create(&self, notification: NewNotification) -> Result<Notification> {
        let created: Notification = sqlx::query_as(&format!(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, body, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, NOW())
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(notification.user_id)
        .bind(&notification.kind)
        .bind(&notification.title)
        .bind(&notification.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
        let notification: Option<Notification> = sqlx::query_as(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    async fn find_all(
        &self,
        filter: &NotificationFilter,
        page: i64,
        limit: i64,
    ) -> Result<Page<Notification>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM notifications WHERE 1=1");
        Self::push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::new(format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE 1=1"
        ));
        Self::push_filters(&mut query, filter);
        // Feeds read newest-first
        query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind((page - 1) * limit);

        let data: Vec<Notification> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(Page { data, total })
    }

    async fn mark_read(&self, id: Uuid) -> Result<Notification> {
        let updated: Option<Notification> = sqlx::query_as(&format!(
            r#"
            UPDATE notifications SET is_read = TRUE
            WHERE id = $1
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Error::NotFound("Notification not found".to_string()))
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE")
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Notification not found".to_string()));
        }

        Ok(())
    }
}

#[derive(Clone)]
pub struct PgActivityRepository {
    pool: PgPool,
}

impl PgActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &ActivityFilter) {
        if let Some(actor_id) = filter.actor_id {
            builder.push(" AND actor_id = ").push_bind(actor_id);
        }
        if let Some(target_type) = &filter.target_type {
            builder.push(" AND target_type = ").push_bind(target_type.clone());
        }
        if let Some(target_id) = filter.target_id {
            builder.push(" AND target_id = ").push_bind(target_id);
        }
    }
}

#[async_trait]
impl ActivityRepository for PgActivityRepository {
    async fn record(&self, activity: NewActivity) -> Result<Activity> {
        let created: Activity = sqlx::query_as(&format!(
            r#"
            INSERT INTO activities (id, actor_id, action, target_type, target_id, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING {ACTIVITY_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(activity.actor_id)
        .bind(&activity.action)
        .bind(&activity.target_type)
        .bind(activity.target_id)
        .bind(&activity.metadata)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_all(
        &self,
        filter: &ActivityFilter,
        page: i64,
        limit: i64,
    ) -> Result<Page<Activity>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM activities WHERE 1=1");
        Self::push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::new(format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE 1=1"
        ));
        Self::push_filters(&mut query, filter);
        query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind((page - 1) * limit);

        let data: Vec<Activity> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(Page { data, total })
    }
}
