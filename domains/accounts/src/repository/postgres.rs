//! Postgres-backed user repository
//!
//! Uses runtime `query_as` so the crate builds without a live database.

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::domain::entities::{NewUser, ProfileUpdate, User, UserFilter};
use crate::repository::UserRepository;
use worklane_auth::Role;
use worklane_common::{Error, Page, Result};

const USER_COLUMNS: &str = "id, email, first_name, last_name, avatar_url, role, \
                            password_hash, is_active, last_active_at, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &UserFilter) {
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            builder
                .push(" AND (first_name || ' ' || last_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR email ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(role) = filter.role {
            builder.push(" AND role = ").push_bind(role);
        }
        if let Some(is_active) = filter.is_active {
            builder.push(" AND is_active = ").push_bind(is_active);
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<User> {
        let created: User = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (id, email, first_name, last_name, password_hash, role,
                               is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, NOW(), NOW())
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user: Option<User> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user: Option<User> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    async fn find_all(&self, filter: &UserFilter, page: i64, limit: i64) -> Result<Page<User>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM users WHERE 1=1");
        Self::push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE 1=1"));
        Self::push_filters(&mut query, filter);
        query
            .push(" ORDER BY created_at ASC, id ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind((page - 1) * limit);

        let data: Vec<User> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(Page { data, total })
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User> {
        let updated: Option<User> = sqlx::query_as(&format!(
            r#"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                avatar_url = COALESCE($4, avatar_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.avatar_url)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<User> {
        let updated: Option<User> = sqlx::query_as(&format!(
            r#"
            UPDATE users SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    async fn deactivate(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    async fn touch_last_active(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_active_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
