//! Postgres-backed team repository

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::domain::entities::{NewTeam, Team, TeamFilter, TeamUpdate};
use crate::repository::TeamRepository;
use worklane_common::{Error, Page, Result};

const TEAM_COLUMNS: &str = "id, name, description, lead_id, member_ids, created_at, updated_at";

#[derive(Clone)]
pub struct PgTeamRepository {
    pool: PgPool,
}

impl PgTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &TeamFilter) {
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            builder
                .push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(member_id) = filter.member_id {
            builder
                .push(" AND (lead_id = ")
                .push_bind(member_id)
                .push(" OR ")
                .push_bind(member_id)
                .push(" = ANY(member_ids))");
        }
    }
}

#[async_trait]
impl TeamRepository for PgTeamRepository {
    async fn create(&self, team: NewTeam) -> Result<Team> {
        let created: Team = sqlx::query_as(&format!(
            r#"
            INSERT INTO teams (id, name, description, lead_id, member_ids, created_at, updated_at)
            VALUES ($1, $2, $3, $4, ARRAY[$4], NOW(), NOW())
            RETURNING {TEAM_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&team.name)
        .bind(&team.description)
        .bind(team.lead_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>> {
        let team: Option<Team> =
            sqlx::query_as(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(team)
    }

    async fn find_all(&self, filter: &TeamFilter, page: i64, limit: i64) -> Result<Page<Team>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM teams WHERE 1=1");
        Self::push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::new(format!("SELECT {TEAM_COLUMNS} FROM teams WHERE 1=1"));
        Self::push_filters(&mut query, filter);
        query
            .push(" ORDER BY created_at ASC, id ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind((page - 1) * limit);

        let data: Vec<Team> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(Page { data, total })
    }

    async fn update(&self, id: Uuid, update: TeamUpdate) -> Result<Team> {
        let updated: Option<Team> = sqlx::query_as(&format!(
            r#"
            UPDATE teams SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TEAM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.description)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Error::NotFound("Team not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Team not found".to_string()));
        }

        Ok(())
    }

    async fn add_member(&self, id: Uuid, user_id: Uuid) -> Result<Team> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Team not found".to_string()))?;

        if existing.is_member(user_id) {
            return Err(Error::Conflict(
                "User is already a member of this team".to_string(),
            ));
        }

        let updated: Option<Team> = sqlx::query_as(&format!(
            r#"
            UPDATE teams SET
                member_ids = array_append(member_ids, $2),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TEAM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Error::NotFound("Team not found".to_string()))
    }

    async fn remove_member(&self, id: Uuid, user_id: Uuid) -> Result<Team> {
        let updated: Option<Team> = sqlx::query_as(&format!(
            r#"
            UPDATE teams SET
                member_ids = array_remove(member_ids, $2),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TEAM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Error::NotFound("Team not found".to_string()))
    }
}
