//! Postgres-backed project and task repositories
//!
//! Uses runtime `query_as` so the crate builds without a live database.
//! Membership and assignee lists are `uuid[]` columns mutated with
//! `array_append`/`array_remove`.

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::domain::entities::{
    BulkTaskUpdate, Comment, NewComment, NewProject, NewSubtask, NewTask, NewTimeEntry, Project,
    ProjectFilter, ProjectUpdate, Subtask, SubtaskUpdate, Task, TaskFilter, TaskStatus, TaskUpdate,
    TimeEntry,
};
use crate::repository::{ProjectRepository, TaskRepository};
use worklane_common::{Error, Page, Result};

const PROJECT_COLUMNS: &str = "id, name, description, status, owner_id, member_ids, \
                               start_date, end_date, created_at, updated_at";

const TASK_COLUMNS: &str = "id, project_id, title, description, status, priority, \
                            reporter_id, assignee_ids, due_date, created_at, updated_at";

#[derive(Clone)]
pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &ProjectFilter) {
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            builder
                .push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(owner_id) = filter.owner_id {
            builder.push(" AND owner_id = ").push_bind(owner_id);
        }
        if let Some(member_id) = filter.member_id {
            builder
                .push(" AND (owner_id = ")
                .push_bind(member_id)
                .push(" OR ")
                .push_bind(member_id)
                .push(" = ANY(member_ids))");
        }
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn create(&self, project: NewProject) -> Result<Project> {
        let created: Project = sqlx::query_as(&format!(
            r#"
            INSERT INTO projects (id, name, description, status, owner_id, member_ids,
                                  start_date, end_date, created_at, updated_at)
            VALUES ($1, $2, $3, 'active', $4, ARRAY[$4], $5, $6, NOW(), NOW())
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.owner_id)
        .bind(project.start_date)
        .bind(project.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>> {
        let project: Option<Project> = sqlx::query_as(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn find_all(
        &self,
        filter: &ProjectFilter,
        page: i64,
        limit: i64,
    ) -> Result<Page<Project>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM projects WHERE 1=1");
        Self::push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query =
            QueryBuilder::new(format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE 1=1"));
        Self::push_filters(&mut query, filter);
        query
            .push(" ORDER BY created_at ASC, id ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind((page - 1) * limit);

        let data: Vec<Project> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(Page { data, total })
    }

    async fn update(&self, id: Uuid, update: ProjectUpdate) -> Result<Project> {
        let updated: Option<Project> = sqlx::query_as(&format!(
            r#"
            UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.description)
        .bind(update.status)
        .bind(update.start_date)
        .bind(update.end_date)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Error::NotFound("Project not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Project not found".to_string()));
        }

        Ok(())
    }

    async fn add_member(&self, id: Uuid, user_id: Uuid) -> Result<Project> {
        let updated: Option<Project> = sqlx::query_as(&format!(
            r#"
            UPDATE projects SET
                member_ids = CASE
                    WHEN member_ids @> ARRAY[$2] THEN member_ids
                    ELSE array_append(member_ids, $2)
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Error::NotFound("Project not found".to_string()))
    }

    async fn remove_member(&self, id: Uuid, user_id: Uuid) -> Result<Project> {
        let updated: Option<Project> = sqlx::query_as(&format!(
            r#"
            UPDATE projects SET
                member_ids = array_remove(member_ids, $2),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Error::NotFound("Project not found".to_string()))
    }
}

#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &TaskFilter) {
        if let Some(project_id) = filter.project_id {
            builder.push(" AND project_id = ").push_bind(project_id);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            builder
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(priority) = filter.priority {
            builder.push(" AND priority = ").push_bind(priority);
        }
        if let Some(assignee_id) = filter.assignee_id {
            builder
                .push(" AND ")
                .push_bind(assignee_id)
                .push(" = ANY(assignee_ids)");
        }
        if let Some(reporter_id) = filter.reporter_id {
            builder.push(" AND reporter_id = ").push_bind(reporter_id);
        }
        if let Some(due_before) = filter.due_before {
            builder.push(" AND due_date < ").push_bind(due_before);
        }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, task: NewTask) -> Result<Task> {
        let created: Task = sqlx::query_as(&format!(
            r#"
            INSERT INTO tasks (id, project_id, title, description, status, priority,
                               reporter_id, assignee_ids, due_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 'todo', $5, $6, $7, $8, NOW(), NOW())
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(task.project_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority)
        .bind(task.reporter_id)
        .bind(&task.assignee_ids)
        .bind(task.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>> {
        let task: Option<Task> =
            sqlx::query_as(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(task)
    }

    async fn find_all(&self, filter: &TaskFilter, page: i64, limit: i64) -> Result<Page<Task>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM tasks WHERE 1=1");
        Self::push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks WHERE 1=1"));
        Self::push_filters(&mut query, filter);
        query
            .push(" ORDER BY created_at ASC, id ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind((page - 1) * limit);

        let data: Vec<Task> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(Page { data, total })
    }

    async fn find_for_project(&self, project_id: Uuid) -> Result<Vec<Task>> {
        let tasks: Vec<Task> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn update(&self, id: Uuid, update: TaskUpdate) -> Result<Task> {
        let updated: Option<Task> = sqlx::query_as(&format!(
            r#"
            UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                priority = COALESCE($4, priority),
                due_date = COALESCE($5, due_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.title)
        .bind(update.description)
        .bind(update.priority)
        .bind(update.due_date)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Error::NotFound("Task not found".to_string()))
    }

    async fn update_status(&self, id: Uuid, status: TaskStatus) -> Result<Task> {
        let updated: Option<Task> = sqlx::query_as(&format!(
            r#"
            UPDATE tasks SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Error::NotFound("Task not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Task not found".to_string()));
        }

        Ok(())
    }

    async fn add_assignee(&self, id: Uuid, user_id: Uuid) -> Result<Task> {
        let updated: Option<Task> = sqlx::query_as(&format!(
            r#"
            UPDATE tasks SET
                assignee_ids = CASE
                    WHEN assignee_ids @> ARRAY[$2] THEN assignee_ids
                    ELSE array_append(assignee_ids, $2)
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Error::NotFound("Task not found".to_string()))
    }

    async fn remove_assignee(&self, id: Uuid, user_id: Uuid) -> Result<Task> {
        let updated: Option<Task> = sqlx::query_as(&format!(
            r#"
            UPDATE tasks SET
                assignee_ids = array_remove(assignee_ids, $2),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Error::NotFound("Task not found".to_string()))
    }

    async fn bulk_update(&self, ids: &[Uuid], update: BulkTaskUpdate) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE tasks SET
                status = COALESCE($2, status),
                priority = COALESCE($3, priority),
                assignee_ids = CASE
                    WHEN $4::uuid IS NULL THEN assignee_ids
                    WHEN assignee_ids @> ARRAY[$4::uuid] THEN assignee_ids
                    ELSE array_append(assignee_ids, $4::uuid)
                END,
                updated_at = NOW()
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .bind(update.status)
        .bind(update.priority)
        .bind(update.assignee_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn add_comment(&self, comment: NewComment) -> Result<Comment> {
        let created: Comment = sqlx::query_as(
            r#"
            INSERT INTO task_comments (id, task_id, author_id, body, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, task_id, author_id, body, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(comment.task_id)
        .bind(comment.author_id)
        .bind(&comment.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_comments(&self, task_id: Uuid) -> Result<Vec<Comment>> {
        let comments: Vec<Comment> = sqlx::query_as(
            r#"
            SELECT id, task_id, author_id, body, created_at
            FROM task_comments
            WHERE task_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        let comment: Option<Comment> = sqlx::query_as(
            "SELECT id, task_id, author_id, body, created_at FROM task_comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM task_comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Comment not found".to_string()));
        }

        Ok(())
    }

    async fn add_subtask(&self, subtask: NewSubtask) -> Result<Subtask> {
        let created: Subtask = sqlx::query_as(
            r#"
            INSERT INTO task_subtasks (id, task_id, title, is_done, created_at)
            VALUES ($1, $2, $3, FALSE, NOW())
            RETURNING id, task_id, title, is_done, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(subtask.task_id)
        .bind(&subtask.title)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_subtasks(&self, task_id: Uuid) -> Result<Vec<Subtask>> {
        let subtasks: Vec<Subtask> = sqlx::query_as(
            r#"
            SELECT id, task_id, title, is_done, created_at
            FROM task_subtasks
            WHERE task_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subtasks)
    }

    async fn update_subtask(&self, id: Uuid, update: SubtaskUpdate) -> Result<Subtask> {
        let updated: Option<Subtask> = sqlx::query_as(
            r#"
            UPDATE task_subtasks SET
                title = COALESCE($2, title),
                is_done = COALESCE($3, is_done)
            WHERE id = $1
            RETURNING id, task_id, title, is_done, created_at
            "#,
        )
        .bind(id)
        .bind(update.title)
        .bind(update.is_done)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| Error::NotFound("Subtask not found".to_string()))
    }

    async fn delete_subtask(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM task_subtasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Subtask not found".to_string()));
        }

        Ok(())
    }

    async fn add_time_entry(&self, entry: NewTimeEntry) -> Result<TimeEntry> {
        let created: TimeEntry = sqlx::query_as(
            r#"
            INSERT INTO task_time_entries (id, task_id, user_id, minutes, note, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING id, task_id, user_id, minutes, note, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.task_id)
        .bind(entry.user_id)
        .bind(entry.minutes)
        .bind(&entry.note)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_time_entries(&self, task_id: Uuid) -> Result<Vec<TimeEntry>> {
        let entries: Vec<TimeEntry> = sqlx::query_as(
            r#"
            SELECT id, task_id, user_id, minutes, note, created_at
            FROM task_time_entries
            WHERE task_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn find_time_entry(&self, id: Uuid) -> Result<Option<TimeEntry>> {
        let entry: Option<TimeEntry> = sqlx::query_as(
            "SELECT id, task_id, user_id, minutes, note, created_at FROM task_time_entries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn delete_time_entry(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM task_time_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Time entry not found".to_string()));
        }

        Ok(())
    }
}
