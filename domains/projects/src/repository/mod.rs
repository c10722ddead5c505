//! Repository abstractions for the Projects domain

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{
    BulkTaskUpdate, Comment, NewComment, NewProject, NewSubtask, NewTask, NewTimeEntry, Project,
    ProjectFilter, ProjectUpdate, Subtask, SubtaskUpdate, Task, TaskFilter, TaskStatus, TaskUpdate,
    TimeEntry,
};
use worklane_common::{Page, Result};

pub use memory::{InMemoryProjectRepository, InMemoryTaskRepository};
pub use postgres::{PgProjectRepository, PgTaskRepository};

pub type DynProjectRepository = Arc<dyn ProjectRepository>;
pub type DynTaskRepository = Arc<dyn TaskRepository>;

/// Persistence operations for the Project aggregate
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: NewProject) -> Result<Project>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>>;

    async fn find_all(&self, filter: &ProjectFilter, page: i64, limit: i64)
        -> Result<Page<Project>>;

    async fn update(&self, id: Uuid, update: ProjectUpdate) -> Result<Project>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Idempotent membership add
    async fn add_member(&self, id: Uuid, user_id: Uuid) -> Result<Project>;

    async fn remove_member(&self, id: Uuid, user_id: Uuid) -> Result<Project>;
}

/// Persistence operations for the Task aggregate and its sub-resources
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: NewTask) -> Result<Task>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>>;

    async fn find_all(&self, filter: &TaskFilter, page: i64, limit: i64) -> Result<Page<Task>>;

    /// Every task of a project, unpaginated, for board grouping
    async fn find_for_project(&self, project_id: Uuid) -> Result<Vec<Task>>;

    async fn update(&self, id: Uuid, update: TaskUpdate) -> Result<Task>;

    async fn update_status(&self, id: Uuid, status: TaskStatus) -> Result<Task>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Idempotent assignee add
    async fn add_assignee(&self, id: Uuid, user_id: Uuid) -> Result<Task>;

    async fn remove_assignee(&self, id: Uuid, user_id: Uuid) -> Result<Task>;

    /// Apply the same update to every listed task; returns the number touched
    async fn bulk_update(&self, ids: &[Uuid], update: BulkTaskUpdate) -> Result<u64>;

    // Comments
    async fn add_comment(&self, comment: NewComment) -> Result<Comment>;
    async fn list_comments(&self, task_id: Uuid) -> Result<Vec<Comment>>;
    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>>;
    async fn delete_comment(&self, id: Uuid) -> Result<()>;

    // Subtasks
    async fn add_subtask(&self, subtask: NewSubtask) -> Result<Subtask>;
    async fn list_subtasks(&self, task_id: Uuid) -> Result<Vec<Subtask>>;
    async fn update_subtask(&self, id: Uuid, update: SubtaskUpdate) -> Result<Subtask>;
    async fn delete_subtask(&self, id: Uuid) -> Result<()>;

    // Time entries
    async fn add_time_entry(&self, entry: NewTimeEntry) -> Result<TimeEntry>;
    async fn list_time_entries(&self, task_id: Uuid) -> Result<Vec<TimeEntry>>;
    async fn find_time_entry(&self, id: Uuid) -> Result<Option<TimeEntry>>;
    async fn delete_time_entry(&self, id: Uuid) -> Result<()>;
}
