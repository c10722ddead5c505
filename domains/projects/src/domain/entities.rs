//! Project and Task aggregates with their sub-resources

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    OnHold,
    Completed,
    Archived,
}

/// Task workflow status; the variant order is the Kanban column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    InReview,
    Done,
}

impl TaskStatus {
    /// Kanban columns in board order
    pub const BOARD_ORDER: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::InReview,
        TaskStatus::Done,
    ];
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "task_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Project aggregate; membership is a flat id list including the owner
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub owner_id: Uuid,
    pub member_ids: Vec<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id || self.member_ids.contains(&user_id)
    }
}

/// Input for `ProjectRepository::create`
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Partial project update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Conjunctive filters for project listing
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Case-insensitive match against name and description
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    pub owner_id: Option<Uuid>,
    pub member_id: Option<Uuid>,
}

/// Task aggregate
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub reporter_id: Uuid,
    pub assignee_ids: Vec<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for `TaskRepository::create`
#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub reporter_id: Uuid,
    pub assignee_ids: Vec<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial task update; status changes go through `update_status`
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Conjunctive filters for task listing
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub project_id: Option<Uuid>,
    /// Case-insensitive match against title and description
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<Uuid>,
    pub reporter_id: Option<Uuid>,
    pub due_before: Option<DateTime<Utc>>,
}

/// Fields applied to every task of a bulk update
#[derive(Debug, Clone, Default)]
pub struct BulkTaskUpdate {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Added to each task's assignee list when not already present
    pub assignee_id: Option<Uuid>,
}

/// Task comment
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub task_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub task_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
}

/// Task subtask (checklist item)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Subtask {
    pub id: Uuid,
    pub task_id: Uuid,
    pub title: String,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSubtask {
    pub task_id: Uuid,
    pub title: String,
}

/// Partial subtask update
#[derive(Debug, Clone, Default)]
pub struct SubtaskUpdate {
    pub title: Option<String>,
    pub is_done: Option<bool>,
}

/// Logged time against a task
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TimeEntry {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub minutes: i32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTimeEntry {
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub minutes: i32,
    pub note: Option<String>,
}
