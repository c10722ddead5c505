//! Task API handlers
//!
//! Implements task CRUD, status transitions, assignees, bulk updates, and
//! the comment/subtask/time-entry sub-resources.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::ProjectsState;
use crate::application::tasks::{
    handle_add_assignee, handle_add_comment, handle_add_subtask, handle_add_time_entry,
    handle_bulk_update_tasks, handle_create_task, handle_delete_comment, handle_delete_subtask,
    handle_delete_task, handle_delete_time_entry, handle_get_task, handle_list_comments,
    handle_list_subtasks, handle_list_tasks, handle_list_time_entries, handle_remove_assignee,
    handle_update_subtask, handle_update_task, handle_update_task_status, AddCommentCommand,
    AddSubtaskCommand, AddTimeEntryCommand, BulkUpdateTasksCommand, CreateTaskCommand,
    DeleteCommentCommand, DeleteSubtaskCommand, DeleteTaskCommand, DeleteTimeEntryCommand,
    GetTaskQuery, ListTasksQuery, TaskAssigneeCommand, UpdateSubtaskCommand, UpdateTaskCommand,
    UpdateTaskStatusCommand,
};
use crate::domain::entities::{
    BulkTaskUpdate, Comment, Subtask, SubtaskUpdate, Task, TaskFilter, TaskPriority, TaskStatus,
    TaskUpdate, TimeEntry,
};
use worklane_auth::AuthUser;
use worklane_common::{ApiResponse, Paginated, Pagination, Result, ValidatedJson};
use worklane_notifications::{notify, record_activity, NewActivity, NewNotification};

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

/// Request for creating a task
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 2, max = 200))]
    pub title: String,

    pub description: Option<String>,

    #[serde(default = "default_priority")]
    pub priority: TaskPriority,

    #[serde(default)]
    pub assignee_ids: Vec<Uuid>,

    pub due_date: Option<DateTime<Utc>>,
}

/// Request for updating a task
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 2, max = 200))]
    pub title: Option<String>,

    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Request for an explicit status transition
#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatusRequest {
    pub status: TaskStatus,
}

/// Request for a bulk task update
#[derive(Debug, Deserialize, Validate)]
pub struct BulkUpdateTasksRequest {
    #[validate(length(min = 1))]
    pub task_ids: Vec<Uuid>,

    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<Uuid>,
}

/// Filter parameters for task listing
#[derive(Debug, Deserialize)]
pub struct TaskListParams {
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<Uuid>,
    pub reporter_id: Option<Uuid>,
    pub due_before: Option<DateTime<Utc>>,
}

/// Request for adding a comment
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1))]
    pub body: String,
}

/// Request for adding a subtask
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubtaskRequest {
    #[validate(length(min = 2, max = 200))]
    pub title: String,
}

/// Request for updating a subtask
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSubtaskRequest {
    #[validate(length(min = 2, max = 200))]
    pub title: Option<String>,

    pub is_done: Option<bool>,
}

/// Request for logging time
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTimeEntryRequest {
    #[validate(range(min = 1))]
    pub minutes: i32,

    pub note: Option<String>,
}

/// Task response for API operations
#[derive(Debug, Serialize)]
pub struct TaskResponse {
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

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            project_id: task.project_id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            reporter_id: task.reporter_id,
            assignee_ids: task.assignee_ids,
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Comment response
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub task_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            task_id: comment.task_id,
            author_id: comment.author_id,
            body: comment.body,
            created_at: comment.created_at,
        }
    }
}

/// Subtask response
#[derive(Debug, Serialize)]
pub struct SubtaskResponse {
    pub id: Uuid,
    pub task_id: Uuid,
    pub title: String,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Subtask> for SubtaskResponse {
    fn from(subtask: Subtask) -> Self {
        Self {
            id: subtask.id,
            task_id: subtask.task_id,
            title: subtask.title,
            is_done: subtask.is_done,
            created_at: subtask.created_at,
        }
    }
}

/// Time entry response
#[derive(Debug, Serialize)]
pub struct TimeEntryResponse {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub minutes: i32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TimeEntry> for TimeEntryResponse {
    fn from(entry: TimeEntry) -> Self {
        Self {
            id: entry.id,
            task_id: entry.task_id,
            user_id: entry.user_id,
            minutes: entry.minutes,
            note: entry.note,
            created_at: entry.created_at,
        }
    }
}

/// Result of a bulk update
#[derive(Debug, Serialize)]
pub struct BulkUpdateResponse {
    pub updated: u64,
}

/// POST /v1/projects/{id}/tasks
pub async fn create_task(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(project_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TaskResponse>>)> {
    let command = CreateTaskCommand {
        project_id,
        title: request.title,
        description: request.description,
        priority: request.priority,
        reporter_id: principal.user_id,
        assignee_ids: request.assignee_ids,
        due_date: request.due_date,
    };

    let task = handle_create_task(
        &principal,
        command,
        state.projects.as_ref(),
        state.tasks.as_ref(),
    )
    .await?;

    record_activity(
        state.activities.as_ref(),
        NewActivity {
            actor_id: principal.user_id,
            action: "task.created".to_string(),
            target_type: "task".to_string(),
            target_id: task.id,
            metadata: serde_json::json!({ "title": task.title.clone() }),
        },
    )
    .await;

    for assignee_id in &task.assignee_ids {
        notify(
            state.notifications.as_ref(),
            NewNotification {
                user_id: *assignee_id,
                kind: "task_assigned".to_string(),
                title: format!("You were assigned to \"{}\"", task.title),
                body: None,
            },
        )
        .await;
    }

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(task.into()))))
}

/// GET /v1/projects/{id}/tasks
pub async fn list_tasks(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(project_id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
    Query(params): Query<TaskListParams>,
) -> Result<Json<ApiResponse<Paginated<TaskResponse>>>> {
    let (page, limit) = (pagination.page(), pagination.limit());
    let query = ListTasksQuery {
        filter: TaskFilter {
            project_id: Some(project_id),
            search: params.search,
            status: params.status,
            priority: params.priority,
            assignee_id: params.assignee_id,
            reporter_id: params.reporter_id,
            due_before: params.due_before,
        },
        page,
        limit,
    };

    let tasks = handle_list_tasks(
        &principal,
        query,
        state.projects.as_ref(),
        state.tasks.as_ref(),
    )
    .await?;
    let tasks = worklane_common::Page {
        data: tasks.data.into_iter().map(TaskResponse::from).collect(),
        total: tasks.total,
    };

    Ok(Json(ApiResponse::ok(Paginated::new(tasks, page, limit))))
}

/// GET /v1/tasks/{id}
pub async fn get_task(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TaskResponse>>> {
    let task = handle_get_task(
        &principal,
        GetTaskQuery { task_id: id },
        state.projects.as_ref(),
        state.tasks.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(task.into())))
}

/// PATCH /v1/tasks/{id}
pub async fn update_task(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTaskRequest>,
) -> Result<Json<ApiResponse<TaskResponse>>> {
    let command = UpdateTaskCommand {
        task_id: id,
        update: TaskUpdate {
            title: request.title,
            description: request.description,
            priority: request.priority,
            due_date: request.due_date,
        },
    };

    let task = handle_update_task(
        &principal,
        command,
        state.projects.as_ref(),
        state.tasks.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(task.into())))
}

/// PATCH /v1/tasks/{id}/status
pub async fn update_task_status(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTaskStatusRequest>,
) -> Result<Json<ApiResponse<TaskResponse>>> {
    let task = handle_update_task_status(
        &principal,
        UpdateTaskStatusCommand {
            task_id: id,
            status: request.status,
        },
        state.projects.as_ref(),
        state.tasks.as_ref(),
    )
    .await?;

    record_activity(
        state.activities.as_ref(),
        NewActivity {
            actor_id: principal.user_id,
            action: "task.status_changed".to_string(),
            target_type: "task".to_string(),
            target_id: task.id,
            metadata: serde_json::json!({ "status": task.status }),
        },
    )
    .await;

    Ok(Json(ApiResponse::ok(task.into())))
}

/// DELETE /v1/tasks/{id}
pub async fn delete_task(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    handle_delete_task(
        &principal,
        DeleteTaskCommand { task_id: id },
        state.projects.as_ref(),
        state.tasks.as_ref(),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/tasks/{id}/assignees/{user_id}
pub async fn add_assignee(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<TaskResponse>>> {
    let task = handle_add_assignee(
        &principal,
        TaskAssigneeCommand {
            task_id: id,
            user_id,
        },
        state.projects.as_ref(),
        state.tasks.as_ref(),
    )
    .await?;

    notify(
        state.notifications.as_ref(),
        NewNotification {
            user_id,
            kind: "task_assigned".to_string(),
            title: format!("You were assigned to \"{}\"", task.title),
            body: None,
        },
    )
    .await;

    Ok(Json(ApiResponse::ok(task.into())))
}

/// DELETE /v1/tasks/{id}/assignees/{user_id}
pub async fn remove_assignee(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<TaskResponse>>> {
    let task = handle_remove_assignee(
        &principal,
        TaskAssigneeCommand {
            task_id: id,
            user_id,
        },
        state.projects.as_ref(),
        state.tasks.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(task.into())))
}

/// PATCH /v1/tasks/bulk
pub async fn bulk_update_tasks(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    ValidatedJson(request): ValidatedJson<BulkUpdateTasksRequest>,
) -> Result<Json<ApiResponse<BulkUpdateResponse>>> {
    let command = BulkUpdateTasksCommand {
        task_ids: request.task_ids,
        update: BulkTaskUpdate {
            status: request.status,
            priority: request.priority,
            assignee_id: request.assignee_id,
        },
    };

    let updated = handle_bulk_update_tasks(&principal, command, state.tasks.as_ref()).await?;

    Ok(Json(ApiResponse::ok(BulkUpdateResponse { updated })))
}

/// POST /v1/tasks/{id}/comments
pub async fn add_comment(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentResponse>>)> {
    let comment = handle_add_comment(
        &principal,
        AddCommentCommand {
            task_id: id,
            author_id: principal.user_id,
            body: request.body,
        },
        state.projects.as_ref(),
        state.tasks.as_ref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(comment.into()))))
}

/// GET /v1/tasks/{id}/comments
pub async fn list_comments(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<CommentResponse>>>> {
    let comments = handle_list_comments(
        &principal,
        id,
        state.projects.as_ref(),
        state.tasks.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(
        comments.into_iter().map(CommentResponse::from).collect(),
    )))
}

/// DELETE /v1/comments/{id}
pub async fn delete_comment(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    handle_delete_comment(
        &principal,
        DeleteCommentCommand { comment_id: id },
        state.tasks.as_ref(),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/tasks/{id}/subtasks
pub async fn add_subtask(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateSubtaskRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubtaskResponse>>)> {
    let subtask = handle_add_subtask(
        &principal,
        AddSubtaskCommand {
            task_id: id,
            title: request.title,
        },
        state.projects.as_ref(),
        state.tasks.as_ref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(subtask.into()))))
}

/// GET /v1/tasks/{id}/subtasks
pub async fn list_subtasks(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<SubtaskResponse>>>> {
    let subtasks = handle_list_subtasks(
        &principal,
        id,
        state.projects.as_ref(),
        state.tasks.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(
        subtasks.into_iter().map(SubtaskResponse::from).collect(),
    )))
}

/// PATCH /v1/subtasks/{id}
pub async fn update_subtask(
    AuthUser(_principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateSubtaskRequest>,
) -> Result<Json<ApiResponse<SubtaskResponse>>> {
    let subtask = handle_update_subtask(
        UpdateSubtaskCommand {
            subtask_id: id,
            update: SubtaskUpdate {
                title: request.title,
                is_done: request.is_done,
            },
        },
        state.tasks.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(subtask.into())))
}

/// DELETE /v1/subtasks/{id}
pub async fn delete_subtask(
    AuthUser(_principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    handle_delete_subtask(DeleteSubtaskCommand { subtask_id: id }, state.tasks.as_ref()).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/tasks/{id}/time-entries
pub async fn add_time_entry(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateTimeEntryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TimeEntryResponse>>)> {
    let entry = handle_add_time_entry(
        &principal,
        AddTimeEntryCommand {
            task_id: id,
            user_id: principal.user_id,
            minutes: request.minutes,
            note: request.note,
        },
        state.projects.as_ref(),
        state.tasks.as_ref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(entry.into()))))
}

/// GET /v1/tasks/{id}/time-entries
pub async fn list_time_entries(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<TimeEntryResponse>>>> {
    let entries = handle_list_time_entries(
        &principal,
        id,
        state.projects.as_ref(),
        state.tasks.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(
        entries.into_iter().map(TimeEntryResponse::from).collect(),
    )))
}

/// DELETE /v1/time-entries/{id}
pub async fn delete_time_entry(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    handle_delete_time_entry(
        &principal,
        DeleteTimeEntryCommand { entry_id: id },
        state.tasks.as_ref(),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
