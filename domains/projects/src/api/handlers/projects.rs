//! Project management API handlers
//!
//! Implements project CRUD, membership management, and the Kanban board
//! view. Creation requires the manager role; resource-level ownership and
//! membership rules live in the application handlers.

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
use crate::application::projects::{
    handle_add_member, handle_create_project, handle_delete_project, handle_get_board,
    handle_get_project, handle_list_projects, handle_remove_member, handle_update_project,
    BoardColumn, CreateProjectCommand, DeleteProjectCommand, GetBoardQuery, GetProjectQuery,
    ListProjectsQuery, ProjectMemberCommand, UpdateProjectCommand,
};
use crate::api::handlers::tasks::TaskResponse;
use crate::domain::entities::{Project, ProjectFilter, ProjectStatus, ProjectUpdate, TaskStatus};
use worklane_auth::{AuthUser, ManagerUser};
use worklane_common::{ApiResponse, Paginated, Pagination, Result, ValidatedJson};
use worklane_notifications::{record_activity, NewActivity};

/// Request for creating a project
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project display name
    #[validate(length(min = 2, max = 120))]
    pub name: String,

    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Request for updating a project
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 2, max = 120))]
    pub name: Option<String>,

    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Filter parameters for project listing
#[derive(Debug, Deserialize)]
pub struct ProjectListParams {
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    pub owner_id: Option<Uuid>,
    pub member_id: Option<Uuid>,
}

/// Project response for API operations
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
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

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            status: project.status,
            owner_id: project.owner_id,
            member_ids: project.member_ids,
            start_date: project.start_date,
            end_date: project.end_date,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// One Kanban column in the board response
#[derive(Debug, Serialize)]
pub struct BoardColumnResponse {
    pub status: TaskStatus,
    pub tasks: Vec<TaskResponse>,
}

impl From<BoardColumn> for BoardColumnResponse {
    fn from(column: BoardColumn) -> Self {
        Self {
            status: column.status,
            tasks: column.tasks.into_iter().map(TaskResponse::from).collect(),
        }
    }
}

/// POST /v1/projects
pub async fn create_project(
    ManagerUser(principal): ManagerUser,
    State(state): State<ProjectsState>,
    ValidatedJson(request): ValidatedJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProjectResponse>>)> {
    let command = CreateProjectCommand {
        name: request.name,
        description: request.description,
        owner_id: principal.user_id,
        start_date: request.start_date,
        end_date: request.end_date,
    };

    let project = handle_create_project(command, state.projects.as_ref()).await?;

    record_activity(
        state.activities.as_ref(),
        NewActivity {
            actor_id: principal.user_id,
            action: "project.created".to_string(),
            target_type: "project".to_string(),
            target_id: project.id,
            metadata: serde_json::json!({ "name": project.name.clone() }),
        },
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(project.into())),
    ))
}

/// GET /v1/projects
pub async fn list_projects(
    AuthUser(_principal): AuthUser,
    State(state): State<ProjectsState>,
    Query(pagination): Query<Pagination>,
    Query(params): Query<ProjectListParams>,
) -> Result<Json<ApiResponse<Paginated<ProjectResponse>>>> {
    let (page, limit) = (pagination.page(), pagination.limit());
    let query = ListProjectsQuery {
        filter: ProjectFilter {
            search: params.search,
            status: params.status,
            owner_id: params.owner_id,
            member_id: params.member_id,
        },
        page,
        limit,
    };

    let projects = handle_list_projects(query, state.projects.as_ref()).await?;
    let projects = worklane_common::Page {
        data: projects
            .data
            .into_iter()
            .map(ProjectResponse::from)
            .collect(),
        total: projects.total,
    };

    Ok(Json(ApiResponse::ok(Paginated::new(projects, page, limit))))
}

/// GET /v1/projects/{id}
pub async fn get_project(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProjectResponse>>> {
    let project = handle_get_project(
        &principal,
        GetProjectQuery { project_id: id },
        state.projects.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(project.into())))
}

/// PATCH /v1/projects/{id}
pub async fn update_project(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateProjectRequest>,
) -> Result<Json<ApiResponse<ProjectResponse>>> {
    let command = UpdateProjectCommand {
        project_id: id,
        update: ProjectUpdate {
            name: request.name,
            description: request.description,
            status: request.status,
            start_date: request.start_date,
            end_date: request.end_date,
        },
    };

    let project = handle_update_project(&principal, command, state.projects.as_ref()).await?;

    Ok(Json(ApiResponse::ok(project.into())))
}

/// DELETE /v1/projects/{id}
pub async fn delete_project(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    handle_delete_project(
        &principal,
        DeleteProjectCommand { project_id: id },
        state.projects.as_ref(),
    )
    .await?;

    record_activity(
        state.activities.as_ref(),
        NewActivity {
            actor_id: principal.user_id,
            action: "project.deleted".to_string(),
            target_type: "project".to_string(),
            target_id: id,
            metadata: serde_json::json!({}),
        },
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/projects/{id}/members/{user_id}
pub async fn add_member(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<ProjectResponse>>> {
    let project = handle_add_member(
        &principal,
        ProjectMemberCommand {
            project_id: id,
            user_id,
        },
        state.projects.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(project.into())))
}

/// DELETE /v1/projects/{id}/members/{user_id}
pub async fn remove_member(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<ProjectResponse>>> {
    let project = handle_remove_member(
        &principal,
        ProjectMemberCommand {
            project_id: id,
            user_id,
        },
        state.projects.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(project.into())))
}

/// GET /v1/projects/{id}/board
pub async fn get_board(
    AuthUser(principal): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<BoardColumnResponse>>>> {
    let board = handle_get_board(
        &principal,
        GetBoardQuery { project_id: id },
        state.projects.as_ref(),
        state.tasks.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(
        board.into_iter().map(BoardColumnResponse::from).collect(),
    )))
}
