//! Team management API handlers
//!
//! Implements team CRUD and membership management. Creation requires the
//! manager role; lead/self/admin rules live in the application handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::TeamsState;
use crate::application::teams::{
    handle_add_team_member, handle_create_team, handle_delete_team, handle_get_team,
    handle_list_teams, handle_remove_team_member, handle_update_team, CreateTeamCommand,
    DeleteTeamCommand, GetTeamQuery, ListTeamsQuery, TeamMemberCommand, UpdateTeamCommand,
};
use crate::domain::entities::{Team, TeamFilter, TeamUpdate};
use worklane_auth::{AuthUser, ManagerUser};
use worklane_common::{ApiResponse, Paginated, Pagination, Result, ValidatedJson};

/// Request for creating a team
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 2, max = 120))]
    pub name: String,

    pub description: Option<String>,
}

/// Request for updating a team
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 2, max = 120))]
    pub name: Option<String>,

    pub description: Option<String>,
}

/// Filter parameters for team listing
#[derive(Debug, Deserialize)]
pub struct TeamListParams {
    pub search: Option<String>,
    pub member_id: Option<Uuid>,
}

/// Team response for API operations
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub lead_id: Uuid,
    pub member_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Team> for TeamResponse {
    fn from(team: Team) -> Self {
        Self {
            id: team.id,
            name: team.name,
            description: team.description,
            lead_id: team.lead_id,
            member_ids: team.member_ids,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

/// POST /v1/teams
pub async fn create_team(
    ManagerUser(principal): ManagerUser,
    State(state): State<TeamsState>,
    ValidatedJson(request): ValidatedJson<CreateTeamRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TeamResponse>>)> {
    let command = CreateTeamCommand {
        name: request.name,
        description: request.description,
        lead_id: principal.user_id,
    };

    let team = handle_create_team(command, state.teams.as_ref()).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(team.into()))))
}

/// GET /v1/teams
pub async fn list_teams(
    AuthUser(_principal): AuthUser,
    State(state): State<TeamsState>,
    Query(pagination): Query<Pagination>,
    Query(params): Query<TeamListParams>,
) -> Result<Json<ApiResponse<Paginated<TeamResponse>>>> {
    let (page, limit) = (pagination.page(), pagination.limit());
    let query = ListTeamsQuery {
        filter: TeamFilter {
            search: params.search,
            member_id: params.member_id,
        },
        page,
        limit,
    };

    let teams = handle_list_teams(query, state.teams.as_ref()).await?;
    let teams = worklane_common::Page {
        data: teams.data.into_iter().map(TeamResponse::from).collect(),
        total: teams.total,
    };

    Ok(Json(ApiResponse::ok(Paginated::new(teams, page, limit))))
}

/// GET /v1/teams/{id}
pub async fn get_team(
    AuthUser(_principal): AuthUser,
    State(state): State<TeamsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TeamResponse>>> {
    let team = handle_get_team(GetTeamQuery { team_id: id }, state.teams.as_ref()).await?;

    Ok(Json(ApiResponse::ok(team.into())))
}

/// PATCH /v1/teams/{id}
pub async fn update_team(
    AuthUser(principal): AuthUser,
    State(state): State<TeamsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTeamRequest>,
) -> Result<Json<ApiResponse<TeamResponse>>> {
    let command = UpdateTeamCommand {
        team_id: id,
        update: TeamUpdate {
            name: request.name,
            description: request.description,
        },
    };

    let team = handle_update_team(&principal, command, state.teams.as_ref()).await?;

    Ok(Json(ApiResponse::ok(team.into())))
}

/// DELETE /v1/teams/{id}
pub async fn delete_team(
    AuthUser(principal): AuthUser,
    State(state): State<TeamsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    handle_delete_team(
        &principal,
        DeleteTeamCommand { team_id: id },
        state.teams.as_ref(),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/teams/{id}/members/{user_id}
pub async fn add_member(
    AuthUser(principal): AuthUser,
    State(state): State<TeamsState>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<TeamResponse>>> {
    let team = handle_add_team_member(
        &principal,
        TeamMemberCommand {
            team_id: id,
            user_id,
        },
        state.teams.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(team.into())))
}

/// DELETE /v1/teams/{id}/members/{user_id}
pub async fn remove_member(
    AuthUser(principal): AuthUser,
    State(state): State<TeamsState>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<TeamResponse>>> {
    let team = handle_remove_team_member(
        &principal,
        TeamMemberCommand {
            team_id: id,
            user_id,
        },
        state.teams.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(team.into())))
}
