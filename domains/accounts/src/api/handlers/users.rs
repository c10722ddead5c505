//! User administration API handlers
//!
//! Implements:
//! - GET    /v1/users           — List users (admin)
//! - GET    /v1/users/{id}      — Get a user (self or admin)
//! - PATCH  /v1/users/{id}/role — Change a user's role (admin)
//! - DELETE /v1/users/{id}      — Deactivate a user (admin)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::AccountsState;
use crate::application::users::{
    handle_change_role, handle_deactivate_user, handle_get_user, handle_list_users,
    ChangeRoleCommand, DeactivateUserCommand, GetUserQuery, ListUsersQuery,
};
use crate::domain::entities::{User, UserFilter};
use worklane_auth::{AdminUser, AuthUser, Role};
use worklane_common::{ApiResponse, Paginated, Pagination, Result};

/// Response for user operations; excludes the password hash by construction
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub last_active_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            avatar_url: user.avatar_url,
            role: user.role,
            is_active: user.is_active,
            last_active_at: user.last_active_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Filter parameters for user listing
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub search: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// Request for changing a user's role
#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

/// GET /v1/users
pub async fn list_users(
    AdminUser(_admin): AdminUser,
    State(state): State<AccountsState>,
    Query(pagination): Query<Pagination>,
    Query(params): Query<UserListParams>,
) -> Result<Json<ApiResponse<Paginated<UserResponse>>>> {
    let (page, limit) = (pagination.page(), pagination.limit());
    let query = ListUsersQuery {
        filter: UserFilter {
            search: params.search,
            role: params.role,
            is_active: params.is_active,
        },
        page,
        limit,
    };

    let users = handle_list_users(query, state.users.as_ref()).await?;
    let users = worklane_common::Page {
        data: users.data.into_iter().map(UserResponse::from).collect(),
        total: users.total,
    };

    Ok(Json(ApiResponse::ok(Paginated::new(users, page, limit))))
}

/// GET /v1/users/{id}
pub async fn get_user(
    AuthUser(principal): AuthUser,
    State(state): State<AccountsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    principal.require_self_or_admin(id)?;

    let user = handle_get_user(GetUserQuery { user_id: id }, state.users.as_ref()).await?;

    Ok(Json(ApiResponse::ok(user.into())))
}

/// PATCH /v1/users/{id}/role
pub async fn change_role(
    AdminUser(_admin): AdminUser,
    State(state): State<AccountsState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangeRoleRequest>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let user = handle_change_role(
        ChangeRoleCommand {
            user_id: id,
            role: request.role,
        },
        state.users.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(user.into())))
}

/// DELETE /v1/users/{id}
pub async fn deactivate_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AccountsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    handle_deactivate_user(DeactivateUserCommand { user_id: id }, state.users.as_ref()).await?;

    Ok(StatusCode::NO_CONTENT)
}
