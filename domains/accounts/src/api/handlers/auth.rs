//! Authentication API handlers
//!
//! Implements:
//! - POST /v1/auth/signup  — Register a new account
//! - POST /v1/auth/login   — Exchange credentials for a token pair
//! - POST /v1/auth/refresh — Exchange a refresh token for a fresh pair
//! - GET  /v1/auth/me      — Current profile
//! - PATCH /v1/auth/me     — Update current profile

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::handlers::users::UserResponse;
use crate::api::AccountsState;
use crate::application::auth::{
    handle_login, handle_refresh, handle_signup, AuthenticatedUser, LoginCommand, RefreshCommand,
    SignupCommand,
};
use crate::application::users::{
    handle_get_user, handle_update_profile, GetUserQuery, UpdateProfileCommand,
};
use worklane_auth::{AuthUser, TokenPair};
use worklane_common::{ApiResponse, Result, ValidatedJson};

/// Request for account registration.
///
/// Lengths and shapes are business rules of the signup use case; the
/// handler passes them through untouched so the exact messages come from
/// one place.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request for credential login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request for token refresh
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Request for updating the current profile
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,

    #[validate(url)]
    pub avatar_url: Option<String>,
}

/// Response for the signup/login/refresh flows
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tokens: TokenPair,
}

impl From<AuthenticatedUser> for AuthResponse {
    fn from(authenticated: AuthenticatedUser) -> Self {
        Self {
            user: UserResponse::from(authenticated.user),
            tokens: authenticated.tokens,
        }
    }
}

/// POST /v1/auth/signup
pub async fn signup(
    State(state): State<AccountsState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let command = SignupCommand {
        name: request.name,
        email: request.email,
        password: request.password,
    };

    let authenticated = handle_signup(command, state.users.as_ref(), &state.tokens).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(authenticated.into())),
    ))
}

/// POST /v1/auth/login
pub async fn login(
    State(state): State<AccountsState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>> {
    let command = LoginCommand {
        email: request.email,
        password: request.password,
    };

    let authenticated = handle_login(command, state.users.as_ref(), &state.tokens).await?;

    Ok(Json(ApiResponse::ok(authenticated.into())))
}

/// POST /v1/auth/refresh
pub async fn refresh(
    State(state): State<AccountsState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>> {
    let command = RefreshCommand {
        refresh_token: request.refresh_token,
    };

    let authenticated = handle_refresh(command, state.users.as_ref(), &state.tokens).await?;

    Ok(Json(ApiResponse::ok(authenticated.into())))
}

/// GET /v1/auth/me
pub async fn me(
    AuthUser(principal): AuthUser,
    State(state): State<AccountsState>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let user = handle_get_user(
        GetUserQuery {
            user_id: principal.user_id,
        },
        state.users.as_ref(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(user.into())))
}

/// PATCH /v1/auth/me
pub async fn update_me(
    AuthUser(principal): AuthUser,
    State(state): State<AccountsState>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let command = UpdateProfileCommand {
        user_id: principal.user_id,
        name: request.name,
        avatar_url: request.avatar_url,
    };

    let user = handle_update_profile(command, state.users.as_ref()).await?;

    Ok(Json(ApiResponse::ok(user.into())))
}
