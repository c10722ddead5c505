//! Route definitions for the Accounts domain API

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{auth, users};
use super::AccountsState;

/// Create authentication routes
fn auth_routes() -> Router<AccountsState> {
    Router::new()
        .route("/v1/auth/signup", post(auth::signup))
        .route("/v1/auth/login", post(auth::login))
        .route("/v1/auth/refresh", post(auth::refresh))
        .route("/v1/auth/me", get(auth::me).patch(auth::update_me))
}

/// Create user administration routes
fn user_routes() -> Router<AccountsState> {
    Router::new()
        .route("/v1/users", get(users::list_users))
        .route(
            "/v1/users/{id}",
            get(users::get_user).delete(users::deactivate_user),
        )
        .route("/v1/users/{id}/role", patch(users::change_role))
}

/// Create all Accounts domain API routes
pub fn routes() -> Router<AccountsState> {
    Router::new().merge(auth_routes()).merge(user_routes())
}
