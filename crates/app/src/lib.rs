//! Worklane application composition root
//!
//! Composes all domain routers into a single application. Every domain
//! receives its own explicitly constructed state (repositories plus the
//! shared token service); nothing is global.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use worklane_accounts::{AccountsState, PgUserRepository};
use worklane_auth::{TokenConfig, TokenService};
use worklane_common::Config;
use worklane_notifications::{
    NotificationsState, PgActivityRepository, PgNotificationRepository,
};
use worklane_projects::{PgProjectRepository, PgTaskRepository, ProjectsState};
use worklane_teams::{PgTeamRepository, TeamsState};

/// Build the token service from loaded configuration
pub fn token_service(config: &Config) -> TokenService {
    TokenService::new(TokenConfig::new(
        config.access_token_secret.clone(),
        config.refresh_token_secret.clone(),
        config.token_issuer.clone(),
        config.token_audience.clone(),
        &config.access_token_ttl,
        &config.refresh_token_ttl,
    ))
}

/// Create the main application router with all routes
pub fn create_app(config: &Config, pool: PgPool) -> Router {
    let tokens = token_service(config);

    let notifications: worklane_notifications::DynNotificationRepository =
        Arc::new(PgNotificationRepository::new(pool.clone()));
    let activities: worklane_notifications::DynActivityRepository =
        Arc::new(PgActivityRepository::new(pool.clone()));

    let accounts_state = AccountsState {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        tokens: tokens.clone(),
    };

    let projects_state = ProjectsState {
        projects: Arc::new(PgProjectRepository::new(pool.clone())),
        tasks: Arc::new(PgTaskRepository::new(pool.clone())),
        activities: activities.clone(),
        notifications: notifications.clone(),
        tokens: tokens.clone(),
    };

    let teams_state = TeamsState {
        teams: Arc::new(PgTeamRepository::new(pool)),
        tokens: tokens.clone(),
    };

    let notifications_state = NotificationsState {
        notifications,
        activities,
        tokens,
    };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(worklane_accounts::routes().with_state(accounts_state))
        .merge(worklane_projects::routes().with_state(projects_state))
        .merge(worklane_teams::routes().with_state(teams_state))
        .merge(worklane_notifications::routes().with_state(notifications_state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
