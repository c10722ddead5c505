//! HTTP surface of the Projects domain

pub mod handlers;
pub mod routes;

use axum::extract::FromRef;

use crate::repository::{DynProjectRepository, DynTaskRepository};
use worklane_auth::TokenService;
use worklane_notifications::{DynActivityRepository, DynNotificationRepository};

pub use routes::routes;

/// Router state for the Projects domain
#[derive(Clone)]
pub struct ProjectsState {
    pub projects: DynProjectRepository,
    pub tasks: DynTaskRepository,
    /// Best-effort activity feed sink
    pub activities: DynActivityRepository,
    /// Best-effort assignment notifications
    pub notifications: DynNotificationRepository,
    pub tokens: TokenService,
}

impl FromRef<ProjectsState> for TokenService {
    fn from_ref(state: &ProjectsState) -> Self {
        state.tokens.clone()
    }
}
