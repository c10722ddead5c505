//! HTTP surface of the Notifications domain

pub mod handlers;
pub mod routes;

use axum::extract::FromRef;

use crate::repository::{DynActivityRepository, DynNotificationRepository};
use worklane_auth::TokenService;

pub use routes::routes;

/// Router state for the Notifications domain
#[derive(Clone)]
pub struct NotificationsState {
    pub notifications: DynNotificationRepository,
    pub activities: DynActivityRepository,
    pub tokens: TokenService,
}

impl FromRef<NotificationsState> for TokenService {
    fn from_ref(state: &NotificationsState) -> Self {
        state.tokens.clone()
    }
}
