//! HTTP surface of the Teams domain

pub mod handlers;
pub mod routes;

use axum::extract::FromRef;

use crate::repository::DynTeamRepository;
use worklane_auth::TokenService;

pub use routes::routes;

/// Router state for the Teams domain
#[derive(Clone)]
pub struct TeamsState {
    pub teams: DynTeamRepository,
    pub tokens: TokenService,
}

impl FromRef<TeamsState> for TokenService {
    fn from_ref(state: &TeamsState) -> Self {
        state.tokens.clone()
    }
}
