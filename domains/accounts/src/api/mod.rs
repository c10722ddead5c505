//! HTTP surface of the Accounts domain

pub mod handlers;
pub mod routes;

use axum::extract::FromRef;

use crate::repository::DynUserRepository;
use worklane_auth::TokenService;

pub use routes::routes;

/// Router state for the Accounts domain
#[derive(Clone)]
pub struct AccountsState {
    pub users: DynUserRepository,
    pub tokens: TokenService,
}

impl FromRef<AccountsState> for TokenService {
    fn from_ref(state: &AccountsState) -> Self {
        state.tokens.clone()
    }
}
