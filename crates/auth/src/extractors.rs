//! Axum extractors for authorization
//!
//! Generic over any state `S` where `TokenService: FromRef<S>` — axum's
//! idiomatic nested-state pattern. Each extractor is one terminal guard of
//! the per-request authorization state machine: header present → bearer
//! extracted → token verified → role checked → principal attached.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AuthError;
use crate::permissions::Role;
use crate::principal::Principal;
use crate::token::{extract_bearer_token, TokenService};

/// Authenticated user extractor: any valid access token
#[derive(Debug)]
pub struct AuthUser(pub Principal);

impl<S> FromRequestParts<S> for AuthUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let service = TokenService::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorization)?;

        let token = extract_bearer_token(auth_header)?;
        let principal = service.verify_access_token(&token)?;

        Ok(AuthUser(principal))
    }
}

/// Optional authentication for routes that serve anonymous callers too.
///
/// A missing header yields `None`; a present header still goes through the
/// full verification path, so a bad token is rejected rather than demoted
/// to anonymous.
#[derive(Debug)]
pub struct OptionalAuthUser(pub Option<Principal>);

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        if parts.headers.get(AUTHORIZATION).is_none() {
            return Ok(OptionalAuthUser(None));
        }

        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;
        Ok(OptionalAuthUser(Some(principal)))
    }
}

/// Admin-only extractor.
///
/// Like `AuthUser` but rejects non-admin principals with 403.
#[derive(Debug)]
pub struct AdminUser(pub Principal);

impl<S> FromRequestParts<S> for AdminUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;

        if principal.role != Role::Admin {
            return Err(AuthError::InsufficientRole);
        }

        Ok(AdminUser(principal))
    }
}

/// Manager-or-admin extractor.
///
/// Admins always pass role checks, so the accepted set is
/// {Manager, Admin}.
#[derive(Debug)]
pub struct ManagerUser(pub Principal);

impl<S> FromRequestParts<S> for ManagerUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;

        if !matches!(principal.role, Role::Manager | Role::Admin) {
            return Err(AuthError::InsufficientRole);
        }

        Ok(ManagerUser(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenConfig;
    use axum::http::Request;
    use uuid::Uuid;

    #[derive(Clone)]
    struct TestState {
        tokens: TokenService,
    }

    impl FromRef<TestState> for TokenService {
        fn from_ref(state: &TestState) -> Self {
            state.tokens.clone()
        }
    }

    fn test_state() -> TestState {
        TestState {
            tokens: TokenService::new(TokenConfig::new(
                "access-secret-for-tests",
                "refresh-secret-for-tests",
                "worklane-test",
                "worklane-api",
                "15m",
                "7d",
            )),
        }
    }

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/v1/projects");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn token_for(state: &TestState, role: Role) -> String {
        let principal = Principal::new(Uuid::new_v4(), "test@example.com", role);
        state.tokens.issue_access_token(&principal).unwrap()
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let state = test_state();
        let mut parts = parts_with_header(None);
        let result = AuthUser::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthorization)));
    }

    #[tokio::test]
    async fn test_malformed_header_rejected() {
        let state = test_state();
        let mut parts = parts_with_header(Some("Token abc"));
        let result = AuthUser::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidFormat)));
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let state = test_state();
        let mut parts = parts_with_header(Some("Bearer not-a-jwt"));
        let result = AuthUser::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_valid_token_attaches_principal() {
        let state = test_state();
        let token = token_for(&state, Role::Member);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let AuthUser(principal) = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(principal.role, Role::Member);
        assert_eq!(principal.email, "test@example.com");
    }

    #[tokio::test]
    async fn test_admin_extractor_rejects_member() {
        let state = test_state();
        let token = token_for(&state, Role::Member);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let result = AdminUser::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InsufficientRole)));
    }

    #[tokio::test]
    async fn test_admin_extractor_accepts_admin() {
        let state = test_state();
        let token = token_for(&state, Role::Admin);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        assert!(AdminUser::from_request_parts(&mut parts, &state)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_manager_extractor_accepts_manager_and_admin() {
        let state = test_state();
        for role in [Role::Manager, Role::Admin] {
            let token = token_for(&state, role);
            let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
            assert!(
                ManagerUser::from_request_parts(&mut parts, &state)
                    .await
                    .is_ok(),
                "{role} should pass the manager guard"
            );
        }

        let token = token_for(&state, Role::Member);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let result = ManagerUser::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InsufficientRole)));
    }

    #[tokio::test]
    async fn test_optional_auth_anonymous_when_header_absent() {
        let state = test_state();
        let mut parts = parts_with_header(None);
        let OptionalAuthUser(principal) = OptionalAuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(principal.is_none());
    }

    #[tokio::test]
    async fn test_optional_auth_still_rejects_bad_token() {
        let state = test_state();
        let mut parts = parts_with_header(Some("Bearer junk"));
        let result = OptionalAuthUser::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
