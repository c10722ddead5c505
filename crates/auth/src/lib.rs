//! Token service and authorization middleware for the Worklane API
//!
//! Provides JWT issuing and validation, the role/permission model, and axum
//! extractors that work with any state implementing `FromRef<S>` for
//! `TokenService`.

mod claims;
mod config;
mod error;
mod extractors;
mod permissions;
mod principal;
mod token;

pub use claims::{AccessClaims, RefreshClaims, REFRESH_TOKEN_TYPE};
pub use config::TokenConfig;
pub use error::AuthError;
pub use extractors::{AdminUser, AuthUser, ManagerUser, OptionalAuthUser};
pub use permissions::{has_permission, permissions_for_role, Role, WILDCARD};
pub use principal::Principal;
pub use token::{extract_bearer_token, TokenPair, TokenService};
