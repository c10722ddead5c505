//! Accounts domain: users, signup/login/refresh, profile and administration

pub mod api;
pub mod application;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{NewUser, ProfileUpdate, User, UserFilter};
pub use repository::{DynUserRepository, InMemoryUserRepository, PgUserRepository, UserRepository};

// Re-export API wiring
pub use api::routes;
pub use api::AccountsState;
