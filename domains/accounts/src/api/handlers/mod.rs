//! API handlers for the Accounts domain

pub mod auth;
pub mod users;

pub use users::UserResponse;
