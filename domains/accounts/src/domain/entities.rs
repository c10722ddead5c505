//! User entity and repository input types

use chrono::{DateTime, Utc};
use uuid::Uuid;
use worklane_auth::Role;

/// User aggregate.
///
/// `password_hash` never leaves the repository layer in a response; API
/// handlers map to a dedicated response type.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub password_hash: String,
    pub is_active: bool,
    pub last_active_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name: first + last, with the empty last name collapsed
    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Input for `UserRepository::create`
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: Role,
}

/// Partial profile update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Conjunctive filters for user listing
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive match against name and email
    pub search: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}
