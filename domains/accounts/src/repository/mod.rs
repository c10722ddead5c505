//! Repository abstraction for the Accounts domain

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewUser, ProfileUpdate, User, UserFilter};
use worklane_auth::Role;
use worklane_common::{Page, Result};

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

/// Shared handle to a user repository implementation
pub type DynUserRepository = Arc<dyn UserRepository>;

/// Persistence operations for the User aggregate.
///
/// `update_*` and `deactivate` surface a missing row as `Error::NotFound`;
/// every other failure propagates unchanged for generic 500 mapping.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Filtered, paginated listing; filters are conjunctive
    async fn find_all(&self, filter: &UserFilter, page: i64, limit: i64) -> Result<Page<User>>;

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User>;

    async fn update_role(&self, id: Uuid, role: Role) -> Result<User>;

    /// Soft delete: marks the user inactive
    async fn deactivate(&self, id: Uuid) -> Result<()>;

    /// Best-effort activity timestamp; callers may ignore the error
    async fn touch_last_active(&self, id: Uuid) -> Result<()>;
}
