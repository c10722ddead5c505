//! Repository abstraction for the Teams domain

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewTeam, Team, TeamFilter, TeamUpdate};
use worklane_common::{Page, Result};

pub use memory::InMemoryTeamRepository;
pub use postgres::PgTeamRepository;

pub type DynTeamRepository = Arc<dyn TeamRepository>;

/// Persistence operations for the Team aggregate
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn create(&self, team: NewTeam) -> Result<Team>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>>;

    async fn find_all(&self, filter: &TeamFilter, page: i64, limit: i64) -> Result<Page<Team>>;

    async fn update(&self, id: Uuid, update: TeamUpdate) -> Result<Team>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Membership add; a duplicate member is a conflict
    async fn add_member(&self, id: Uuid, user_id: Uuid) -> Result<Team>;

    async fn remove_member(&self, id: Uuid, user_id: Uuid) -> Result<Team>;
}
