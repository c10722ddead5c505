//! Teams domain: teams and membership management

pub mod api;
pub mod application;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{NewTeam, Team, TeamFilter, TeamUpdate};
pub use repository::{DynTeamRepository, InMemoryTeamRepository, PgTeamRepository, TeamRepository};

// Re-export API wiring
pub use api::routes;
pub use api::TeamsState;
