//! Team aggregate

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Team aggregate; membership is a flat id list including the lead
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub lead_id: Uuid,
    pub member_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.lead_id == user_id || self.member_ids.contains(&user_id)
    }
}

/// Input for `TeamRepository::create`
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub description: Option<String>,
    pub lead_id: Uuid,
}

/// Partial team update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Conjunctive filters for team listing
#[derive(Debug, Clone, Default)]
pub struct TeamFilter {
    /// Case-insensitive match against name and description
    pub search: Option<String>,
    pub member_id: Option<Uuid>,
}
