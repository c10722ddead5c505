//! In-memory team repository

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::entities::{NewTeam, Team, TeamFilter, TeamUpdate};
use crate::repository::TeamRepository;
use worklane_common::{Error, Page, Result};

#[derive(Clone, Default)]
pub struct InMemoryTeamRepository {
    teams: Arc<Mutex<HashMap<Uuid, Team>>>,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(team: &Team, filter: &TeamFilter) -> bool {
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            let haystack = format!(
                "{} {}",
                team.name.to_lowercase(),
                team.description.as_deref().unwrap_or("").to_lowercase()
            );
            if !haystack.contains(&needle) {
                return false;
            }
        }
        if let Some(member_id) = filter.member_id {
            if !team.is_member(member_id) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn create(&self, team: NewTeam) -> Result<Team> {
        let now = Utc::now();
        let created = Team {
            id: Uuid::new_v4(),
            name: team.name,
            description: team.description,
            lead_id: team.lead_id,
            member_ids: vec![team.lead_id],
            created_at: now,
            updated_at: now,
        };
        self.teams.lock().unwrap().insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>> {
        Ok(self.teams.lock().unwrap().get(&id).cloned())
    }

    async fn find_all(&self, filter: &TeamFilter, page: i64, limit: i64) -> Result<Page<Team>> {
        let teams = self.teams.lock().unwrap();
        let mut matching: Vec<Team> = teams
            .values()
            .filter(|t| Self::matches(t, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let total = matching.len() as i64;
        let offset = ((page - 1) * limit).max(0) as usize;
        let data = matching
            .into_iter()
            .skip(offset)
            .take(limit.max(0) as usize)
            .collect();

        Ok(Page { data, total })
    }

    async fn update(&self, id: Uuid, update: TeamUpdate) -> Result<Team> {
        let mut teams = self.teams.lock().unwrap();
        let team = teams
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Team not found".to_string()))?;

        if let Some(name) = update.name {
            team.name = name;
        }
        if let Some(description) = update.description {
            team.description = Some(description);
        }
        team.updated_at = Utc::now();

        Ok(team.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.teams
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound("Team not found".to_string()))
    }

    async fn add_member(&self, id: Uuid, user_id: Uuid) -> Result<Team> {
        let mut teams = self.teams.lock().unwrap();
        let team = teams
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Team not found".to_string()))?;

        if team.is_member(user_id) {
            return Err(Error::Conflict(
                "User is already a member of this team".to_string(),
            ));
        }

        team.member_ids.push(user_id);
        team.updated_at = Utc::now();
        Ok(team.clone())
    }

    async fn remove_member(&self, id: Uuid, user_id: Uuid) -> Result<Team> {
        let mut teams = self.teams.lock().unwrap();
        let team = teams
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Team not found".to_string()))?;
        team.member_ids.retain(|m| *m != user_id);
        team.updated_at = Utc::now();
        Ok(team.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_team(lead_id: Uuid, name: &str) -> NewTeam {
        NewTeam {
            name: name.to_string(),
            description: None,
            lead_id,
        }
    }

    #[tokio::test]
    async fn test_duplicate_member_is_conflict() {
        let repo = InMemoryTeamRepository::new();
        let lead = Uuid::new_v4();
        let team = repo.create(new_team(lead, "Platform")).await.unwrap();
        let user = Uuid::new_v4();

        repo.add_member(team.id, user).await.unwrap();
        let result = repo.add_member(team.id, user).await;
        assert!(matches!(result, Err(Error::Conflict(_))));

        // The lead is a member by construction
        let result = repo.add_member(team.id, lead).await;
        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn test_search_filter_is_case_insensitive() {
        let repo = InMemoryTeamRepository::new();
        repo.create(new_team(Uuid::new_v4(), "Platform Crew"))
            .await
            .unwrap();
        repo.create(new_team(Uuid::new_v4(), "Design"))
            .await
            .unwrap();

        let filter = TeamFilter {
            search: Some("platform".to_string()),
            member_id: None,
        };
        let page = repo.find_all(&filter, 1, 20).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].name, "Platform Crew");
    }
}
