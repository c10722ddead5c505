//! Team use cases: CRUD and membership management

use uuid::Uuid;

use crate::domain::entities::{NewTeam, Team, TeamFilter, TeamUpdate};
use crate::repository::TeamRepository;
use worklane_auth::Principal;
use worklane_common::{Error, Page, Result};

/// Team name bounds (trimmed characters)
const MIN_TEAM_NAME: usize = 2;
const MAX_TEAM_NAME: usize = 120;

/// Write intent: create a team led by the acting user
#[derive(Debug, Clone)]
pub struct CreateTeamCommand {
    pub name: String,
    pub description: Option<String>,
    pub lead_id: Uuid,
}

/// Read intent: filtered team listing
#[derive(Debug, Clone)]
pub struct ListTeamsQuery {
    pub filter: TeamFilter,
    pub page: i64,
    pub limit: i64,
}

/// Read intent: one team
#[derive(Debug, Clone, Copy)]
pub struct GetTeamQuery {
    pub team_id: Uuid,
}

/// Write intent: partial team update
#[derive(Debug, Clone)]
pub struct UpdateTeamCommand {
    pub team_id: Uuid,
    pub update: TeamUpdate,
}

/// Write intent: delete a team
#[derive(Debug, Clone, Copy)]
pub struct DeleteTeamCommand {
    pub team_id: Uuid,
}

/// Write intent: membership change
#[derive(Debug, Clone, Copy)]
pub struct TeamMemberCommand {
    pub team_id: Uuid,
    pub user_id: Uuid,
}

fn validate_team_name(name: &str) -> Result<String> {
    let name = name.trim();
    let len = name.chars().count();
    if !(MIN_TEAM_NAME..=MAX_TEAM_NAME).contains(&len) {
        return Err(Error::Validation(format!(
            "Team name must be between {MIN_TEAM_NAME} and {MAX_TEAM_NAME} characters"
        )));
    }
    Ok(name.to_string())
}

async fn load_team(teams: &dyn TeamRepository, team_id: Uuid) -> Result<Team> {
    teams
        .find_by_id(team_id)
        .await?
        .ok_or_else(|| Error::NotFound("Team not found".to_string()))
}

/// Reject callers who are neither the team lead nor admin
fn require_lead(principal: &Principal, team: &Team) -> Result<()> {
    if principal.is_self_or_admin(team.lead_id) {
        Ok(())
    } else {
        Err(Error::Authorization(
            "Only the team lead can do this".to_string(),
        ))
    }
}

pub async fn handle_create_team(
    command: CreateTeamCommand,
    teams: &dyn TeamRepository,
) -> Result<Team> {
    let name = validate_team_name(&command.name)?;

    teams
        .create(NewTeam {
            name,
            description: command.description,
            lead_id: command.lead_id,
        })
        .await
}

pub async fn handle_list_teams(
    query: ListTeamsQuery,
    teams: &dyn TeamRepository,
) -> Result<Page<Team>> {
    teams.find_all(&query.filter, query.page, query.limit).await
}

pub async fn handle_get_team(query: GetTeamQuery, teams: &dyn TeamRepository) -> Result<Team> {
    load_team(teams, query.team_id).await
}

pub async fn handle_update_team(
    principal: &Principal,
    command: UpdateTeamCommand,
    teams: &dyn TeamRepository,
) -> Result<Team> {
    let team = load_team(teams, command.team_id).await?;
    require_lead(principal, &team)?;

    let mut update = command.update;
    if let Some(name) = update.name.take() {
        update.name = Some(validate_team_name(&name)?);
    }

    teams.update(command.team_id, update).await
}

pub async fn handle_delete_team(
    principal: &Principal,
    command: DeleteTeamCommand,
    teams: &dyn TeamRepository,
) -> Result<()> {
    let team = load_team(teams, command.team_id).await?;
    require_lead(principal, &team)?;
    teams.delete(command.team_id).await
}

pub async fn handle_add_team_member(
    principal: &Principal,
    command: TeamMemberCommand,
    teams: &dyn TeamRepository,
) -> Result<Team> {
    let team = load_team(teams, command.team_id).await?;
    require_lead(principal, &team)?;
    teams.add_member(command.team_id, command.user_id).await
}

/// The lead and admins can remove anyone; members can remove themselves
pub async fn handle_remove_team_member(
    principal: &Principal,
    command: TeamMemberCommand,
    teams: &dyn TeamRepository,
) -> Result<Team> {
    let team = load_team(teams, command.team_id).await?;

    let removing_self = principal.user_id == command.user_id;
    if !removing_self {
        require_lead(principal, &team)?;
    }

    if command.user_id == team.lead_id {
        return Err(Error::Validation(
            "The team lead cannot be removed".to_string(),
        ));
    }

    teams.remove_member(command.team_id, command.user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryTeamRepository;
    use worklane_auth::Role;

    fn principal(role: Role) -> Principal {
        Principal::new(Uuid::new_v4(), "test@example.com", role)
    }

    async fn fixture() -> (InMemoryTeamRepository, Principal, Team) {
        let teams = InMemoryTeamRepository::new();
        let lead = principal(Role::Manager);
        let team = handle_create_team(
            CreateTeamCommand {
                name: "Platform".to_string(),
                description: None,
                lead_id: lead.user_id,
            },
            &teams,
        )
        .await
        .unwrap();
        (teams, lead, team)
    }

    #[tokio::test]
    async fn test_create_team_lead_becomes_member() {
        let (_, lead, team) = fixture().await;
        assert_eq!(team.lead_id, lead.user_id);
        assert!(team.is_member(lead.user_id));
    }

    #[tokio::test]
    async fn test_update_requires_lead_or_admin() {
        let (teams, _lead, team) = fixture().await;
        let member = principal(Role::Member);

        let result = handle_update_team(
            &member,
            UpdateTeamCommand {
                team_id: team.id,
                update: TeamUpdate {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            },
            &teams,
        )
        .await;
        assert!(matches!(result, Err(Error::Authorization(_))));

        let admin = principal(Role::Admin);
        assert!(handle_update_team(
            &admin,
            UpdateTeamCommand {
                team_id: team.id,
                update: TeamUpdate {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            },
            &teams,
        )
        .await
        .is_ok());
    }

    #[tokio::test]
    async fn test_member_can_leave_but_not_remove_others() {
        let (teams, lead, team) = fixture().await;
        let member = principal(Role::Member);
        let other = principal(Role::Member);

        handle_add_team_member(
            &lead,
            TeamMemberCommand {
                team_id: team.id,
                user_id: member.user_id,
            },
            &teams,
        )
        .await
        .unwrap();
        handle_add_team_member(
            &lead,
            TeamMemberCommand {
                team_id: team.id,
                user_id: other.user_id,
            },
            &teams,
        )
        .await
        .unwrap();

        // Removing someone else requires the lead
        let result = handle_remove_team_member(
            &member,
            TeamMemberCommand {
                team_id: team.id,
                user_id: other.user_id,
            },
            &teams,
        )
        .await;
        assert!(matches!(result, Err(Error::Authorization(_))));

        // Self-removal is allowed
        let team_after = handle_remove_team_member(
            &member,
            TeamMemberCommand {
                team_id: team.id,
                user_id: member.user_id,
            },
            &teams,
        )
        .await
        .unwrap();
        assert!(!team_after.member_ids.contains(&member.user_id));
    }

    #[tokio::test]
    async fn test_lead_cannot_be_removed() {
        let (teams, lead, team) = fixture().await;
        let result = handle_remove_team_member(
            &lead,
            TeamMemberCommand {
                team_id: team.id,
                user_id: lead.user_id,
            },
            &teams,
        )
        .await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
