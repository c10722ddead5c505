//! Profile and user-administration use cases

use uuid::Uuid;

use crate::domain::entities::{ProfileUpdate, User, UserFilter};
use crate::domain::validation::{split_name, MIN_NAME_LEN};
use crate::repository::UserRepository;
use worklane_auth::Role;
use worklane_common::{Error, Page, Result};

/// Read intent: one user by id
#[derive(Debug, Clone, Copy)]
pub struct GetUserQuery {
    pub user_id: Uuid,
}

/// Read intent: filtered user listing
#[derive(Debug, Clone)]
pub struct ListUsersQuery {
    pub filter: UserFilter,
    pub page: i64,
    pub limit: i64,
}

/// Write intent: update own profile
#[derive(Debug, Clone)]
pub struct UpdateProfileCommand {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Write intent: change a user's role (admin only at the route layer)
#[derive(Debug, Clone, Copy)]
pub struct ChangeRoleCommand {
    pub user_id: Uuid,
    pub role: Role,
}

/// Write intent: soft-delete a user
#[derive(Debug, Clone, Copy)]
pub struct DeactivateUserCommand {
    pub user_id: Uuid,
}

pub async fn handle_get_user(query: GetUserQuery, users: &dyn UserRepository) -> Result<User> {
    users
        .find_by_id(query.user_id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))
}

pub async fn handle_list_users(
    query: ListUsersQuery,
    users: &dyn UserRepository,
) -> Result<Page<User>> {
    users.find_all(&query.filter, query.page, query.limit).await
}

pub async fn handle_update_profile(
    command: UpdateProfileCommand,
    users: &dyn UserRepository,
) -> Result<User> {
    let mut update = ProfileUpdate {
        avatar_url: command.avatar_url,
        ..Default::default()
    };

    if let Some(name) = command.name {
        let name = name.trim().to_string();
        if name.chars().count() < MIN_NAME_LEN {
            return Err(Error::Validation(
                "Name must be at least 2 characters".to_string(),
            ));
        }
        let (first_name, last_name) = split_name(&name);
        update.first_name = Some(first_name);
        update.last_name = Some(last_name);
    }

    users.update_profile(command.user_id, update).await
}

pub async fn handle_change_role(
    command: ChangeRoleCommand,
    users: &dyn UserRepository,
) -> Result<User> {
    users.update_role(command.user_id, command.role).await
}

pub async fn handle_deactivate_user(
    command: DeactivateUserCommand,
    users: &dyn UserRepository,
) -> Result<()> {
    users.deactivate(command.user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewUser;
    use crate::repository::InMemoryUserRepository;

    async fn seed(repo: &InMemoryUserRepository, email: &str) -> User {
        repo.create(NewUser {
            email: email.to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Member,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_update_profile_resplits_name() {
        let repo = InMemoryUserRepository::new();
        let user = seed(&repo, "grace@example.com").await;

        let updated = handle_update_profile(
            UpdateProfileCommand {
                user_id: user.id,
                name: Some("Grace Brewster Murray".to_string()),
                avatar_url: None,
            },
            &repo,
        )
        .await
        .unwrap();

        assert_eq!(updated.first_name, "Grace");
        assert_eq!(updated.last_name, "Brewster Murray");
    }

    #[tokio::test]
    async fn test_update_profile_rejects_short_name() {
        let repo = InMemoryUserRepository::new();
        let user = seed(&repo, "grace@example.com").await;

        let result = handle_update_profile(
            UpdateProfileCommand {
                user_id: user.id,
                name: Some(" G ".to_string()),
                avatar_url: None,
            },
            &repo,
        )
        .await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_missing_user_not_found() {
        let repo = InMemoryUserRepository::new();
        let result = handle_get_user(
            GetUserQuery {
                user_id: Uuid::new_v4(),
            },
            &repo,
        )
        .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_change_role() {
        let repo = InMemoryUserRepository::new();
        let user = seed(&repo, "grace@example.com").await;
        let updated = handle_change_role(
            ChangeRoleCommand {
                user_id: user.id,
                role: Role::Admin,
            },
            &repo,
        )
        .await
        .unwrap();
        assert_eq!(updated.role, Role::Admin);
    }
}
