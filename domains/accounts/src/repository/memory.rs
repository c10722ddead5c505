//! In-memory user repository
//!
//! Backs application-layer tests; mirrors the Postgres adapter's
//! failure semantics (missing row → `Error::NotFound`).

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::entities::{NewUser, ProfileUpdate, User, UserFilter};
use crate::repository::UserRepository;
use worklane_auth::Role;
use worklane_common::{Error, Page, Result};

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user directly, bypassing the create flow
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn matches(user: &User, filter: &UserFilter) -> bool {
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            let haystack = format!(
                "{} {} {}",
                user.first_name.to_lowercase(),
                user.last_name.to_lowercase(),
                user.email.to_lowercase()
            );
            if !haystack.contains(&needle) {
                return false;
            }
        }
        if let Some(role) = filter.role {
            if user.role != role {
                return false;
            }
        }
        if let Some(is_active) = filter.is_active {
            if user.is_active != is_active {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User> {
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            avatar_url: None,
            role: user.role,
            password_hash: user.password_hash,
            is_active: true,
            last_active_at: None,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_all(&self, filter: &UserFilter, page: i64, limit: i64) -> Result<Page<User>> {
        let users = self.users.lock().unwrap();
        let mut matching: Vec<User> = users
            .values()
            .filter(|u| Self::matches(u, filter))
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

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(avatar_url) = update.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn deactivate(&self, id: Uuid) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        user.is_active = false;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn touch_last_active(&self, id: Uuid) -> Result<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
            user.last_active_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password_hash: "hash".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_pagination_window() {
        let repo = InMemoryUserRepository::new();
        for i in 0..25 {
            repo.create(new_user(&format!("user{i:02}@example.com"), Role::Member))
                .await
                .unwrap();
        }

        let page = repo
            .find_all(&UserFilter::default(), 2, 10)
            .await
            .unwrap();
        assert_eq!(page.total, 25);
        assert_eq!(page.data.len(), 10);

        // Rows 11-20 under the stable creation ordering
        let all = repo.find_all(&UserFilter::default(), 1, 100).await.unwrap();
        assert_eq!(page.data[0].id, all.data[10].id);
        assert_eq!(page.data[9].id, all.data[19].id);
    }

    #[tokio::test]
    async fn test_filters_are_conjunctive() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice@example.com", Role::Manager))
            .await
            .unwrap();
        repo.create(new_user("bob@example.com", Role::Member))
            .await
            .unwrap();

        let filter = UserFilter {
            search: Some("alice".to_string()),
            role: Some(Role::Member),
            is_active: None,
        };
        let page = repo.find_all(&filter, 1, 20).await.unwrap();
        assert_eq!(page.total, 0);

        let filter = UserFilter {
            search: Some("ALICE".to_string()),
            role: Some(Role::Manager),
            is_active: None,
        };
        let page = repo.find_all(&filter, 1, 20).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let result = repo
            .update_profile(Uuid::new_v4(), ProfileUpdate::default())
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_deactivate_marks_inactive() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .create(new_user("alice@example.com", Role::Member))
            .await
            .unwrap();
        repo.deactivate(user.id).await.unwrap();
        let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert!(!stored.is_active);
    }
}
