//! Signup, login, and token refresh use cases

use uuid::Uuid;

use crate::domain::entities::{NewUser, User};
use crate::domain::password::{hash_password, verify_password};
use crate::domain::validation::{is_valid_email, split_name, MIN_NAME_LEN, MIN_PASSWORD_LEN};
use crate::repository::UserRepository;
use worklane_auth::{Principal, Role, TokenPair, TokenService};
use worklane_common::{Error, Result};

/// Write intent: register a new account
#[derive(Debug, Clone)]
pub struct SignupCommand {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Write intent: authenticate with credentials
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Write intent: exchange a refresh token for a fresh pair
#[derive(Debug, Clone)]
pub struct RefreshCommand {
    pub refresh_token: String,
}

/// Result of the signup/login/refresh flows
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub user: User,
    pub tokens: TokenPair,
}

pub async fn handle_signup(
    command: SignupCommand,
    users: &dyn UserRepository,
    tokens: &TokenService,
) -> Result<AuthenticatedUser> {
    let name = command.name.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(Error::Validation(
            "Name must be at least 2 characters".to_string(),
        ));
    }
    if !is_valid_email(&command.email) {
        return Err(Error::Validation("Invalid email address".to_string()));
    }
    if command.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    if users.find_by_email(&command.email).await?.is_some() {
        return Err(Error::Conflict("Email is already in use".to_string()));
    }

    let (first_name, last_name) = split_name(name);
    let password_hash = hash_password(&command.password)?;

    let user = users
        .create(NewUser {
            email: command.email,
            first_name,
            last_name,
            password_hash,
            role: Role::Member,
        })
        .await?;

    let pair = tokens.issue_token_pair(&Principal::new(user.id, user.email.clone(), user.role))?;

    Ok(AuthenticatedUser { user, tokens: pair })
}

pub async fn handle_login(
    command: LoginCommand,
    users: &dyn UserRepository,
    tokens: &TokenService,
) -> Result<AuthenticatedUser> {
    // One message for every credential failure; the client learns nothing
    // about which part was wrong.
    let rejected = || Error::Authentication("Invalid email or password".to_string());

    let user = users
        .find_by_email(&command.email)
        .await?
        .ok_or_else(rejected)?;

    if !user.is_active || !verify_password(&command.password, &user.password_hash) {
        return Err(rejected());
    }

    // Best-effort activity stamp; a failure is logged and never surfaced
    if let Err(e) = users.touch_last_active(user.id).await {
        tracing::warn!(error = %e, user_id = %user.id, "Failed to update last_active_at");
    }

    let pair = tokens.issue_token_pair(&Principal::new(user.id, user.email.clone(), user.role))?;

    Ok(AuthenticatedUser { user, tokens: pair })
}

pub async fn handle_refresh(
    command: RefreshCommand,
    users: &dyn UserRepository,
    tokens: &TokenService,
) -> Result<AuthenticatedUser> {
    let claims = tokens.verify_refresh_token(&command.refresh_token)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| Error::Authentication("Invalid or expired token".to_string()))?;

    // Permissions come from the user's current stored role, never from the
    // (possibly stale) token claims.
    let user = users
        .find_by_id(user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| Error::Authentication("Invalid or expired token".to_string()))?;

    let pair = tokens.issue_token_pair(&Principal::new(user.id, user.email.clone(), user.role))?;

    Ok(AuthenticatedUser { user, tokens: pair })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryUserRepository;
    use worklane_auth::TokenConfig;

    fn token_service() -> TokenService {
        TokenService::new(TokenConfig::new(
            "access-secret-for-tests",
            "refresh-secret-for-tests",
            "worklane-test",
            "worklane-api",
            "15m",
            "7d",
        ))
    }

    fn signup(name: &str, email: &str, password: &str) -> SignupCommand {
        SignupCommand {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_splits_name_and_issues_tokens() {
        let users = InMemoryUserRepository::new();
        let tokens = token_service();

        let result = handle_signup(
            signup("Ali Veli Kara", "ali@example.com", "secret123"),
            &users,
            &tokens,
        )
        .await
        .unwrap();

        assert_eq!(result.user.first_name, "Ali");
        assert_eq!(result.user.last_name, "Veli Kara");
        assert_eq!(result.user.role, Role::Member);
        assert!(tokens.verify_access_token(&result.tokens.access_token).is_ok());
    }

    #[tokio::test]
    async fn test_signup_single_name_has_empty_last_name() {
        let users = InMemoryUserRepository::new();
        let result = handle_signup(
            signup("Ahmet", "ahmet@example.com", "secret123"),
            &users,
            &token_service(),
        )
        .await
        .unwrap();
        assert_eq!(result.user.first_name, "Ahmet");
        assert_eq!(result.user.last_name, "");
    }

    #[tokio::test]
    async fn test_signup_short_password_rejected_before_repository() {
        let users = InMemoryUserRepository::new();
        let result = handle_signup(
            signup("Ada Lovelace", "ada@example.com", "abc"),
            &users,
            &token_service(),
        )
        .await;

        assert!(
            matches!(result, Err(Error::Validation(ref m)) if m.contains("at least 6")),
            "expected password validation error"
        );
        assert!(users.is_empty(), "no repository write may happen");
    }

    #[tokio::test]
    async fn test_signup_duplicate_email_conflict_without_create() {
        let users = InMemoryUserRepository::new();
        let tokens = token_service();
        handle_signup(signup("Ada Lovelace", "ada@example.com", "secret123"), &users, &tokens)
            .await
            .unwrap();

        let result = handle_signup(
            signup("Another Ada", "ada@example.com", "secret456"),
            &users,
            &tokens,
        )
        .await;

        assert!(matches!(result, Err(Error::Conflict(ref m)) if m.contains("already in use")));
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_signup_rejects_bad_email() {
        let users = InMemoryUserRepository::new();
        let result = handle_signup(
            signup("Ada Lovelace", "not-an-email", "secret123"),
            &users,
            &token_service(),
        )
        .await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let users = InMemoryUserRepository::new();
        let tokens = token_service();
        handle_signup(signup("Ada Lovelace", "ada@example.com", "secret123"), &users, &tokens)
            .await
            .unwrap();

        let result = handle_login(
            LoginCommand {
                email: "ada@example.com".to_string(),
                password: "secret123".to_string(),
            },
            &users,
            &tokens,
        )
        .await
        .unwrap();

        assert_eq!(result.user.email, "ada@example.com");
        assert!(result.user.password_hash.starts_with("$2"));

        // Login stamps last_active_at best-effort
        let stored = users.find_by_id(result.user.id).await.unwrap().unwrap();
        assert!(stored.last_active_at.is_some());
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_look_identical() {
        let users = InMemoryUserRepository::new();
        let tokens = token_service();
        handle_signup(signup("Ada Lovelace", "ada@example.com", "secret123"), &users, &tokens)
            .await
            .unwrap();

        let wrong_password = handle_login(
            LoginCommand {
                email: "ada@example.com".to_string(),
                password: "wrong".to_string(),
            },
            &users,
            &tokens,
        )
        .await
        .unwrap_err();

        let unknown_email = handle_login(
            LoginCommand {
                email: "nobody@example.com".to_string(),
                password: "secret123".to_string(),
            },
            &users,
            &tokens,
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_deactivated_user_rejected() {
        let users = InMemoryUserRepository::new();
        let tokens = token_service();
        let created =
            handle_signup(signup("Ada Lovelace", "ada@example.com", "secret123"), &users, &tokens)
                .await
                .unwrap();
        users.deactivate(created.user.id).await.unwrap();

        let result = handle_login(
            LoginCommand {
                email: "ada@example.com".to_string(),
                password: "secret123".to_string(),
            },
            &users,
            &tokens,
        )
        .await;
        assert!(matches!(result, Err(Error::Authentication(_))));
    }

    #[tokio::test]
    async fn test_refresh_rederives_permissions_from_stored_role() {
        let users = InMemoryUserRepository::new();
        let tokens = token_service();
        let created =
            handle_signup(signup("Ada Lovelace", "ada@example.com", "secret123"), &users, &tokens)
                .await
                .unwrap();

        // Promote after the refresh token was issued
        users.update_role(created.user.id, Role::Manager).await.unwrap();

        let refreshed = handle_refresh(
            RefreshCommand {
                refresh_token: created.tokens.refresh_token,
            },
            &users,
            &tokens,
        )
        .await
        .unwrap();

        let principal = tokens
            .verify_access_token(&refreshed.tokens.access_token)
            .unwrap();
        assert_eq!(principal.role, Role::Manager);
        assert!(principal.has_permission("project:delete"));
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let users = InMemoryUserRepository::new();
        let tokens = token_service();
        let created =
            handle_signup(signup("Ada Lovelace", "ada@example.com", "secret123"), &users, &tokens)
                .await
                .unwrap();

        let result = handle_refresh(
            RefreshCommand {
                refresh_token: created.tokens.access_token,
            },
            &users,
            &tokens,
        )
        .await;
        assert!(matches!(result, Err(Error::Authentication(_))));
    }

    #[tokio::test]
    async fn test_refresh_rejects_deactivated_user() {
        let users = InMemoryUserRepository::new();
        let tokens = token_service();
        let created =
            handle_signup(signup("Ada Lovelace", "ada@example.com", "secret123"), &users, &tokens)
                .await
                .unwrap();
        users.deactivate(created.user.id).await.unwrap();

        let result = handle_refresh(
            RefreshCommand {
                refresh_token: created.tokens.refresh_token,
            },
            &users,
            &tokens,
        )
        .await;
        assert!(matches!(result, Err(Error::Authentication(_))));
    }
}
