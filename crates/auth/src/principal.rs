//! The authenticated identity attached to a request

use std::collections::BTreeSet;
use uuid::Uuid;

use crate::error::AuthError;
use crate::permissions::{has_permission, Role};

/// Authenticated identity and its derived permissions.
///
/// Built from access-token claims at verification time; lives for one
/// request. Never loaded from the database on the request path.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub permissions: BTreeSet<String>,
}

impl Principal {
    pub fn new(user_id: Uuid, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
            permissions: role.permissions(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Check a single permission, honouring the wildcard
    pub fn has_permission(&self, required: &str) -> bool {
        has_permission(&self.permissions, required)
    }

    /// All-of permission check; the first missing permission rejects with 403
    pub fn require_permissions(&self, required: &[&str]) -> Result<(), AuthError> {
        for permission in required {
            if !self.has_permission(permission) {
                return Err(AuthError::MissingPermission(permission.to_string()));
            }
        }
        Ok(())
    }

    /// Ownership check with admin bypass
    pub fn is_self_or_admin(&self, user_id: Uuid) -> bool {
        self.user_id == user_id || self.is_admin()
    }

    /// Ownership check with admin bypass, rejecting with 403
    pub fn require_self_or_admin(&self, user_id: Uuid) -> Result<(), AuthError> {
        if self.is_self_or_admin(user_id) {
            Ok(())
        } else {
            Err(AuthError::InsufficientRole)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal::new(Uuid::new_v4(), "test@example.com", role)
    }

    #[test]
    fn test_principal_permissions_derive_from_role() {
        let member = principal(Role::Member);
        assert!(member.has_permission("task:read"));
        assert!(!member.has_permission("project:delete"));

        let admin = principal(Role::Admin);
        assert!(admin.has_permission("project:delete"));
        assert!(admin.has_permission("anything:at-all"));
    }

    #[test]
    fn test_require_permissions_is_all_of() {
        let manager = principal(Role::Manager);
        assert!(manager
            .require_permissions(&["task:read", "project:delete"])
            .is_ok());
        let result = manager.require_permissions(&["task:read", "user:purge"]);
        assert!(matches!(result, Err(AuthError::MissingPermission(p)) if p == "user:purge"));
    }

    #[test]
    fn test_admin_passes_any_permission_check() {
        let admin = principal(Role::Admin);
        assert!(admin
            .require_permissions(&["user:purge", "billing:export"])
            .is_ok());
    }

    #[test]
    fn test_self_or_admin() {
        let member = principal(Role::Member);
        assert!(member.require_self_or_admin(member.user_id).is_ok());
        assert!(member.require_self_or_admin(Uuid::new_v4()).is_err());

        let admin = principal(Role::Admin);
        assert!(admin.require_self_or_admin(Uuid::new_v4()).is_ok());
    }
}
