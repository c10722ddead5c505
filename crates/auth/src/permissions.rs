//! Role and permission model
//!
//! Permissions are flat `resource:action` strings plus the wildcard `*`.
//! The role → permission-set mapping is a pure function fixed at compile
//! time; tokens carry the derived set, never the mapping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Wildcard permission granting everything
pub const WILDCARD: &str = "*";

/// Permissions every authenticated user holds regardless of role
const BASE_PERMISSIONS: &[&str] = &["profile:read", "profile:update"];

const MEMBER_PERMISSIONS: &[&str] = &[
    "project:read",
    "task:read",
    "task:create",
    "task:update",
    "comment:create",
    "team:read",
    "notification:read",
];

const MANAGER_PERMISSIONS: &[&str] = &[
    "project:create",
    "project:update",
    "project:delete",
    "task:delete",
    "task:assign",
    "team:create",
    "team:update",
    "team:manage",
];

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Manager,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Member => "MEMBER",
        }
    }

    /// Permission set derived from this role
    pub fn permissions(&self) -> BTreeSet<String> {
        permissions_for_role(self.as_str())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "MANAGER" => Ok(Role::Manager),
            "MEMBER" => Ok(Role::Member),
            _ => Err(()),
        }
    }
}

/// Derive the permission set for a role string.
///
/// Total over any input: unknown roles receive the base set only.
/// Managers hold a superset of members; admins hold the wildcard.
pub fn permissions_for_role(role: &str) -> BTreeSet<String> {
    let mut permissions: BTreeSet<String> =
        BASE_PERMISSIONS.iter().map(|p| p.to_string()).collect();

    match role {
        "ADMIN" => {
            permissions.insert(WILDCARD.to_string());
        }
        "MANAGER" => {
            permissions.extend(MEMBER_PERMISSIONS.iter().map(|p| p.to_string()));
            permissions.extend(MANAGER_PERMISSIONS.iter().map(|p| p.to_string()));
        }
        "MEMBER" => {
            permissions.extend(MEMBER_PERMISSIONS.iter().map(|p| p.to_string()));
        }
        _ => {}
    }

    permissions
}

/// Check whether a permission set grants `required`, directly or via wildcard
pub fn has_permission(permissions: &BTreeSet<String>, required: &str) -> bool {
    permissions.contains(required) || permissions.contains(WILDCARD)
}
