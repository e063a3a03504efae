use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Application roles and the authorities they grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Hr,
    Manager,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Returns the authority strings associated with this role
    pub fn authorities(&self) -> &'static [&'static str] {
        match self {
            Role::User => &["user:read"],
            Role::Hr => &["user:read", "user:update"],
            Role::Manager => &["user:read", "user:update"],
            Role::Admin => &["user:read", "user:create", "user:update"],
            Role::SuperAdmin => &["user:read", "user:create", "user:update", "user:delete"],
        }
    }

    /// Role name as it appears among a token's authorities
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Hr => "ROLE_HR",
            Role::Manager => "ROLE_MANAGER",
            Role::Admin => "ROLE_ADMIN",
            Role::SuperAdmin => "ROLE_SUPER_ADMIN",
        }
    }

    /// Check if this role grants a specific authority
    pub fn grants(&self, authority: &str) -> bool {
        self.authorities().contains(&authority)
    }
}

/// Identity presented for token issuance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Username, written to the `sub` claim
    pub username: String,
    /// Authority strings; unique and kept in sorted order
    pub authorities: BTreeSet<String>,
}

impl Principal {
    /// Creates a principal from a username and any collection of authorities
    pub fn new<I, S>(username: impl Into<String>, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.into(),
            authorities: authorities.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a principal holding a role name and every authority it grants
    pub fn from_role(username: impl Into<String>, role: Role) -> Self {
        let mut principal = Self::new(username, role.authorities().iter().copied());
        principal.authorities.insert(role.as_str().to_string());
        principal
    }

    /// Adds one more authority
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authorities.insert(authority.into());
        self
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }
}
