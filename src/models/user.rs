//! Users, roles and sessions.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Role of a user. Gates comment moderation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Moderator,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "moderator" => Some(Role::Moderator),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    /// Whether this role may delete or edit other users' comments.
    pub fn can_moderate(&self) -> bool {
        matches!(self, Role::Admin | Role::Moderator)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub created_at: String,
}

/// The authenticated caller, as resolved from a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Identity {
    /// Whether this caller may remove or edit a comment written by `author_id`.
    pub fn can_manage_comment(&self, author_id: &str) -> bool {
        self.id == author_id || self.role.can_moderate()
    }
}

/// Request body for creating a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "O nome é obrigatório"))]
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

/// A freshly issued session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: &str, role: Role) -> Identity {
        Identity {
            id: id.to_string(),
            name: "Ana".to_string(),
            role,
        }
    }

    #[test]
    fn test_comment_management_rights() {
        assert!(identity("u1", Role::User).can_manage_comment("u1"));
        assert!(!identity("u2", Role::User).can_manage_comment("u1"));
        assert!(identity("u2", Role::Moderator).can_manage_comment("u1"));
        assert!(identity("u2", Role::Admin).can_manage_comment("u1"));
    }

    #[test]
    fn test_role_parse_round_trips_names() {
        for role in [Role::Admin, Role::Moderator, Role::User] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("root"), None);
    }
}
