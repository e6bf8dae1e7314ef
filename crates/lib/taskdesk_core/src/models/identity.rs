//! User and role models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// System-wide role. The name set is closed — anything else is rejected
/// at the validation boundary, never at authorization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemRole {
    Admin,
    Maintainer,
    Contributor,
    Viewer,
}

impl SystemRole {
    /// All recognized roles, for exhaustive validation messages.
    pub const ALL: [SystemRole; 4] = [
        SystemRole::Admin,
        SystemRole::Maintainer,
        SystemRole::Contributor,
        SystemRole::Viewer,
    ];

    /// Role granted to self-registered users.
    pub const DEFAULT: SystemRole = SystemRole::Viewer;

    pub fn as_str(&self) -> &'static str {
        match self {
            SystemRole::Admin => "admin",
            SystemRole::Maintainer => "maintainer",
            SystemRole::Contributor => "contributor",
            SystemRole::Viewer => "viewer",
        }
    }
}

impl fmt::Display for SystemRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(SystemRole::Admin),
            "maintainer" => Ok(SystemRole::Maintainer),
            "contributor" => Ok(SystemRole::Contributor),
            "viewer" => Ok(SystemRole::Viewer),
            other => Err(format!("Unknown system role '{other}'")),
        }
    }
}

/// Domain user. Only the identity service reads or writes
/// `password_hash`; everything that leaves the core is a [`UserView`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh user record with generated id and timestamps.
    pub fn new(username: &str, display_name: &str, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            display_name: display_name.to_string(),
            password_hash,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sanitized view for boundary returns. The password hash never
    /// crosses the command boundary.
    pub fn view(&self, roles: &[SystemRole]) -> UserView {
        UserView {
            id: self.id.clone(),
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            is_active: self.is_active,
            roles: roles.to_vec(),
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// User shape returned to callers — no password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub is_active: bool,
    pub roles: Vec<SystemRole>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Login credentials as received from the renderer.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Self-service registration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub display_name: String,
}

/// Admin user-creation payload. Role names are validated against the
/// closed [`SystemRole`] set before anything is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserInput {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub roles: Vec<String>,
}

/// Admin user-update payload. Absent fields are left untouched;
/// a present `roles` list fully replaces the user's role set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserInput {
    pub display_name: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub roles: Option<Vec<String>>,
}

/// Successful login/register result: bearer token plus sanitized user.
#[derive(Debug, Clone, Serialize)]
pub struct AuthOutput {
    pub token: String,
    pub user: UserView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in SystemRole::ALL {
            assert_eq!(Ok(role), role.as_str().parse());
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("superuser".parse::<SystemRole>().is_err());
        assert!("Admin".parse::<SystemRole>().is_err());
        assert!("".parse::<SystemRole>().is_err());
    }

    #[test]
    fn view_never_carries_the_hash() {
        let user = User::new("alice", "Alice", "$2b$10$hash".into());
        let view = user.view(&[SystemRole::Viewer]);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }
}
