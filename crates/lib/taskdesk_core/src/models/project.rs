//! Project membership models.
//!
//! Memberships are owned by the project service; this core only reads
//! them to compute effective permissions and to enforce the membership
//! invariants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Per-project membership role. Totally ordered: `View < Edit < Admin`.
/// The derived `Ord` follows variant declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    View,
    Edit,
    Admin,
}

impl MembershipRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::View => "view",
            MembershipRole::Edit => "edit",
            MembershipRole::Admin => "admin",
        }
    }
}

impl fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(MembershipRole::View),
            "edit" => Ok(MembershipRole::Edit),
            "admin" => Ok(MembershipRole::Admin),
            other => Err(format!("Unknown membership role '{other}'")),
        }
    }
}

/// One user's membership in one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMembership {
    pub project_id: String,
    pub user_id: String,
    pub role: MembershipRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_roles_are_totally_ordered() {
        assert!(MembershipRole::View < MembershipRole::Edit);
        assert!(MembershipRole::Edit < MembershipRole::Admin);
        assert!(MembershipRole::View < MembershipRole::Admin);
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [
            MembershipRole::View,
            MembershipRole::Edit,
            MembershipRole::Admin,
        ] {
            assert_eq!(Ok(role), role.as_str().parse());
        }
        assert!("owner".parse::<MembershipRole>().is_err());
    }
}
