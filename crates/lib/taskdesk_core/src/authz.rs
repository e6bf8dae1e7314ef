//! Authorization resolver.
//!
//! Pure functions deciding whether an actor may perform an operation,
//! at two independent levels: system-wide roles gate whole operation
//! classes, per-project membership roles gate project-scoped work.
//!
//! Nothing here performs I/O — callers fetch the membership data and
//! hand it in, which keeps every check unit-testable from fixtures.

use crate::error::{CoreError, CoreResult};
use crate::models::identity::SystemRole;
use crate::models::project::{MembershipRole, ProjectMembership};

/// Authorization subject: a resolved session reduced to the data the
/// checks need.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: String,
    pub roles: Vec<SystemRole>,
}

impl Actor {
    pub fn new(user_id: &str, roles: Vec<SystemRole>) -> Self {
        Self {
            user_id: user_id.to_string(),
            roles,
        }
    }

    /// Whether the actor holds the system `admin` role.
    pub fn is_system_admin(&self) -> bool {
        self.roles.contains(&SystemRole::Admin)
    }
}

/// Fail unless the actor holds at least one of `allowed`.
pub fn require_system_role(actor: &Actor, allowed: &[SystemRole]) -> CoreResult<()> {
    if actor.roles.iter().any(|r| allowed.contains(r)) {
        Ok(())
    } else {
        Err(CoreError::Permission(format!(
            "Requires one of the roles: {}",
            allowed
                .iter()
                .map(SystemRole::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

/// Effective project role for an actor: system admins are project
/// admins everywhere, regardless of membership; everyone else gets
/// their membership role, or no access without one.
pub fn resolve_effective_role(
    actor: &Actor,
    membership: Option<MembershipRole>,
) -> Option<MembershipRole> {
    if actor.is_system_admin() {
        return Some(MembershipRole::Admin);
    }
    membership
}

/// Fail unless the actor's effective role is at least `required` on the
/// `view < edit < admin` order.
pub fn assert_project_role(
    actor: &Actor,
    membership: Option<MembershipRole>,
    required: MembershipRole,
) -> CoreResult<()> {
    match resolve_effective_role(actor, membership) {
        Some(effective) if effective >= required => Ok(()),
        _ => Err(CoreError::Permission(format!(
            "Requires project role '{required}' or higher"
        ))),
    }
}

/// Guard for removing a member or downgrading a membership away from
/// `admin`: at least one *other* admin membership must remain.
///
/// Called by the owning project operation before it mutates anything;
/// a failure here means no mutation happened.
pub fn ensure_admin_remains(
    memberships: &[ProjectMembership],
    departing_user: &str,
) -> CoreResult<()> {
    let another_admin = memberships
        .iter()
        .any(|m| m.user_id != departing_user && m.role == MembershipRole::Admin);
    if another_admin {
        Ok(())
    } else {
        Err(CoreError::Permission(
            "A project must retain at least one admin member".into(),
        ))
    }
}

/// The project's original creator can never be removed, independent of
/// role.
pub fn ensure_not_creator(creator_id: &str, target_user: &str) -> CoreResult<()> {
    if creator_id == target_user {
        Err(CoreError::Permission(
            "The project creator cannot be removed".into(),
        ))
    } else {
        Ok(())
    }
}
