//! Persistence traits.
//!
//! The core reaches durable storage only through these traits, so the
//! auth layer carries no database dependency. `taskdesk_store` provides
//! the SQL-backed implementations; [`memory`] provides the in-memory
//! backend used by tests and the dev profile.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CoreResult;
use crate::models::audit::AuditRecord;
use crate::models::identity::{SystemRole, User};
use crate::models::project::ProjectMembership;

/// User and role persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<User>>;

    /// Case-sensitive exact username match.
    async fn find_by_username(&self, username: &str) -> CoreResult<Option<User>>;

    async fn list(&self) -> CoreResult<Vec<User>>;

    async fn username_exists(&self, username: &str) -> CoreResult<bool>;

    /// Insert a user together with its initial role set.
    async fn insert(&self, user: &User, roles: &[SystemRole]) -> CoreResult<()>;

    /// Persist updated user fields (matched by id).
    async fn update(&self, user: &User) -> CoreResult<()>;

    async fn roles_for(&self, user_id: &str) -> CoreResult<Vec<SystemRole>>;

    /// Replace the user's role-membership set wholesale.
    async fn replace_roles(&self, user_id: &str, roles: &[SystemRole]) -> CoreResult<()>;

    /// Stamp a successful login.
    async fn record_login(&self, user_id: &str, at: DateTime<Utc>) -> CoreResult<()>;
}

/// Append-only audit persistence.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn append(&self, record: AuditRecord) -> CoreResult<()>;
}

/// Read access to project memberships. The core never creates or
/// deletes memberships; project services do, after running the guards
/// in [`crate::authz`] over this data.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn list_for_project(&self, project_id: &str) -> CoreResult<Vec<ProjectMembership>>;

    /// The membership one user holds in one project, if any.
    async fn find(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> CoreResult<Option<ProjectMembership>>;
}
