//! In-memory persistence backend.
//!
//! Backs the integration tests and the desktop dev profile, where no
//! database sidecar is running. Not durable across restarts.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{AuditRepository, MembershipRepository, UserRepository};
use crate::error::{CoreError, CoreResult};
use crate::models::audit::AuditRecord;
use crate::models::identity::{SystemRole, User};
use crate::models::project::ProjectMembership;

/// Mutex-guarded maps implementing every repository trait.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<String, User>>,
    roles: Mutex<HashMap<String, Vec<SystemRole>>>,
    audit: Mutex<Vec<AuditRecord>>,
    memberships: Mutex<Vec<ProjectMembership>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user directly, bypassing the identity service. Test setup
    /// helper (e.g. for the pre-provisioned admin account).
    pub fn seed_user(&self, user: User, roles: Vec<SystemRole>) {
        self.roles.lock().unwrap().insert(user.id.clone(), roles);
        self.users.lock().unwrap().insert(user.id.clone(), user);
    }

    /// Seed a project membership row.
    pub fn seed_membership(&self, membership: ProjectMembership) {
        self.memberships.lock().unwrap().push(membership);
    }

    /// Snapshot of the audit trail, oldest first.
    pub fn audit_records(&self) -> Vec<AuditRecord> {
        self.audit.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> CoreResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self) -> CoreResult<Vec<User>> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn username_exists(&self, username: &str) -> CoreResult<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.username == username))
    }

    async fn insert(&self, user: &User, roles: &[SystemRole]) -> CoreResult<()> {
        // Uniqueness is enforced here, under the lock, not only by the
        // caller's existence check — two callers can race past that
        // check between awaits.
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.username == user.username) {
            return Err(CoreError::Conflict(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }
        users.insert(user.id.clone(), user.clone());
        self.roles
            .lock()
            .unwrap()
            .insert(user.id.clone(), roles.to_vec());
        Ok(())
    }

    async fn update(&self, user: &User) -> CoreResult<()> {
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&user.id) {
            return Err(CoreError::NotFound(format!("User {} not found", user.id)));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn roles_for(&self, user_id: &str) -> CoreResult<Vec<SystemRole>> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_roles(&self, user_id: &str, roles: &[SystemRole]) -> CoreResult<()> {
        self.roles
            .lock()
            .unwrap()
            .insert(user_id.to_string(), roles.to_vec());
        Ok(())
    }

    async fn record_login(&self, user_id: &str, at: DateTime<Utc>) -> CoreResult<()> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(user_id) {
            Some(user) => {
                user.last_login_at = Some(at);
                Ok(())
            }
            None => Err(CoreError::NotFound(format!("User {user_id} not found"))),
        }
    }
}

#[async_trait]
impl AuditRepository for MemoryStore {
    async fn append(&self, record: AuditRecord) -> CoreResult<()> {
        self.audit.lock().unwrap().push(record);
        Ok(())
    }
}

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn list_for_project(&self, project_id: &str) -> CoreResult<Vec<ProjectMembership>> {
        Ok(self
            .memberships
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> CoreResult<Option<ProjectMembership>> {
        Ok(self
            .memberships
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.project_id == project_id && m.user_id == user_id)
            .cloned())
    }
}
