//! Identity service — authentication, registration, and administrative
//! user management.
//!
//! The only component allowed to read or write password hashes. Every
//! operation follows the same ordering contract: validate → authorize →
//! mutate → audit → return, so an audit row never describes an action
//! that did not commit and a caller never observes success before the
//! trail reflects it.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::audit::AuditRecorder;
use crate::authz::{self, Actor};
use crate::error::{CoreError, CoreResult};
use crate::models::identity::{
    AuthOutput, CreateUserInput, LoginInput, RegisterInput, SystemRole, UpdateUserInput, UserView,
};
use crate::password;
use crate::session::SessionStore;
use crate::store::UserRepository;
use crate::validation;

/// Single message for every credential failure. Unknown-username and
/// wrong-password are intentionally indistinguishable to the caller.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Authentication and user management over an injected persistence
/// collaborator.
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<SessionStore>,
    audit: AuditRecorder,
}

impl IdentityService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<SessionStore>,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            users,
            sessions,
            audit,
        }
    }

    /// Authenticate with username + password and issue a bearer token.
    ///
    /// The session snapshots the user's current system roles; a later
    /// role change takes effect at next login.
    pub async fn login(&self, input: LoginInput) -> CoreResult<AuthOutput> {
        validation::validate_login(&input).map_err(validation_error)?;

        let user = match self.users.find_by_username(&input.username).await? {
            Some(u) if u.is_active => u,
            // Same error for unknown, inactive, and (below) wrong
            // password — no username enumeration.
            _ => return Err(CoreError::Validation(INVALID_CREDENTIALS.into())),
        };

        if !password::verify_password(&input.password, &user.password_hash)? {
            self.audit
                .record(Some(&user.id), "user", &user.id, "login_failed", None)
                .await?;
            return Err(CoreError::Validation(INVALID_CREDENTIALS.into()));
        }

        let roles = self.users.roles_for(&user.id).await?;
        let session = self.sessions.create_session(&user.id, roles.clone());

        let now = Utc::now();
        self.users.record_login(&user.id, now).await?;
        self.audit
            .record(Some(&user.id), "user", &user.id, "login", None)
            .await?;

        info!(username = %user.username, "login");
        let mut user = user;
        user.last_login_at = Some(now);
        Ok(AuthOutput {
            token: session.token,
            user: user.view(&roles),
        })
    }

    /// End the session behind `token`. A missing or expired token is a
    /// no-op, not an error.
    pub async fn logout(&self, token: &str) -> CoreResult<()> {
        let Some(session) = self.sessions.get_session(token) else {
            return Ok(());
        };
        self.sessions.end_session(token);
        self.audit
            .record(
                Some(&session.user_id),
                "user",
                &session.user_id,
                "logout",
                None,
            )
            .await?;
        Ok(())
    }

    /// Renew the session (sliding expiry) and return the sanitized
    /// current user, or `None` if the token does not resolve.
    pub async fn current_session(&self, token: &str) -> CoreResult<Option<UserView>> {
        let Some(session) = self.sessions.touch_session(token) else {
            return Ok(None);
        };
        let user = self
            .users
            .find_by_id(&session.user_id)
            .await?
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "Live session refers to missing user {}",
                    session.user_id
                ))
            })?;
        let roles = self.users.roles_for(&user.id).await?;
        Ok(Some(user.view(&roles)))
    }

    /// Turn a bearer token into an authorization subject. The primitive
    /// every other service calls before touching anything.
    pub async fn resolve_actor(&self, token: &str) -> CoreResult<Actor> {
        match self.sessions.touch_session(token) {
            Some(session) => Ok(Actor::new(&session.user_id, session.roles)),
            None => Err(CoreError::Permission("Not authenticated".into())),
        }
    }

    /// Self-service signup. The new account gets the least-privileged
    /// system role and an immediate session.
    pub async fn register(&self, input: RegisterInput) -> CoreResult<AuthOutput> {
        validation::validate_register(&input).map_err(validation_error)?;

        if self.users.username_exists(&input.username).await? {
            return Err(CoreError::Conflict(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }

        let hash = password::hash_password(&input.password)?;
        let user = crate::models::identity::User::new(&input.username, &input.display_name, hash);
        let roles = vec![SystemRole::DEFAULT];

        self.users.insert(&user, &roles).await?;
        self.audit
            .record(
                None,
                "user",
                &user.id,
                "register",
                Some(serde_json::json!({
                    "username": user.username,
                    "display_name": user.display_name,
                    "roles": roles,
                })),
            )
            .await?;

        let session = self.sessions.create_session(&user.id, roles.clone());
        info!(username = %user.username, "registered");
        Ok(AuthOutput {
            token: session.token,
            user: user.view(&roles),
        })
    }

    /// List all users, sanitized. Requires the system `admin` role.
    pub async fn list_users(&self, token: &str) -> CoreResult<Vec<UserView>> {
        let actor = self.resolve_actor(token).await?;
        authz::require_system_role(&actor, &[SystemRole::Admin])?;

        let users = self.users.list().await?;
        let mut views = Vec::with_capacity(users.len());
        for user in users {
            let roles = self.users.roles_for(&user.id).await?;
            views.push(user.view(&roles));
        }
        Ok(views)
    }

    /// Create a user with an explicit role set. Requires the system
    /// `admin` role.
    pub async fn create_user(&self, token: &str, input: CreateUserInput) -> CoreResult<UserView> {
        let actor = self.resolve_actor(token).await?;
        authz::require_system_role(&actor, &[SystemRole::Admin])?;

        let roles = validation::validate_create_user(&input).map_err(validation_error)?;

        if self.users.username_exists(&input.username).await? {
            return Err(CoreError::Conflict(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }

        let hash = password::hash_password(&input.password)?;
        let user = crate::models::identity::User::new(&input.username, &input.display_name, hash);

        self.users.insert(&user, &roles).await?;
        self.audit
            .record(
                Some(&actor.user_id),
                "user",
                &user.id,
                "create",
                Some(serde_json::json!({
                    "username": user.username,
                    "display_name": user.display_name,
                    "roles": roles,
                    "is_active": user.is_active,
                })),
            )
            .await?;

        info!(username = %user.username, by = %actor.user_id, "user created");
        Ok(user.view(&roles))
    }

    /// Update a user. Requires the system `admin` role.
    ///
    /// A supplied password replaces the hash and ends every session the
    /// user holds; a supplied role list replaces the role set wholesale.
    pub async fn update_user(
        &self,
        token: &str,
        user_id: &str,
        input: UpdateUserInput,
    ) -> CoreResult<UserView> {
        let actor = self.resolve_actor(token).await?;
        authz::require_system_role(&actor, &[SystemRole::Admin])?;

        let new_roles = validation::validate_update_user(&input).map_err(validation_error)?;

        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("User {user_id} not found")))?;

        let old_roles = self.users.roles_for(user_id).await?;
        let before = user.view(&old_roles);

        if let Some(display_name) = &input.display_name {
            user.display_name = display_name.clone();
        }
        if let Some(is_active) = input.is_active {
            user.is_active = is_active;
        }
        let password_changed = match &input.password {
            Some(new_password) => {
                user.password_hash = password::hash_password(new_password)?;
                true
            }
            None => false,
        };
        user.updated_at = Utc::now();

        self.users.update(&user).await?;
        if let Some(roles) = &new_roles {
            self.users.replace_roles(user_id, roles).await?;
        }
        if password_changed {
            // Force re-authentication everywhere with the new password.
            self.sessions.end_sessions_for_user(user_id);
        }

        let roles = new_roles.unwrap_or(old_roles);
        let after = user.view(&roles);
        self.audit
            .record(
                Some(&actor.user_id),
                "user",
                user_id,
                "update",
                Some(serde_json::json!({
                    "before": before,
                    "after": after,
                    "password_changed": password_changed,
                })),
            )
            .await?;

        info!(username = %user.username, by = %actor.user_id, "user updated");
        Ok(after)
    }
}

/// Collapse accumulated violations into one validation error.
fn validation_error(violations: Vec<String>) -> CoreError {
    CoreError::Validation(violations.join("; "))
}
