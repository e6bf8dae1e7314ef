//! Audit trail models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable audit row: who did what to which entity, and when.
/// Appended once, never updated or deleted by this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: String,
    /// `None` for actions with no authenticated actor (e.g. registration
    /// happens before a session exists for the new account).
    pub actor_user_id: Option<String>,
    pub entity_kind: String,
    pub entity_id: String,
    pub action: String,
    /// Optional structured payload — created fields, or a
    /// `{"before": …, "after": …}` snapshot pair for updates.
    pub diff: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Build a record stamped with the current time.
    pub fn new(
        actor_user_id: Option<&str>,
        entity_kind: &str,
        entity_id: &str,
        action: &str,
        diff: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            actor_user_id: actor_user_id.map(|a| a.to_string()),
            entity_kind: entity_kind.to_string(),
            entity_id: entity_id.to_string(),
            action: action.to_string(),
            diff,
            created_at: Utc::now(),
        }
    }
}
