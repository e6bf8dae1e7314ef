//! Audit recorder.
//!
//! Append-only trail of every state-changing action. The write is
//! awaited in-line by the triggering operation, not queued: an audit
//! failure surfaces as an operation failure instead of being dropped.

use std::sync::Arc;

use tracing::debug;

use crate::error::CoreResult;
use crate::models::audit::AuditRecord;
use crate::store::AuditRepository;

/// Serializes diffs and appends immutable rows through the persistence
/// collaborator.
#[derive(Clone)]
pub struct AuditRecorder {
    repo: Arc<dyn AuditRepository>,
}

impl AuditRecorder {
    pub fn new(repo: Arc<dyn AuditRepository>) -> Self {
        Self { repo }
    }

    /// Append one audit row stamped with the current time.
    pub async fn record(
        &self,
        actor_user_id: Option<&str>,
        entity_kind: &str,
        entity_id: &str,
        action: &str,
        diff: Option<serde_json::Value>,
    ) -> CoreResult<()> {
        let record = AuditRecord::new(actor_user_id, entity_kind, entity_id, action, diff);
        debug!(entity_kind, entity_id, action, "audit");
        self.repo.append(record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn record_appends_one_row() {
        let store = Arc::new(MemoryStore::new());
        let recorder = AuditRecorder::new(store.clone());

        recorder
            .record(
                Some("u1"),
                "user",
                "u2",
                "update",
                Some(serde_json::json!({"before": {"is_active": true}})),
            )
            .await
            .unwrap();

        let records = store.audit_records();
        assert_eq!(1, records.len());
        assert_eq!(Some("u1".to_string()), records[0].actor_user_id);
        assert_eq!("user", records[0].entity_kind);
        assert_eq!("update", records[0].action);
        assert!(records[0].diff.is_some());
    }

    #[tokio::test]
    async fn actor_may_be_absent() {
        let store = Arc::new(MemoryStore::new());
        let recorder = AuditRecorder::new(store.clone());

        recorder
            .record(None, "user", "u1", "register", None)
            .await
            .unwrap();

        assert_eq!(None, store.audit_records()[0].actor_user_id);
    }
}
