//! Audit trail queries.

use async_trait::async_trait;
use sqlx::PgPool;

use taskdesk_core::error::CoreResult;
use taskdesk_core::models::audit::AuditRecord;
use taskdesk_core::store::AuditRepository;

use crate::db_err;

/// `AuditRepository` over PostgreSQL. Insert-only — there is no update
/// or delete path, by construction.
pub struct PgAuditRepository {
    pool: PgPool,
}

impl PgAuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PgAuditRepository {
    async fn append(&self, record: AuditRecord) -> CoreResult<()> {
        sqlx::query(
            "INSERT INTO audit_log \
             (id, actor_user_id, entity_kind, entity_id, action, diff, created_at) \
             VALUES ($1::uuid, $2::uuid, $3, $4, $5, $6, $7)",
        )
        .bind(&record.id)
        .bind(record.actor_user_id.as_deref())
        .bind(&record.entity_kind)
        .bind(&record.entity_id)
        .bind(&record.action)
        .bind(record.diff.as_ref())
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
