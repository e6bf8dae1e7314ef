//! Project membership queries (read-only for this crate's consumers).

use async_trait::async_trait;
use sqlx::PgPool;

use taskdesk_core::error::{CoreError, CoreResult};
use taskdesk_core::models::project::{MembershipRole, ProjectMembership};
use taskdesk_core::store::MembershipRepository;

use crate::db_err;

/// `MembershipRepository` over PostgreSQL.
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_role(name: &str) -> CoreResult<MembershipRole> {
    name.parse::<MembershipRole>()
        .map_err(|e| CoreError::Internal(format!("project_members: {e}")))
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    async fn list_for_project(&self, project_id: &str) -> CoreResult<Vec<ProjectMembership>> {
        let rows = sqlx::query_as::<_, (String, String, String)>(
            "SELECT project_id::text, user_id::text, role \
             FROM project_members WHERE project_id = $1::uuid",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter()
            .map(|(project_id, user_id, role)| {
                Ok(ProjectMembership {
                    project_id,
                    user_id,
                    role: parse_role(&role)?,
                })
            })
            .collect()
    }

    async fn find(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> CoreResult<Option<ProjectMembership>> {
        let row = sqlx::query_as::<_, (String, String, String)>(
            "SELECT project_id::text, user_id::text, role \
             FROM project_members WHERE project_id = $1::uuid AND user_id = $2::uuid",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(|(project_id, user_id, role)| {
            Ok(ProjectMembership {
                project_id,
                user_id,
                role: parse_role(&role)?,
            })
        })
        .transpose()
    }
}
