//! User and role queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use taskdesk_core::error::{CoreError, CoreResult};
use taskdesk_core::models::identity::{SystemRole, User};
use taskdesk_core::store::UserRepository;

use crate::db_err;

/// Row shape shared by every user select.
type UserRow = (
    String,
    String,
    String,
    String,
    bool,
    Option<DateTime<Utc>>,
    DateTime<Utc>,
    DateTime<Utc>,
);

const USER_COLUMNS: &str =
    "id::text, username, display_name, password_hash, is_active, last_login_at, created_at, updated_at";

fn row_to_user(row: UserRow) -> User {
    let (id, username, display_name, password_hash, is_active, last_login_at, created_at, updated_at) =
        row;
    User {
        id,
        username,
        display_name,
        password_hash,
        is_active,
        last_login_at,
        created_at,
        updated_at,
    }
}

/// `UserRepository` over PostgreSQL.
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1::uuid");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.map(row_to_user))
    }

    async fn find_by_username(&self, username: &str) -> CoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.map(row_to_user))
    }

    async fn list(&self) -> CoreResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(row_to_user).collect())
    }

    async fn username_exists(&self, username: &str) -> CoreResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn insert(&self, user: &User, roles: &[SystemRole]) -> CoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            "INSERT INTO users \
             (id, username, display_name, password_hash, is_active, last_login_at, created_at, updated_at) \
             VALUES ($1::uuid, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        for role in roles {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1::uuid, $2)")
                .bind(&user.id)
                .bind(role.as_str())
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)
    }

    async fn update(&self, user: &User) -> CoreResult<()> {
        let result = sqlx::query(
            "UPDATE users SET display_name = $2, password_hash = $3, is_active = $4, \
             updated_at = $5 WHERE id = $1::uuid",
        )
        .bind(&user.id)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("User {} not found", user.id)));
        }
        Ok(())
    }

    async fn roles_for(&self, user_id: &str) -> CoreResult<Vec<SystemRole>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT role FROM user_roles WHERE user_id = $1::uuid ORDER BY role",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        // A role name outside the closed set can only get here through a
        // bug or manual tampering; surface it as internal.
        names
            .iter()
            .map(|n| {
                n.parse::<SystemRole>()
                    .map_err(|e| CoreError::Internal(format!("user_roles: {e}")))
            })
            .collect()
    }

    async fn replace_roles(&self, user_id: &str, roles: &[SystemRole]) -> CoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1::uuid")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        for role in roles {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1::uuid, $2)")
                .bind(user_id)
                .bind(role.as_str())
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)
    }

    async fn record_login(&self, user_id: &str, at: DateTime<Utc>) -> CoreResult<()> {
        sqlx::query("UPDATE users SET last_login_at = $2 WHERE id = $1::uuid")
            .bind(user_id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
