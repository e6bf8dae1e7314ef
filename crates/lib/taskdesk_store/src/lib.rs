//! # taskdesk_store
//!
//! SQL-backed implementations of the `taskdesk_core` repository traits
//! over a PostgreSQL pool. The core never sees `sqlx` — every error is
//! mapped to the core taxonomy at this boundary.

pub mod audit;
pub mod memberships;
pub mod migrate;
pub mod users;

use taskdesk_core::error::CoreError;

pub use audit::PgAuditRepository;
pub use memberships::PgMembershipRepository;
pub use users::PgUserRepository;

/// Postgres error code for unique-constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Map a database error into the core taxonomy. Missing rows become
/// not-found; a unique-constraint violation becomes a conflict (two
/// callers can race past an existence check and the constraint is the
/// backstop); everything else is internal with the cause preserved for
/// logging.
pub(crate) fn db_err(e: sqlx::Error) -> CoreError {
    match e {
        sqlx::Error::RowNotFound => CoreError::NotFound("row not found".into()),
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            CoreError::Conflict(db.message().to_string())
        }
        other => CoreError::Internal(format!("database: {other}")),
    }
}
