//! # taskdesk_core
//!
//! Session and authorization core for the Taskdesk desktop app.
//!
//! The IPC command layer hands every authenticated call a bearer token;
//! this crate resolves it to an actor, decides whether the operation is
//! permitted, and records the outcome in the audit trail. Persistence is
//! reached exclusively through the repository traits in [`store`], so the
//! core carries no database dependency of its own.

pub mod audit;
pub mod authz;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod password;
pub mod response;
pub mod session;
pub mod store;
pub mod validation;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
