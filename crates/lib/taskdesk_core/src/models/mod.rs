//! Domain models.
//!
//! These are internal domain models, distinct from the renderer-facing
//! DTO shapes the IPC layer generates (camelCase renames live there).

pub mod audit;
pub mod identity;
pub mod project;
