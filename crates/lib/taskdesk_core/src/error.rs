//! Core error taxonomy.
//!
//! Every public operation in this crate fails with one of the five kinds
//! below. The command layer serializes the kind as a stable `ERR_*` code,
//! so callers never see a raw internal error.

use thiserror::Error;

/// Convenience alias for core operation results.
pub type CoreResult<T> = Result<T, CoreError>;

/// Core errors with stable wire codes.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed input, or a credential mismatch during login.
    /// Unknown-username and wrong-password both collapse into this kind
    /// so callers cannot enumerate usernames.
    #[error("{0}")]
    Validation(String),

    /// Missing/expired session, insufficient role, or a guarded
    /// invariant (last project admin, project creator removal).
    #[error("{0}")]
    Permission(String),

    /// The targeted record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate username on register/create.
    #[error("{0}")]
    Conflict(String),

    /// Persistence or hashing failure, or a broken internal invariant.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable error code exposed at the command boundary.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "ERR_VALIDATION",
            CoreError::Permission(_) => "ERR_PERMISSION",
            CoreError::NotFound(_) => "ERR_NOT_FOUND",
            CoreError::Conflict(_) => "ERR_CONFLICT",
            CoreError::Internal(_) => "ERR_INTERNAL",
        }
    }

    /// Whether this kind represents a bug rather than an expected
    /// user-facing condition. Drives log severity at the boundary.
    pub fn is_internal(&self) -> bool {
        matches!(self, CoreError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!("ERR_VALIDATION", CoreError::Validation("x".into()).code());
        assert_eq!("ERR_PERMISSION", CoreError::Permission("x".into()).code());
        assert_eq!("ERR_NOT_FOUND", CoreError::NotFound("x".into()).code());
        assert_eq!("ERR_CONFLICT", CoreError::Conflict("x".into()).code());
        assert_eq!("ERR_INTERNAL", CoreError::Internal("x".into()).code());
    }

    #[test]
    fn only_internal_is_internal() {
        assert!(CoreError::Internal("x".into()).is_internal());
        assert!(!CoreError::Permission("x".into()).is_internal());
    }
}
