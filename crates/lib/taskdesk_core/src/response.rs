//! Command-boundary result shape.
//!
//! The IPC layer calls the core and forwards a tagged success/failure
//! object to the renderer: `{ ok: true, data }` or
//! `{ ok: false, code, message }`. Normalization happens here, so no
//! operation ever leaks an unstructured error across the boundary.

use serde::Serialize;
use tracing::{error, warn};

use crate::error::{CoreError, CoreResult};

/// Tagged result returned to IPC callers.
///
/// Fields are private and only the constructors below exist, so `ok`
/// always agrees with which of `data` / `code`+`message` is present —
/// an inconsistent response is not representable.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse<T> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T: Serialize> CommandResponse<T> {
    /// Normalize a core result, logging failures with the policy from
    /// the error taxonomy: internal errors at error severity, expected
    /// user-facing kinds at warn.
    pub fn from_result(operation: &str, result: CoreResult<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(operation, e),
        }
    }

    fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            code: None,
            message: None,
        }
    }

    fn failure(operation: &str, e: CoreError) -> Self {
        if e.is_internal() {
            error!(operation, cause = %e, "operation failed");
        } else {
            warn!(operation, cause = %e, "operation rejected");
        }
        Self {
            ok: false,
            data: None,
            code: Some(e.code().to_string()),
            message: Some(e.to_string()),
        }
    }

    /// Whether this response reports success.
    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_shape() {
        let resp = CommandResponse::from_result("login", Ok(serde_json::json!({"id": "u1"})));
        assert!(resp.is_ok());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["data"]["id"], "u1");
        assert!(json.get("code").is_none());
        assert!(json.get("message").is_none());
    }

    #[test]
    fn failure_shape_carries_code_and_message() {
        let result: CoreResult<()> = Err(CoreError::Permission("Not authenticated".into()));
        let resp = CommandResponse::from_result("list_users", result);
        assert!(!resp.is_ok());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["code"], "ERR_PERMISSION");
        assert_eq!(json["message"], "Not authenticated");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn internal_errors_keep_the_cause_in_the_message() {
        let result: CoreResult<()> = Err(CoreError::Internal("bcrypt hash: boom".into()));
        let resp = CommandResponse::from_result("register", result);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], "ERR_INTERNAL");
        assert_eq!(json["message"], "Internal error: bcrypt hash: boom");
    }
}
