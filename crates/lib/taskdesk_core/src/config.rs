//! Core configuration from the environment.

use chrono::Duration;
use tracing::warn;

/// Env var holding the idle timeout, in minutes.
const IDLE_TIMEOUT_VAR: &str = "TASKDESK_SESSION_IDLE_TIMEOUT_MINS";

/// Default idle timeout: 30 minutes.
const DEFAULT_IDLE_TIMEOUT_MINS: i64 = 30;

/// Runtime configuration for the session core.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// A session expires after this much inactivity (sliding window).
    pub session_idle_timeout: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            session_idle_timeout: Duration::minutes(DEFAULT_IDLE_TIMEOUT_MINS),
        }
    }
}

impl CoreConfig {
    /// Resolve configuration from the environment, falling back to
    /// defaults on missing or unusable values.
    pub fn from_env() -> Self {
        Self {
            session_idle_timeout: idle_timeout_from_env(),
        }
    }
}

fn idle_timeout_from_env() -> Duration {
    let Ok(raw) = std::env::var(IDLE_TIMEOUT_VAR) else {
        return Duration::minutes(DEFAULT_IDLE_TIMEOUT_MINS);
    };
    match raw.trim().parse::<i64>() {
        Ok(mins) if mins > 0 => Duration::minutes(mins),
        _ => {
            warn!(
                value = %raw,
                "ignoring non-positive or unparsable {IDLE_TIMEOUT_VAR}, using default"
            );
            Duration::minutes(DEFAULT_IDLE_TIMEOUT_MINS)
        }
    }
}
