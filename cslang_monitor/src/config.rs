// RUNTIME PREFERENCES (Monitor sessions)

use cslang_compiler::config::runtime::env_vars;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorPreferences {
    /// Treat an event whose register operations cannot be evaluated as
    /// ignored instead of failing the session
    pub skip_on_lookup_error: bool,

    /// Log every transition taken at info level
    pub log_transitions: bool,
}

impl Default for MonitorPreferences {
    fn default() -> Self {
        Self {
            skip_on_lookup_error: env::var(env_vars::MONITOR_SKIP_ON_LOOKUP_ERROR)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_transitions: env::var(env_vars::MONITOR_LOG_TRANSITIONS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

impl MonitorPreferences {
    /// Keep going past events the automaton cannot evaluate
    pub fn lenient() -> Self {
        Self {
            skip_on_lookup_error: true,
            ..Self::default()
        }
    }
}
