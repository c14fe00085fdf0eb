//! Orchestrator limits.

use std::env;

/// Default number of stored messages sent as completion context.
pub const DEFAULT_HISTORY_LIMIT: i64 = 100;

/// Default number of stored messages returned for transcript display.
pub const DEFAULT_DISPLAY_LIMIT: i64 = 50;

/// Row limits applied by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Most recent messages passed to the completion service.
    pub history_limit: i64,
    /// Most recent messages returned by the transcript.
    pub display_limit: i64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            display_limit: DEFAULT_DISPLAY_LIMIT,
        }
    }
}

impl OrchestratorConfig {
    /// Load limits from the environment.
    ///
    /// - `COACH_HISTORY_LIMIT` - context rows (default: 100)
    /// - `COACH_DISPLAY_LIMIT` - transcript rows (default: 50)
    ///
    /// Missing, unparseable or non-positive values fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            history_limit: positive_var("COACH_HISTORY_LIMIT").unwrap_or(DEFAULT_HISTORY_LIMIT),
            display_limit: positive_var("COACH_DISPLAY_LIMIT").unwrap_or(DEFAULT_DISPLAY_LIMIT),
        }
    }
}

fn positive_var(name: &str) -> Option<i64> {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
}
