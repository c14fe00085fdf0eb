//! Assistant status indicator shown next to the chat transcript.
//!
//! Purely cosmetic: the state is derived from the latest activity and never
//! stored.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Inactivity after which the assistant is shown as switched off.
pub const IDLE_TIMEOUT_SECS: i64 = 30;

/// Visible assistant state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantIndicator {
    Idle,
    Thinking,
    Error,
    Off,
}

/// What the view knows about the conversation right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Activity {
    /// A reply is being generated.
    pub in_flight: bool,
    /// The last request failed.
    pub last_error: bool,
    /// Time of the last message or request, if any.
    pub last_interaction: Option<DateTime<Utc>>,
}

impl AssistantIndicator {
    /// Derive the indicator from activity.
    ///
    /// Precedence: thinking, error, off (never active or idle too long), idle.
    pub fn derive(activity: &Activity, now: DateTime<Utc>) -> Self {
        if activity.in_flight {
            return AssistantIndicator::Thinking;
        }
        if activity.last_error {
            return AssistantIndicator::Error;
        }
        match activity.last_interaction {
            Some(at) if now.signed_duration_since(at) <= Duration::seconds(IDLE_TIMEOUT_SECS) => {
                AssistantIndicator::Idle
            }
            _ => AssistantIndicator::Off,
        }
    }

    /// Indicator for a stored transcript, from its newest message timestamp.
    ///
    /// Unparseable timestamps count as no activity.
    pub fn for_transcript(last_created_at: Option<&str>, now: DateTime<Utc>) -> Self {
        let last_interaction = last_created_at
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc));

        Self::derive(
            &Activity {
                last_interaction,
                ..Default::default()
            },
            now,
        )
    }

    /// Wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssistantIndicator::Idle => "idle",
            AssistantIndicator::Thinking => "thinking",
            AssistantIndicator::Error => "error",
            AssistantIndicator::Off => "off",
        }
    }
}
