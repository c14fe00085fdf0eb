//! Conversation orchestrator for the accountability coach.
//!
//! This crate provides the [`Orchestrator`] type which runs a chat turn
//! between the persistence layer and the completion service.
//!
//! # Architecture
//!
//! ```text
//! Chat request (from the HTTP API)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Store the user message                                  │
//! │         ↓                                                   │
//! │  2. Load the profile (optional) and recent history          │
//! │         ↓                                                   │
//! │  3. Build the personalized system prompt                    │
//! │         ↓                                                   │
//! │  4. Request a completion (fallback reply if unusable)       │
//! │         ↓                                                   │
//! │  5. Store and return the assistant reply                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use coach_brain::OpenRouterBrain;
//! use orchestrator::{Orchestrator, OrchestratorConfig};
//!
//! let brain = Arc::new(OpenRouterBrain::from_env()?);
//! let orchestrator = Orchestrator::new(database, brain, OrchestratorConfig::from_env());
//!
//! let turn = orchestrator.chat("user-123", "Preciso estudar hoje").await?;
//! println!("{}", turn.reply);
//! ```

pub mod config;
pub mod error;
pub mod indicator;
mod orchestrator;
pub mod profile;
pub mod prompt;

pub use config::OrchestratorConfig;
pub use error::OrchestratorError;
pub use indicator::{Activity, AssistantIndicator};
pub use orchestrator::{ChatTurn, Orchestrator, Transcript, INVALID_MESSAGE, MISSING_CHAT_FIELDS};
pub use profile::{Preferences, PreferencesUpdate, ProfileStore};

// Re-export for convenience
pub use coach_brain::{ChatMessage, CompletionGateway};
pub use coach_database::{Database, FocusArea, Message, ProfileFields, Role, UserProfile};
