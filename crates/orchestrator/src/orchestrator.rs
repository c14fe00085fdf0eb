//! Conversation orchestrator: one chat turn from request to stored reply.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use coach_brain::{ChatMessage, CompletionGateway};
use coach_database::{message, Database, Message, Role};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::OrchestratorConfig;
use crate::error::OrchestratorError;
use crate::indicator::AssistantIndicator;
use crate::profile::ProfileStore;
use crate::prompt::{build_messages, FALLBACK_REPLY, QUICK_SYSTEM_PROMPT};

/// Error text for a chat request without message or user.
pub const MISSING_CHAT_FIELDS: &str = "Mensagem ou usuário faltando";

/// Error text for a quick reply without message.
pub const INVALID_MESSAGE: &str = "Invalid message";

/// Result of a chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    /// Reply returned to the user and stored as the assistant message.
    pub reply: String,
    /// Whether the reply is the canned fallback.
    pub fallback: bool,
}

/// Stored conversation as shown by the chat view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub messages: Vec<Message>,
    pub indicator: AssistantIndicator,
}

/// Coordinates storage and the completion service for chat turns.
///
/// Holds no per-user state; every call reads what it needs from the
/// database.
pub struct Orchestrator {
    database: Database,
    brain: Arc<dyn CompletionGateway>,
    profiles: ProfileStore,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new(
        database: Database,
        brain: Arc<dyn CompletionGateway>,
        config: OrchestratorConfig,
    ) -> Self {
        info!(
            "Orchestrator using {} (history limit: {}, display limit: {})",
            brain.name(),
            config.history_limit,
            config.display_limit
        );

        Self {
            profiles: ProfileStore::new(database.clone()),
            database,
            brain,
            config,
        }
    }

    /// Profile store sharing this orchestrator's database.
    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    /// Get the configured limits.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Run one chat turn.
    ///
    /// The user message is stored before the completion call and is not
    /// rolled back if a later step fails. Unusable completion answers are
    /// replaced by [`FALLBACK_REPLY`], which is stored like any other reply.
    pub async fn chat(&self, user_id: &str, text: &str) -> Result<ChatTurn, OrchestratorError> {
        let user_id = user_id.trim();
        if user_id.is_empty() || text.trim().is_empty() {
            return Err(OrchestratorError::InvalidInput(MISSING_CHAT_FIELDS.to_string()));
        }

        let pool = self.database.pool();

        message::insert_message(pool, user_id, Role::User, text).await?;

        // Personalization is optional
        let profile = self.profiles.find_profile(user_id).await;

        let history = message::recent_messages(pool, user_id, self.config.history_limit).await?;
        let messages = build_messages(profile.as_ref(), &history);

        debug!(
            user_id,
            history = history.len(),
            personalized = profile.is_some(),
            "Requesting completion"
        );

        let (reply, fallback) = match self.brain.complete(messages).await {
            Ok(reply) => (reply, false),
            Err(e) if e.is_unusable_reply() => {
                warn!("Completion failed for {}, using fallback reply: {}", user_id, e);
                (FALLBACK_REPLY.to_string(), true)
            }
            Err(e) => return Err(e.into()),
        };

        message::insert_message(pool, user_id, Role::Assistant, &reply).await?;

        Ok(ChatTurn { reply, fallback })
    }

    /// One-shot coach reply with no history and nothing stored.
    pub async fn quick_reply(&self, text: &str) -> Result<String, OrchestratorError> {
        if text.trim().is_empty() {
            return Err(OrchestratorError::InvalidInput(INVALID_MESSAGE.to_string()));
        }

        let messages = vec![
            ChatMessage::system(QUICK_SYSTEM_PROMPT),
            ChatMessage::user(text),
        ];

        Ok(self.brain.complete(messages).await?)
    }

    /// Most recent messages for display, with the derived indicator.
    pub async fn transcript(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Transcript, OrchestratorError> {
        let messages =
            message::recent_messages(self.database.pool(), user_id.trim(), self.config.display_limit)
                .await?;
        let indicator = AssistantIndicator::for_transcript(
            messages.last().map(|msg| msg.created_at.as_str()),
            now,
        );

        Ok(Transcript { messages, indicator })
    }

    /// Delete every stored message of one user.
    ///
    /// Returns the number of messages removed.
    pub async fn clear_history(&self, user_id: &str) -> Result<u64, OrchestratorError> {
        let deleted = message::delete_messages(self.database.pool(), user_id.trim()).await?;
        info!("Cleared {} messages for {}", deleted, user_id);
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_brain::mock::ScriptedBrain;
    use coach_brain::BrainError;
    use coach_database::ProfileFields;

    use crate::prompt::{build_system_prompt, BASE_SYSTEM_PROMPT};

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn setup(brain: ScriptedBrain, config: OrchestratorConfig) -> (Orchestrator, Arc<ScriptedBrain>) {
        let brain = Arc::new(brain);
        let orchestrator = Orchestrator::new(test_db().await, brain.clone(), config);
        (orchestrator, brain)
    }

    #[tokio::test]
    async fn test_first_turn_uses_default_prompt() {
        let (orchestrator, brain) =
            setup(ScriptedBrain::replying("Olá!"), OrchestratorConfig::default()).await;

        let turn = orchestrator.chat("user-1", "Oi").await.unwrap();
        assert_eq!(turn.reply, "Olá!");
        assert!(!turn.fallback);

        let request = brain.last_request().unwrap();
        assert_eq!(request.len(), 2);
        assert_eq!(request[0], ChatMessage::system(build_system_prompt(None)));
        assert!(request[0].content.starts_with(BASE_SYSTEM_PROMPT));
        assert_eq!(request[1], ChatMessage::user("Oi"));
    }

    #[tokio::test]
    async fn test_turn_persists_both_messages() {
        let (orchestrator, _) =
            setup(ScriptedBrain::replying("Bora treinar!"), OrchestratorConfig::default()).await;

        orchestrator.chat("user-1", "Quero treinar").await.unwrap();

        let transcript = orchestrator.transcript("user-1", Utc::now()).await.unwrap();
        let stored: Vec<(Role, &str)> = transcript
            .messages
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .collect();
        assert_eq!(
            stored,
            vec![(Role::User, "Quero treinar"), (Role::Assistant, "Bora treinar!")]
        );
        assert_eq!(transcript.indicator, AssistantIndicator::Idle);
    }

    #[tokio::test]
    async fn test_profile_personalizes_prompt() {
        let (orchestrator, brain) =
            setup(ScriptedBrain::replying("ok"), OrchestratorConfig::default()).await;

        let fields = ProfileFields {
            age: Some(19),
            is_student: Some(true),
            preferences: Some(vec!["leitura".to_string(), "natação".to_string()]),
            ..Default::default()
        };
        orchestrator.profiles().save_profile("user-1", fields).await.unwrap();

        orchestrator.chat("user-1", "Me ajuda?").await.unwrap();

        let system = &brain.last_request().unwrap()[0].content;
        assert!(system.contains("- Idade: 19\n"));
        assert!(system.contains("- Estuda: Sim\n"));
        assert!(system.contains("- Preferências: leitura, natação\n"));
        assert!(system.contains("- Peso: não informado\n"));
    }

    #[tokio::test]
    async fn test_history_is_chronological_and_capped() {
        let config = OrchestratorConfig {
            history_limit: 3,
            display_limit: 50,
        };
        let (orchestrator, brain) = setup(
            ScriptedBrain::replying("r2")
                .then(Ok("r1".to_string())),
            config,
        )
        .await;

        orchestrator.chat("user-1", "m1").await.unwrap();
        orchestrator.chat("user-1", "m2").await.unwrap();

        // Stored: m1, r1, m2 -> last three rows at the second call
        let request = brain.last_request().unwrap();
        let history: Vec<&str> = request[1..].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(history, vec!["m1", "r1", "m2"]);

        // Transcript is capped by the display limit instead
        let transcript = orchestrator.transcript("user-1", Utc::now()).await.unwrap();
        assert_eq!(transcript.messages.len(), 4);

        let config = OrchestratorConfig {
            history_limit: 2,
            display_limit: 50,
        };
        let (orchestrator, brain) = setup(ScriptedBrain::replying("r"), config).await;
        orchestrator.chat("user-2", "a").await.unwrap();
        orchestrator.chat("user-2", "b").await.unwrap();
        let request = brain.last_request().unwrap();
        let history: Vec<&str> = request[1..].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(history, vec!["r", "b"]);
    }

    #[tokio::test]
    async fn test_unusable_reply_falls_back_and_is_stored() {
        let (orchestrator, _) = setup(
            ScriptedBrain::failing(BrainError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
            OrchestratorConfig::default(),
        )
        .await;

        let turn = orchestrator.chat("user-1", "Oi").await.unwrap();
        assert_eq!(turn.reply, FALLBACK_REPLY);
        assert!(turn.fallback);

        let transcript = orchestrator.transcript("user-1", Utc::now()).await.unwrap();
        let last = transcript.messages.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_network_failure_keeps_user_message() {
        let (orchestrator, _) = setup(
            ScriptedBrain::failing(BrainError::Network("connection refused".to_string())),
            OrchestratorConfig::default(),
        )
        .await;

        let err = orchestrator.chat("user-1", "Oi").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Brain(BrainError::Network(_))));
        assert!(!err.is_client_error());

        // No compensation: the user turn stays
        let transcript = orchestrator.transcript("user-1", Utc::now()).await.unwrap();
        assert_eq!(transcript.messages.len(), 1);
        assert_eq!(transcript.messages[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_without_side_effects() {
        let (orchestrator, brain) =
            setup(ScriptedBrain::replying("ok"), OrchestratorConfig::default()).await;

        for (user, text) in [("", "Oi"), ("user-1", ""), ("user-1", "   ")] {
            let err = orchestrator.chat(user, text).await.unwrap_err();
            assert!(matches!(err, OrchestratorError::InvalidInput(ref m) if m == MISSING_CHAT_FIELDS));
        }

        assert!(brain.requests().is_empty());
        let transcript = orchestrator.transcript("user-1", Utc::now()).await.unwrap();
        assert!(transcript.messages.is_empty());
        assert_eq!(transcript.indicator, AssistantIndicator::Off);
    }

    #[tokio::test]
    async fn test_clear_history_is_scoped() {
        let (orchestrator, _) =
            setup(ScriptedBrain::replying("ok"), OrchestratorConfig::default()).await;

        orchestrator.chat("alice", "Oi").await.unwrap();
        orchestrator.chat("bob", "Oi").await.unwrap();

        let deleted = orchestrator.clear_history("alice").await.unwrap();
        assert_eq!(deleted, 2);

        let alice = orchestrator.transcript("alice", Utc::now()).await.unwrap();
        let bob = orchestrator.transcript("bob", Utc::now()).await.unwrap();
        assert!(alice.messages.is_empty());
        assert_eq!(bob.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_quick_reply_is_stateless() {
        let (orchestrator, brain) =
            setup(ScriptedBrain::replying("Foco!"), OrchestratorConfig::default()).await;

        let reply = orchestrator.quick_reply("Estou sem foco").await.unwrap();
        assert_eq!(reply, "Foco!");

        let request = brain.last_request().unwrap();
        assert_eq!(
            request,
            vec![
                ChatMessage::system(QUICK_SYSTEM_PROMPT),
                ChatMessage::user("Estou sem foco"),
            ]
        );

        assert!(matches!(
            orchestrator.quick_reply(" ").await,
            Err(OrchestratorError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_quick_reply_propagates_unusable_reply() {
        let (orchestrator, _) = setup(
            ScriptedBrain::failing(BrainError::EmptyReply),
            OrchestratorConfig::default(),
        )
        .await;

        assert!(matches!(
            orchestrator.quick_reply("Oi").await,
            Err(OrchestratorError::Brain(BrainError::EmptyReply))
        ));
    }
}
