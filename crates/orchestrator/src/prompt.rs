//! System prompt assembly.

use coach_brain::ChatMessage;
use coach_database::{Message, UserProfile};

/// Base coach instruction, prepended to every chat turn.
pub const BASE_SYSTEM_PROMPT: &str = "Você é um coach pessoal que ajuda o usuário, focando em \
gerenciamento diário, planos de treino, estudo e etc. Mas pode ir ajudando o usuário conforme a \
necessidade dele.";

/// Instruction used for stateless one-shot replies.
pub const QUICK_SYSTEM_PROMPT: &str = "Você é um coach pessoal que ajuda o usuário a manter o \
foco nas metas de saúde, produtividade e aprendizado.";

/// Closing line of the personalization block.
pub const PERSONALIZATION_FOOTER: &str =
    "Seja empático e personalize as respostas com base nessas informações.";

/// Placeholder for an absent profile field.
pub const NOT_INFORMED: &str = "não informado";

/// Placeholder for absent goals.
pub const NO_GOALS: &str = "nenhuma meta definida";

/// Reply persisted when the completion service answers with something unusable.
pub const FALLBACK_REPLY: &str = "Desculpe, não consegui gerar uma resposta.";

/// Build the system prompt for a user.
///
/// The personalization block is always present; a missing profile renders
/// every field with its placeholder.
pub fn build_system_prompt(profile: Option<&UserProfile>) -> String {
    let field = |value: Option<String>| value.unwrap_or_else(|| NOT_INFORMED.to_string());
    let text = |value: Option<&String>| {
        value
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let age = field(profile.and_then(|p| p.age).map(|age| age.to_string()));
    let weight = field(profile.and_then(|p| p.weight).map(|weight| weight.to_string()));
    let gender = field(profile.and_then(|p| text(p.gender.as_ref())));
    let student = field(
        profile
            .and_then(|p| p.is_student)
            .map(|studying| if studying { "Sim" } else { "Não" }.to_string()),
    );
    let preferences = field(
        profile
            .filter(|p| !p.preferences.is_empty())
            .map(|p| p.preferences.join(", ")),
    );
    let focus = field(profile.and_then(|p| p.focus).map(|focus| focus.label().to_string()));
    let priority = field(profile.and_then(|p| text(p.priority.as_ref())));
    let goals = profile
        .and_then(|p| text(p.goals.as_ref()))
        .unwrap_or_else(|| NO_GOALS.to_string());

    format!(
        "{BASE_SYSTEM_PROMPT}\n\
         Usuário:\n\
         - Idade: {age}\n\
         - Peso: {weight}\n\
         - Sexo: {gender}\n\
         - Estuda: {student}\n\
         - Preferências: {preferences}\n\
         - Foco: {focus}\n\
         - Prioridade: {priority}\n\
         - Metas: {goals}\n\
         {PERSONALIZATION_FOOTER}"
    )
}

/// Build the completion request: system prompt followed by the stored history.
pub fn build_messages(profile: Option<&UserProfile>, history: &[Message]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(build_system_prompt(profile)));
    messages.extend(
        history
            .iter()
            .map(|msg| ChatMessage::new(msg.role.as_str(), msg.content.clone())),
    );
    messages
}
