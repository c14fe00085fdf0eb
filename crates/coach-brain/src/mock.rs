//! Scripted completion gateway for tests.
//!
//! Enabled with the `mock` feature.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api_types::ChatMessage;
use crate::brain::CompletionGateway;
use crate::error::BrainError;

/// A gateway that replays queued results and records every request.
///
/// Queued results are consumed in order; once the queue is empty every call
/// returns the default result.
#[derive(Debug)]
pub struct ScriptedBrain {
    queue: Mutex<VecDeque<Result<String, BrainError>>>,
    default: Result<String, BrainError>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedBrain {
    /// Always reply with the given text.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_default(Ok(text.into()))
    }

    /// Always fail with the given error.
    pub fn failing(error: BrainError) -> Self {
        Self::with_default(Err(error))
    }

    fn with_default(default: Result<String, BrainError>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            default,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a result ahead of the default.
    pub fn then(self, result: Result<String, BrainError>) -> Self {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(result);
        }
        self
    }

    /// Every message list received so far.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// The most recent message list, if any.
    pub fn last_request(&self) -> Option<Vec<ChatMessage>> {
        self.requests().pop()
    }
}

#[async_trait]
impl CompletionGateway for ScriptedBrain {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, BrainError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages);
        }

        let queued = self.queue.lock().ok().and_then(|mut queue| queue.pop_front());
        queued.unwrap_or_else(|| self.default.clone())
    }

    fn name(&self) -> &str {
        "ScriptedBrain"
    }
}
