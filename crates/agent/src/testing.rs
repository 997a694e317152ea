use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use replyline_core::PipelineError;

use crate::llm::{ChatMessage, LlmClient, MessageRole};

/// Scripted `LlmClient` double: returns canned responses in order and
/// records every request for prompt assertions.
pub(crate) struct ScriptedClient {
    responses: Mutex<VecDeque<String>>,
    failure: Option<String>,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedClient {
    pub fn replies(replies: &[&str]) -> Self {
        Self {
            responses: Mutex::new(replies.iter().map(|r| (*r).to_owned()).collect()),
            failure: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            failure: Some(message.to_owned()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().map(|seen| seen.len()).unwrap_or(0)
    }

    pub fn last_user_prompt(&self) -> String {
        self.seen
            .lock()
            .ok()
            .and_then(|seen| {
                seen.last().and_then(|messages| {
                    messages
                        .iter()
                        .rev()
                        .find(|message| message.role == MessageRole::User)
                        .map(|message| message.content.clone())
                })
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, PipelineError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(messages.to_vec());
        }

        if let Some(message) = &self.failure {
            return Err(PipelineError::ModelCall(message.clone()));
        }

        self.responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front())
            .ok_or_else(|| PipelineError::ModelCall("scripted client exhausted".to_owned()))
    }
}
