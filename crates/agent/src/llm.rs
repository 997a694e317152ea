use async_trait::async_trait;
use replyline_core::PipelineError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// One role-tagged message in a chat-completion request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: MessageRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: MessageRole::User, content: content.into() }
    }
}

/// The generative-model collaborator.
///
/// Implementations own transport, timeout, and provider details; every
/// failure mode (transport error, non-success status, missing choices,
/// empty content) surfaces as `PipelineError::ModelCall`. No retry
/// happens at this seam.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, PipelineError>;
}
