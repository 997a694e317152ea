use std::sync::Arc;

use replyline_core::conversation::{context_blob, normalize_history, Utterance};
use replyline_core::{PipelineError, StructuredFacts};
use serde_json::Value;

use crate::llm::LlmClient;
use crate::{extraction, guardrails, synthesis};

/// Per-request orchestrator: normalize → extract → draft → rewrite.
///
/// Holds nothing mutable across requests, so one runtime is shared
/// behind `Arc` and pipelines for concurrent requests run
/// independently.
pub struct AgentRuntime {
    llm: Arc<dyn LlmClient>,
    history_window: usize,
}

impl AgentRuntime {
    pub fn new(llm: Arc<dyn LlmClient>, history_window: usize) -> Self {
        Self { llm, history_window }
    }

    /// Produces the final, guardrail-rewritten reply for one request.
    ///
    /// A blank latest message is rejected before any model call. The
    /// two model stages can fail; the guardrail rewrite cannot, so a
    /// successful return is always a non-empty reply.
    pub async fn respond(
        &self,
        history: &[Value],
        latest_message: &str,
    ) -> Result<String, PipelineError> {
        let latest = latest_message.trim();
        if latest.is_empty() {
            return Err(PipelineError::MalformedRequest("message cannot be empty".to_owned()));
        }

        let conversation = normalize_history(history, self.history_window);
        let context = context_blob(&conversation, latest);

        let facts = extraction::extract_facts(self.llm.as_ref(), &context).await?;
        synthesize_reply(self.llm.as_ref(), &conversation, latest, &facts).await
    }
}

/// Chains reply synthesis with the guardrail rewrite.
///
/// Only the synthesis model call can fail here; the rewrite is total.
pub async fn synthesize_reply(
    llm: &dyn LlmClient,
    conversation: &[Utterance],
    latest_message: &str,
    facts: &StructuredFacts,
) -> Result<String, PipelineError> {
    let draft = synthesis::draft_reply(llm, conversation, latest_message, facts).await?;
    let context = context_blob(conversation, latest_message);
    Ok(guardrails::apply(&draft, &context, facts))
}
