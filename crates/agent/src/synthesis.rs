use replyline_core::conversation::{transcript, Utterance};
use replyline_core::{PipelineError, StructuredFacts};

use crate::llm::{ChatMessage, LlmClient};

const SYNTHESIS_SYSTEM_PROMPT: &str = "You are a professional support assistant. Maintain topic continuity across turns, \
     avoid repeating previously asked questions, and respond naturally in client-friendly \
     language. Do not invent facts, completed actions, or guarantees. Keep follow-up \
     questions specific and minimal.";

/// Drafts the candidate reply from the bounded conversation, the
/// latest user message, and the extracted facts.
///
/// The facts are passed as machine-readable context only; the prompt
/// marks them as not for display. The draft goes to the guardrail
/// rewriter before anything reaches the user.
pub async fn draft_reply(
    llm: &dyn LlmClient,
    history: &[Utterance],
    latest_message: &str,
    facts: &StructuredFacts,
) -> Result<String, PipelineError> {
    let transcript = transcript(history);
    let structured_json = facts.render();

    let instructions = format!(
        "Use the conversation and latest message to craft the next assistant reply.\n\
         Requirements:\n\
         1) Acknowledge the latest user message naturally.\n\
         2) Continue from prior context; do not reset the conversation.\n\
         3) Do not repeat questions already asked unless absolutely necessary.\n\
         4) Ask only relevant follow-up questions still needed.\n\
         5) Provide safe next steps without guarantees.\n\
         6) Avoid technical jargon and keep it concise.\n\
         7) Return only assistant reply text.\n\n\
         Conversation history:\n{transcript}\n\n\
         Latest user message: {latest_message}\n\n\
         Internal structured extraction (not for display): {structured_json}"
    );

    let messages = [ChatMessage::system(SYNTHESIS_SYSTEM_PROMPT), ChatMessage::user(instructions)];
    llm.complete(&messages).await
}

#[cfg(test)]
mod tests {
    use replyline_core::conversation::normalize_history;
    use replyline_core::{PipelineError, StructuredFacts};
    use serde_json::json;

    use super::draft_reply;
    use crate::testing::ScriptedClient;

    fn sample_facts() -> StructuredFacts {
        StructuredFacts::from_value(&json!({ "issue_type": "water leak" }))
    }

    #[tokio::test]
    async fn prompt_includes_transcript_latest_message_and_facts() {
        let llm = ScriptedClient::replies(&["Thanks, let me look into that."]);
        let history = normalize_history(
            &[json!({ "role": "user", "content": "my sink leaks" })],
            10,
        );

        let draft = draft_reply(&llm, &history, "it got worse", &sample_facts())
            .await
            .unwrap_or_else(|err| panic!("synthesis should succeed: {err}"));
        assert_eq!(draft, "Thanks, let me look into that.");

        let prompt = llm.last_user_prompt();
        assert!(prompt.contains("User: my sink leaks"));
        assert!(prompt.contains("Latest user message: it got worse"));
        assert!(prompt.contains("not for display"));
        assert!(prompt.contains("water leak"));
    }

    #[tokio::test]
    async fn empty_history_uses_the_fixed_placeholder() {
        let llm = ScriptedClient::replies(&["Hello!"]);

        let _ = draft_reply(&llm, &[], "hi", &sample_facts()).await;
        assert!(llm.last_user_prompt().contains("No prior conversation."));
    }

    #[tokio::test]
    async fn model_failure_surfaces_without_retry() {
        let llm = ScriptedClient::failing("timeout");

        let result = draft_reply(&llm, &[], "hi", &sample_facts()).await;
        assert!(matches!(result, Err(PipelineError::ModelCall(_))));
        assert_eq!(llm.calls(), 1);
    }
}
