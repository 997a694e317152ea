use replyline_core::{PipelineError, StructuredFacts};
use serde_json::Value;

use crate::llm::{ChatMessage, LlmClient};

const EXTRACTION_SYSTEM_PROMPT: &str = "You extract structured fields from customer messages. \
     Return ONLY strict JSON and no extra text.";

/// Extracts structured facts from the flattened conversation context.
///
/// The model is held to a strict-JSON contract; a response with no
/// recoverable JSON object is a `ModelProtocol` error. Whatever JSON
/// shape does come back is normalized field by field and never fails.
pub async fn extract_facts(
    llm: &dyn LlmClient,
    context_text: &str,
) -> Result<StructuredFacts, PipelineError> {
    let instructions = format!(
        "Return ONLY JSON with keys: issue_type, location, trigger, urgency, \
         missing_information. If info is missing, set value to 'Not Available'. \
         If conflicting, mention conflict under missing_information as separate item. \
         missing_information must be an array of strings.\n\n\
         Input text: \"{context_text}\""
    );

    let messages =
        [ChatMessage::system(EXTRACTION_SYSTEM_PROMPT), ChatMessage::user(instructions)];

    let content = llm.complete(&messages).await?;
    let raw = recover_json_object(&content)?;
    Ok(StructuredFacts::from_value(&raw))
}

/// Parses strict JSON; if the object is wrapped in prose or markdown
/// fences, falls back to the first-`{`-to-last-`}` slice.
pub fn recover_json_object(text: &str) -> Result<Value, PipelineError> {
    let raw = text.trim();

    if let Ok(Value::Object(parsed)) = serde_json::from_str::<Value>(raw) {
        return Ok(Value::Object(parsed));
    }

    let start = raw.find('{');
    let end = raw.rfind('}');
    if let (Some(start), Some(end)) = (start, end) {
        if end > start {
            if let Ok(Value::Object(parsed)) = serde_json::from_str::<Value>(&raw[start..=end]) {
                return Ok(Value::Object(parsed));
            }
        }
    }

    Err(PipelineError::ModelProtocol("no JSON object in model response".to_owned()))
}
