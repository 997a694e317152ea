use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fallback transcript shown to the model when no history survives
/// normalization.
pub const NO_PRIOR_CONVERSATION: &str = "No prior conversation.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// One turn of conversation, immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub role: Speaker,
    pub content: String,
}

impl Utterance {
    /// Builds a turn from one loosely-typed history record.
    ///
    /// Returns `None` for anything that is not a `{role, content}`
    /// object with a recognized role and non-blank content.
    pub fn from_record(record: &Value) -> Option<Self> {
        let object = record.as_object()?;
        let role = Speaker::parse(object.get("role")?.as_str()?)?;
        let content = object.get("content")?.as_str()?.trim();
        if content.is_empty() {
            return None;
        }
        Some(Self { role, content: content.to_owned() })
    }
}

pub type Conversation = Vec<Utterance>;

/// Sanitizes raw history records into the bounded conversation window.
///
/// Malformed records degrade to fewer retained turns, never to an
/// error. Relative order is preserved; only the most recent `window`
/// surviving turns are kept.
pub fn normalize_history(records: &[Value], window: usize) -> Conversation {
    let mut turns: Vec<Utterance> =
        records.iter().filter_map(Utterance::from_record).collect();
    if turns.len() > window {
        turns.drain(..turns.len() - window);
    }
    turns
}

/// Flattens the conversation plus the latest user message into the
/// textual projection used both as model input and as guardrail
/// evidence.
pub fn context_blob(history: &[Utterance], latest_message: &str) -> String {
    let mut lines: Vec<String> =
        history.iter().map(|turn| format!("{}: {}", turn.role.as_str(), turn.content)).collect();
    lines.push(format!("user: {latest_message}"));
    lines.join("\n")
}

/// Renders the conversation as a speaker-labeled transcript for the
/// reply prompt.
pub fn transcript(history: &[Utterance]) -> String {
    if history.is_empty() {
        return NO_PRIOR_CONVERSATION.to_owned();
    }
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role.label(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{context_blob, normalize_history, transcript, Speaker, Utterance};

    fn record(role: &str, content: &str) -> Value {
        json!({ "role": role, "content": content })
    }

    #[test]
    fn malformed_records_are_dropped_without_error() {
        let records = vec![
            json!("not an object"),
            json!({ "role": "user" }),
            json!({ "content": "no role" }),
            json!({ "role": 42, "content": "numeric role" }),
            json!({ "role": "system", "content": "wrong speaker" }),
            record("user", "   "),
            record("user", "kept"),
        ];

        let turns = normalize_history(&records, 10);
        assert_eq!(
            turns,
            vec![Utterance { role: Speaker::User, content: "kept".to_owned() }]
        );
    }

    #[test]
    fn role_is_case_insensitive_and_content_is_trimmed() {
        let records = vec![record("  Assistant ", "  hello there  ")];
        let turns = normalize_history(&records, 10);
        assert_eq!(turns[0].role, Speaker::Assistant);
        assert_eq!(turns[0].content, "hello there");
    }

    #[test]
    fn history_is_bounded_to_the_most_recent_window() {
        let records: Vec<Value> =
            (0..15).map(|i| record("user", &format!("turn {i}"))).collect();

        let turns = normalize_history(&records, 10);
        assert_eq!(turns.len(), 10);
        assert_eq!(turns.first().map(|t| t.content.as_str()), Some("turn 5"));
        assert_eq!(turns.last().map(|t| t.content.as_str()), Some("turn 14"));
    }

    #[test]
    fn invalid_records_do_not_count_against_the_window() {
        let mut records: Vec<Value> =
            (0..12).map(|i| record("user", &format!("turn {i}"))).collect();
        records.insert(0, json!({ "role": "bot", "content": "dropped" }));

        let turns = normalize_history(&records, 10);
        assert_eq!(turns.len(), 10);
        assert_eq!(turns.first().map(|t| t.content.as_str()), Some("turn 2"));
    }

    #[test]
    fn context_blob_appends_the_latest_message_as_user() {
        let history = normalize_history(
            &[record("user", "my sink leaks"), record("assistant", "since when?")],
            10,
        );

        let blob = context_blob(&history, "since Tuesday");
        assert_eq!(blob, "user: my sink leaks\nassistant: since when?\nuser: since Tuesday");
    }

    #[test]
    fn transcript_labels_speakers_and_falls_back_when_empty() {
        let history = normalize_history(
            &[record("user", "hello"), record("assistant", "hi")],
            10,
        );
        assert_eq!(transcript(&history), "User: hello\nAssistant: hi");
        assert_eq!(transcript(&[]), "No prior conversation.");
    }
}
