use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::NOT_AVAILABLE;

/// Machine-extracted summary of the customer's inquiry.
///
/// Built fresh per request and never shown to the end user directly.
/// Every scalar field is a non-empty string and `missing_information`
/// is a non-empty list of non-empty strings; fields that cannot be
/// determined hold the `"Not Available"` sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredFacts {
    pub issue_type: String,
    pub location: String,
    pub trigger: String,
    pub urgency: String,
    pub missing_information: Vec<String>,
}

impl StructuredFacts {
    /// Normalizes whatever JSON the model returned into a well-formed
    /// record. Total over any `Value`: wrong types, missing keys, and
    /// null fields all degrade to the sentinel rather than failing.
    pub fn from_value(raw: &Value) -> Self {
        let object = raw.as_object();
        let field = |key: &str| {
            normalize_text_field(object.and_then(|map| map.get(key)))
        };

        Self {
            issue_type: field("issue_type"),
            location: field("location"),
            trigger: field("trigger"),
            urgency: field("urgency"),
            missing_information: normalize_missing_information(
                object.and_then(|map| map.get("missing_information")),
            ),
        }
    }

    /// Compact JSON rendering, used both as prompt context and as part
    /// of the guardrail evidence blob.
    pub fn render(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| NOT_AVAILABLE.to_owned())
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_owned()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn normalize_text_field(value: Option<&Value>) -> String {
    match value.and_then(scalar_text) {
        Some(text) if !text.is_empty() => text,
        _ => NOT_AVAILABLE.to_owned(),
    }
}

fn normalize_missing_information(value: Option<&Value>) -> Vec<String> {
    let sentinel = || vec![NOT_AVAILABLE.to_owned()];
    let Some(value) = value else { return sentinel() };

    match value {
        Value::String(text) => {
            let cleaned = text.trim();
            if cleaned.is_empty() {
                sentinel()
            } else {
                vec![cleaned.to_owned()]
            }
        }
        Value::Array(items) => {
            let cleaned: Vec<String> = items
                .iter()
                .filter_map(scalar_text)
                .filter(|item| !item.is_empty())
                .collect();
            if cleaned.is_empty() {
                sentinel()
            } else {
                cleaned
            }
        }
        _ => sentinel(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::StructuredFacts;
    use crate::NOT_AVAILABLE;

    #[test]
    fn well_formed_extraction_passes_through() {
        let facts = StructuredFacts::from_value(&json!({
            "issue_type": "water leak",
            "location": "kitchen",
            "trigger": "burst hose",
            "urgency": "high",
            "missing_information": ["warranty status"],
        }));

        assert_eq!(facts.issue_type, "water leak");
        assert_eq!(facts.missing_information, vec!["warranty status"]);
    }

    #[test]
    fn blank_and_null_fields_collapse_to_the_sentinel() {
        let facts = StructuredFacts::from_value(&json!({
            "issue_type": "",
            "location": null,
            "trigger": "   ",
            "missing_information": null,
        }));

        assert_eq!(facts.issue_type, NOT_AVAILABLE);
        assert_eq!(facts.location, NOT_AVAILABLE);
        assert_eq!(facts.trigger, NOT_AVAILABLE);
        assert_eq!(facts.urgency, NOT_AVAILABLE);
        assert_eq!(facts.missing_information, vec![NOT_AVAILABLE]);
    }

    #[test]
    fn wrong_types_never_panic() {
        let facts = StructuredFacts::from_value(&json!({
            "issue_type": ["not", "a", "string"],
            "location": { "nested": true },
            "trigger": 7,
            "urgency": true,
            "missing_information": { "oops": 1 },
        }));

        assert_eq!(facts.issue_type, NOT_AVAILABLE);
        assert_eq!(facts.location, NOT_AVAILABLE);
        assert_eq!(facts.trigger, "7");
        assert_eq!(facts.urgency, "true");
        assert_eq!(facts.missing_information, vec![NOT_AVAILABLE]);
    }

    #[test]
    fn non_object_input_yields_the_all_sentinel_record() {
        let facts = StructuredFacts::from_value(&json!("just a string"));

        assert_eq!(facts.issue_type, NOT_AVAILABLE);
        assert_eq!(facts.missing_information, vec![NOT_AVAILABLE]);
    }

    #[test]
    fn missing_information_accepts_a_single_string() {
        let facts = StructuredFacts::from_value(&json!({
            "missing_information": "  model number  ",
        }));
        assert_eq!(facts.missing_information, vec!["model number"]);
    }

    #[test]
    fn missing_information_drops_blank_entries_and_collapses_empty_lists() {
        let facts = StructuredFacts::from_value(&json!({
            "missing_information": ["", "  ", "serial number", null],
        }));
        assert_eq!(facts.missing_information, vec!["serial number"]);

        let empty = StructuredFacts::from_value(&json!({ "missing_information": [] }));
        assert_eq!(empty.missing_information, vec![NOT_AVAILABLE]);
    }

    #[test]
    fn render_is_compact_json_with_all_fields() {
        let facts = StructuredFacts::from_value(&json!({}));
        let rendered = facts.render();
        assert!(rendered.contains("\"issue_type\":\"Not Available\""));
        assert!(rendered.contains("\"missing_information\":[\"Not Available\"]"));
    }
}
