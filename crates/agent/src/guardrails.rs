//! Deterministic post-processing of drafted replies.
//!
//! Two layers: a lexical pass that softens guarantee language, and a
//! sentence-level pass that drops resolution claims the conversation
//! does not corroborate. `apply` is total: it returns a non-empty
//! string for any input, so it can never be the failing stage.

use once_cell::sync::Lazy;
use regex::Regex;
use replyline_core::StructuredFacts;

/// Returned when the model produced an empty or whitespace-only draft.
pub const EMPTY_DRAFT_FALLBACK: &str = "Thanks for sharing that. Based on what you described, an inspection may help \
     confirm the exact cause and guide the next step.";

/// Returned when every sentence of the draft was an uncorroborated
/// resolution claim. Distinct wording from the empty-draft fallback.
pub const CLAIMS_REMOVED_FALLBACK: &str = "Thanks for the update. An inspection may help confirm the exact cause and \
     the most suitable next step.";

/// Ordered softening table. Rules run over the full text in sequence,
/// so a later rule may transform the output of an earlier one; no
/// rule re-triggers on its own replacement text.
static SOFTENING_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (
            r"(?i)\bi cannot guarantee an outcome until the team verifies the details\.?",
            "An inspection may help confirm the exact cause.",
        ),
        (
            r"(?i)\bi can't guarantee an outcome until the team verifies the details\.?",
            "An inspection may help confirm the exact cause.",
        ),
        (r"(?i)\bguaranteed\b", "committed"),
        (r"(?i)\bguarantees\b", "commits"),
        (r"(?i)\bguarantee\b", "commit"),
        (r"(?i)\bdefinitely\b", "likely"),
        (r"(?i)\bfor sure\b", "as appropriate"),
        (r"(?i)\b100%", "to the best of our assessment"),
        (r"(?i)\bwill be fixed\b", "can be investigated and addressed"),
        (r"(?i)\bis fixed\b", "appears to be addressed"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        let regex = Regex::new(pattern)
            .unwrap_or_else(|err| panic!("invalid softening pattern `{pattern}`: {err}"));
        (regex, replacement)
    })
    .collect()
});

/// Phrases asserting a completed resolution action. A sentence
/// containing one is dropped unless the evidence blob also contains
/// one (case-insensitive substring match).
const RISKY_MARKERS: [&str; 6] = [
    "already resolved",
    "issue has been fixed",
    "we fixed",
    "refund has been issued",
    "technician has been dispatched",
    "your case is closed",
];

/// Rewrites a drafted reply into the final, policy-safe reply.
///
/// Never returns an empty string, whatever the input.
pub fn apply(draft: &str, context_blob: &str, facts: &StructuredFacts) -> String {
    let cleaned = draft.trim();
    if cleaned.is_empty() {
        return EMPTY_DRAFT_FALLBACK.to_owned();
    }

    // Facts count as evidence too: upstream-confirmed claims may be
    // recorded there rather than in the raw conversation.
    let evidence = format!("{context_blob}\n{}", facts.render());

    let softened = soften_guarantees(cleaned);
    let filtered = remove_unverified_claims(&softened, &evidence);

    if filtered.is_empty() {
        CLAIMS_REMOVED_FALLBACK.to_owned()
    } else {
        filtered
    }
}

/// Applies the ordered softening table to the whole text.
pub fn soften_guarantees(text: &str) -> String {
    let mut sanitized = text.to_owned();
    for (pattern, replacement) in SOFTENING_RULES.iter() {
        sanitized = pattern.replace_all(&sanitized, *replacement).into_owned();
    }
    sanitized
}

/// Heuristic sentence boundary detector: splits after `.`, `!`, or `?`
/// followed by whitespace. Not a sentence grammar; abbreviations and
/// decimals are known edge cases and stay out of the corroboration
/// logic on purpose.
pub fn split_sentences(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = trimmed.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let Some(&(_, next)) = chars.peek() else { continue };
        if !next.is_whitespace() {
            continue;
        }

        sentences.push(trimmed[start..index + ch.len_utf8()].to_owned());
        while chars.peek().is_some_and(|&(_, w)| w.is_whitespace()) {
            chars.next();
        }
        start = chars.peek().map_or(trimmed.len(), |&(rest, _)| rest);
    }

    if start < trimmed.len() {
        sentences.push(trimmed[start..].to_owned());
    }
    sentences
}

/// Drops risky sentences unless the evidence blob corroborates them.
///
/// Known looseness, kept on purpose: any marker present in the
/// evidence corroborates any risky sentence, not just sentences
/// carrying the same marker.
fn remove_unverified_claims(text: &str, evidence: &str) -> String {
    let evidence_lower = evidence.to_lowercase();
    let evidence_corroborates =
        RISKY_MARKERS.iter().any(|marker| evidence_lower.contains(marker));

    let surviving: Vec<String> = split_sentences(text)
        .into_iter()
        .filter(|sentence| {
            let sentence_lower = sentence.to_lowercase();
            let risky = RISKY_MARKERS.iter().any(|marker| sentence_lower.contains(marker));
            !risky || evidence_corroborates
        })
        .collect();

    surviving.join(" ").trim().to_owned()
}
