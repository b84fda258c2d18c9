//! Parsing of free-form reasoning output into typed steps.
//!
//! Reasoning calls produce loosely structured text:
//!
//! ```text
//! Thought: <reasoning>
//! Action: <verb>
//! Action Input: <payload>
//! ```
//!
//! The scanner below extracts the three sections without validating
//! well-formedness: a missing label yields an empty field, never an
//! error, and each section may span multiple lines (it ends only at the
//! next known label or the end of the text).

use regex::Regex;

/// The labels recognized by the scanner, in canonical emission order.
const LABELS: [&str; 3] = ["Thought:", "Action:", "Action Input:"];

/// One parsed reasoning step. Ephemeral: held only for the current
/// loop iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReasoningStep {
    /// Free-text reasoning.
    pub thought: String,
    /// The action verb, matched against known verbs by the caller.
    pub action: String,
    /// Opaque payload whose grammar depends on the verb.
    pub action_input: String,
}

/// Extract thought/action/action-input sections from a reasoning blob.
pub fn parse_reasoning(text: &str) -> ReasoningStep {
    ReasoningStep {
        thought: section(text, "Thought:"),
        action: section(text, "Action:"),
        action_input: section(text, "Action Input:"),
    }
}

/// Content of the first occurrence of `label`, running until the next
/// known label or end of text. Empty when the label is absent.
fn section(text: &str, label: &str) -> String {
    let Some(start) = find_label(text, label) else {
        return String::new();
    };
    let content_start = start + label.len();

    // The section ends at the closest following label occurrence.
    let mut end = text.len();
    for other in LABELS {
        if let Some(pos) = find_label_from(text, other, content_start) {
            end = end.min(pos);
        }
    }

    text[content_start..end].trim().to_string()
}

fn find_label(text: &str, label: &str) -> Option<usize> {
    find_label_from(text, label, 0)
}

/// First occurrence of `label` at or after `from`.
fn find_label_from(text: &str, label: &str, from: usize) -> Option<usize> {
    text.get(from..)?.find(label).map(|rel| from + rel)
}

/// A recognized orchestrator verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    /// Terminate the loop. Carries the parenthesized payload when the
    /// model wrote `finish(<answer>)` instead of a bare `finish`.
    Finish(Option<String>),
    /// Dispatch one or more specialists.
    CallSpecialists,
    /// Anything else; fed back as a diagnostic observation.
    Other(String),
}

/// Classify an action string against the orchestrator verb set.
///
/// `finish` matches bare (case/whitespace-insensitive) or with a
/// parenthesized payload; the dispatch verb accepts several spellings
/// (`call_specialists`, `call_specialist`, `call_specialist()`, and any
/// `call_specialist...` prefix).
pub fn classify_verb(action: &str) -> Verb {
    let trimmed = action.trim();
    if trimmed.eq_ignore_ascii_case("finish") {
        return Verb::Finish(None);
    }
    if let Some(payload) = parenthesized(trimmed, "finish") {
        // "finish()" counts as bare: the answer is on the input line.
        return Verb::Finish((!payload.is_empty()).then_some(payload));
    }
    if trimmed.to_lowercase().starts_with("call_specialist") {
        return Verb::CallSpecialists;
    }
    Verb::Other(trimmed.to_string())
}

/// The effective payload of a `finish`, if the action is one.
pub fn finish_payload(action: &str, action_input: &str) -> Option<String> {
    match classify_verb(action) {
        Verb::Finish(Some(payload)) => Some(payload),
        Verb::Finish(None) => Some(action_input.to_string()),
        _ => None,
    }
}

/// The effective argument of a tool invocation, if the action names
/// `tool`. Models emit both `tool(<arg>)` and `Action: tool` with the
/// argument on the `Action Input:` line; both are accepted.
pub fn tool_argument(action: &str, action_input: &str, tool: &str) -> Option<String> {
    let trimmed = action.trim();
    if trimmed.eq_ignore_ascii_case(tool) {
        return Some(action_input.trim().to_string());
    }
    parenthesized(trimmed, tool)
}

/// Capture `<inner>` from `name(<inner>)`, case-insensitive, multi-line.
fn parenthesized(action: &str, name: &str) -> Option<String> {
    let pattern = format!(r"(?si)^{name}\(\s*(.*?)\s*\)$", name = regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    re.captures(action).map(|c| c[1].to_string())
}
