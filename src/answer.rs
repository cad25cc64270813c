// Answer Module
// The canned completion text and the per-request override.

/// Default answer returned when the request does not supply one.
pub const DEFAULT_ANSWER: &str = concat!(
    "As an AI, I don't have personal beliefs or feelings. ",
    "However, many people have different interpretations of the meaning of life. ",
    "Some believe it's to pursue happiness, knowledge, or spiritual enlightenment, ",
    "whereas others might say it's to create meaningful connections with others. ",
    "Ultimately, the meaning of life might be a deeply personal and subjective concept.",
);

/// Resolve the answer content for a request.
///
/// A present but empty `answer` falls back to the default, matching the
/// original truthiness semantics of the API.
pub fn resolve_answer(answer: Option<&str>) -> String {
    match answer {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => DEFAULT_ANSWER.to_string(),
    }
}
