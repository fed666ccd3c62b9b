//! Strict extraction of structured data from free-form judge output.
//!
//! Judge text is never evaluated. The first well-formed JSON object or array found
//! in the text wins; anything else is a typed `ParseError`.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("No JSON found")]
    NoJson,

    #[error("Malformed JSON")]
    Malformed,
}

/// Removes every ```json / ``` fence marker, wherever the model put them.
fn strip_json_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Returns the first JSON object that parses cleanly, or failing that the first
/// array.
///
/// Prose before or after the value is ignored, so a bracketed aside such as `[1]`
/// never shadows a later object. A `{` or `[` that does not start a valid value is
/// skipped and the scan continues.
pub fn extract_json_block(text: &str) -> Result<Value, ParseError> {
    let cleaned = strip_json_fences(text);
    if !cleaned.contains(['{', '[']) {
        return Err(ParseError::NoJson);
    }

    first_value_opening_with(&cleaned, '{')
        .or_else(|| first_value_opening_with(&cleaned, '['))
        .ok_or(ParseError::Malformed)
}

fn first_value_opening_with(text: &str, open: char) -> Option<Value> {
    text.char_indices()
        .filter(|(_, ch)| *ch == open)
        .find_map(|(idx, _)| {
            let mut stream = serde_json::Deserializer::from_str(&text[idx..]).into_iter::<Value>();
            stream.next().and_then(Result::ok)
        })
}
