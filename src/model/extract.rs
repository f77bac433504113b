//! Pulls the generated text out of a `generateContent` response.
//!
//! Responses arrive either wrapped in a `response` object or flat, and older
//! payloads carry the text directly on `content`. Each known layout is a JSON
//! pointer tried in order; when none matches, the whole response is returned
//! pretty-printed so callers always get something displayable.

use log::debug;
use serde_json::Value;

const TEXT_POINTERS: [&str; 3] = [
    "/response/candidates/0/content/parts/0/text",
    "/candidates/0/content/parts/0/text",
    "/response/candidates/0/content/text",
];

/// Returns the first text found at a known location, or the serialized
/// response. Never fails.
pub fn extract_text(response: &Value) -> String {
    find_text(response).unwrap_or_else(|| {
        debug!("No text at any known location, returning the raw response");
        render_raw(response)
    })
}

fn find_text(response: &Value) -> Option<String> {
    TEXT_POINTERS
        .iter()
        .find_map(|pointer| response.pointer(pointer).and_then(Value::as_str))
        .map(str::to_string)
}

fn render_raw(response: &Value) -> String {
    serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string())
}
