//! Projection of the upstream response envelope onto its candidate text.

use serde_json::Value;

/// Return `candidates[0].content.parts[0].text`, or the envelope itself when
/// it is not JSON or any step of that path is missing.
pub fn extract_candidate_text(envelope: &str) -> String {
    candidate_text(envelope).unwrap_or_else(|| envelope.to_string())
}

fn candidate_text(envelope: &str) -> Option<String> {
    let doc: Value = serde_json::from_str(envelope).ok()?;
    doc.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::to_owned)
}
