//! Turning an upstream envelope into an [`ExtractionOutcome`].

use ocrelay_core::{
    forward_fill, forward_fill_json, ExtractionOutcome, ExtractionResult, LineItemField,
    ParseFailure,
};
use ocrelay_logging::redact_secrets;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::envelope::extract_candidate_text;

/// Parse candidate text; any syntactically valid JSON succeeds.
///
/// Schema-shaped objects come back as [`ExtractionOutcome::Structured`],
/// everything else as [`ExtractionOutcome::Passthrough`]. Nothing is filled yet.
pub fn try_parse_result(candidate_text: &str) -> Result<ExtractionOutcome, ParseFailure> {
    let value: Value = serde_json::from_str(candidate_text)?;
    match ExtractionResult::deserialize(&value) {
        Ok(result) => Ok(ExtractionOutcome::Structured(result)),
        Err(e) => {
            debug!(error = %e, "Model JSON does not fit the record schema; passing it through");
            Ok(ExtractionOutcome::Passthrough(value))
        }
    }
}

/// Extract, parse and forward-fill; unparseable output degrades to the raw texts.
pub fn normalize(envelope: &str, fill_fields: &[LineItemField]) -> ExtractionOutcome {
    let candidate = extract_candidate_text(envelope);
    match try_parse_result(&candidate) {
        Ok(ExtractionOutcome::Structured(mut result)) => {
            forward_fill(&mut result.line_items, fill_fields);
            debug!(line_items = result.line_items.len(), "Parsed model output");
            ExtractionOutcome::Structured(result)
        }
        Ok(ExtractionOutcome::Passthrough(mut value)) => {
            if let Some(rows) = value.get_mut("lineItems").and_then(Value::as_array_mut) {
                forward_fill_json(rows, fill_fields);
            }
            ExtractionOutcome::Passthrough(value)
        }
        Ok(degraded @ ExtractionOutcome::Degraded { .. }) => degraded,
        Err(failure) => {
            warn!(
                error = %failure,
                candidate = %redact_secrets(&candidate),
                "Model output is not valid JSON; returning raw text"
            );
            ExtractionOutcome::Degraded {
                raw: candidate,
                full_response: envelope.to_string(),
            }
        }
    }
}
