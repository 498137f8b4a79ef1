use thiserror::Error;

/// Terminal failures of a single extraction request.
///
/// Malformed model output is deliberately absent: it is reported through
/// [`crate::ExtractionOutcome::Degraded`] rather than as an error.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Image file is required.")]
    MissingInput,

    /// `keys` lists every place the key was looked for, in lookup order.
    #[error("Gemini API key is not configured. Set {}.", .keys.join(" or "))]
    Misconfiguration { keys: Vec<String> },

    #[error("transport failure contacting upstream: {0}")]
    TransportFailure(String),

    #[error("upstream responded with status {status}")]
    UpstreamError { status: u16, body: String },
}

impl RelayError {
    /// Whether the caller (as opposed to the operator or upstream) can fix this.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RelayError::MissingInput)
    }
}

/// Candidate text that is not syntactically valid JSON.
#[derive(Debug, Error)]
#[error("candidate text is not valid JSON: {0}")]
pub struct ParseFailure(#[from] pub serde_json::Error);

pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misconfiguration_names_every_source() {
        let err = RelayError::Misconfiguration {
            keys: vec!["GEMINI_API_KEY".into(), "GoogleAI:ApiKey".into()],
        };
        assert_eq!(
            err.to_string(),
            "Gemini API key is not configured. Set GEMINI_API_KEY or GoogleAI:ApiKey."
        );
    }

    #[test]
    fn only_missing_input_is_a_client_error() {
        assert!(RelayError::MissingInput.is_client_error());
        assert!(!RelayError::TransportFailure("timed out".into()).is_client_error());
    }
}
