//! Outbound request construction. Pure data assembly, no I/O.

use base64::{engine::general_purpose::STANDARD, Engine};
use ocrelay_config::GeminiConfig;
use ocrelay_core::{RelayError, RelayResult};
use std::fmt;

use crate::mime::effective_mime;
use crate::payload::GenerateContentRequest;
use crate::prompt::EXTRACTION_PROMPT;

/// Header carrying the Gemini API key.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Everything needed to perform one `generateContent` call.
#[derive(Clone)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: GenerateContentRequest,
}

impl OutboundRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// Header values are secrets and the body is a large base64 blob.
impl fmt::Debug for OutboundRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundRequest")
            .field("url", &self.url)
            .field("headers", &self.headers.iter().map(|(n, _)| *n).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Builds `generateContent` requests for one model.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    model: String,
}

impl RequestBuilder {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &GeminiConfig) -> Self {
        Self::new(&config.base_url, &config.model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Assemble the request for one image.
    ///
    /// An empty image is refused with [`RelayError::MissingInput`].
    pub fn build(
        &self,
        image: &[u8],
        mime_type: Option<&str>,
        api_key: &str,
    ) -> RelayResult<OutboundRequest> {
        if image.is_empty() {
            return Err(RelayError::MissingInput);
        }
        let body = GenerateContentRequest::prompt_with_image(
            EXTRACTION_PROMPT,
            effective_mime(mime_type),
            STANDARD.encode(image),
        );
        Ok(OutboundRequest {
            url: self.endpoint(),
            headers: vec![(API_KEY_HEADER, api_key.to_string())],
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Part;

    fn builder() -> RequestBuilder {
        RequestBuilder::new("https://generativelanguage.googleapis.com/", "gemini-1.5-flash")
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        assert_eq!(
            builder().endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn builds_prompt_then_image() {
        let req = builder().build(b"\x89PNG", Some("image/jpeg"), "AIza-test").unwrap();
        assert_eq!(req.header("X-Goog-Api-Key"), Some("AIza-test"));

        let parts = &req.body.contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert!(matches!(&parts[0], Part::Text { text } if text == EXTRACTION_PROMPT));
        match &parts[1] {
            Part::InlineData { inline_data } => {
                assert_eq!(inline_data.mime_type, "image/jpeg");
                assert_eq!(inline_data.data, "iVBORw==");
            }
            other => panic!("expected inline data, got {other:?}"),
        }
        assert_eq!(req.body.generation_config.response_mime_type, "application/json");
    }

    #[test]
    fn missing_mime_defaults_to_png() {
        let req = builder().build(b"img", None, "k").unwrap();
        match &req.body.contents[0].parts[1] {
            Part::InlineData { inline_data } => assert_eq!(inline_data.mime_type, "image/png"),
            other => panic!("expected inline data, got {other:?}"),
        }
    }

    #[test]
    fn empty_image_is_refused() {
        assert!(matches!(
            builder().build(&[], Some("image/png"), "k"),
            Err(RelayError::MissingInput)
        ));
    }

    #[test]
    fn debug_output_hides_key() {
        let req = builder().build(b"img", None, "AIza-super-secret").unwrap();
        assert!(!format!("{req:?}").contains("super-secret"));
    }
}
