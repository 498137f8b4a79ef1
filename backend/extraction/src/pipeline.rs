//! The full request flow: validate, resolve key, build, send, normalize.

use anyhow::{Context, Result};
use ocrelay_config::{api_key_chain, ConfigProvider, RelayConfig, SourceChain};
use ocrelay_core::{ExtractionOutcome, LineItemField, RelayError, RelayResult};
use ocrelay_logging::redact_secrets;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::builder::RequestBuilder;
use crate::client::{GeminiClient, GenerativeBackend};
use crate::mime::{effective_mime, is_image};
use crate::normalize::normalize;

/// One image in, one [`ExtractionOutcome`] out.
///
/// Holds only immutable state, so a single instance serves concurrent requests.
pub struct Extractor {
    builder: RequestBuilder,
    backend: Arc<dyn GenerativeBackend>,
    api_keys: SourceChain,
    fill_fields: Vec<LineItemField>,
}

impl Extractor {
    pub fn new(
        builder: RequestBuilder,
        backend: Arc<dyn GenerativeBackend>,
        api_keys: SourceChain,
        fill_fields: Vec<LineItemField>,
    ) -> Self {
        Self {
            builder,
            backend,
            api_keys,
            fill_fields,
        }
    }

    /// Wire up the Gemini client and key lookup described by `config`.
    pub fn from_config(config: &RelayConfig, env: Arc<dyn ConfigProvider>) -> Result<Self> {
        let client = GeminiClient::new(Duration::from_secs(config.gemini.timeout_secs))
            .context("Failed to build upstream HTTP client")?;
        let fill_fields = config.extraction.resolved_fill_fields()?;
        Ok(Self::new(
            RequestBuilder::from_config(&config.gemini),
            Arc::new(client),
            api_key_chain(config, env),
            fill_fields,
        ))
    }

    pub fn model(&self) -> &str {
        self.builder.model()
    }

    pub fn fill_fields(&self) -> &[LineItemField] {
        &self.fill_fields
    }

    /// Run one extraction.
    ///
    /// The image is checked before anything else, so an empty upload never
    /// reaches key resolution or the network.
    pub async fn extract(
        &self,
        image: &[u8],
        mime_type: Option<&str>,
    ) -> RelayResult<ExtractionOutcome> {
        if image.is_empty() {
            return Err(RelayError::MissingInput);
        }

        let api_key = self.api_keys.resolve().ok_or_else(|| {
            let keys: Vec<String> = self.api_keys.lookups().iter().map(|l| l.key.clone()).collect();
            error!(sources = ?keys, "No API key available");
            RelayError::Misconfiguration { keys }
        })?;

        let mime = effective_mime(mime_type);
        if !is_image(mime) {
            warn!(mime, "Upload is not labelled as an image; forwarding anyway");
        }

        let request = self.builder.build(image, Some(mime), &api_key)?;
        info!(
            backend = self.backend.name(),
            model = self.builder.model(),
            bytes = image.len(),
            mime,
            "Requesting extraction"
        );

        let response = self.backend.send(&request).await.map_err(|e| {
            error!(error = %redact_secrets(&e.to_string()), "HTTP request to upstream failed");
            e
        })?;

        if !response.is_success() {
            warn!(
                status = response.status,
                body = %redact_secrets(&response.body),
                "Upstream returned non-success"
            );
            return Err(RelayError::UpstreamError {
                status: response.status,
                body: response.body,
            });
        }

        debug!(status = response.status, bytes = response.body.len(), "Upstream replied");
        Ok(normalize(&response.body, &self.fill_fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{OutboundRequest, API_KEY_HEADER};
    use crate::client::UpstreamResponse;
    use crate::payload::Part;
    use async_trait::async_trait;
    use ocrelay_config::MapSource;
    use ocrelay_core::DEFAULT_FILL_FIELDS;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records requests and replays a canned reply.
    struct FakeBackend {
        reply: RelayResult<UpstreamResponse>,
        seen: Mutex<Vec<OutboundRequest>>,
    }

    impl FakeBackend {
        fn replying(status: u16, body: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(UpstreamResponse { status, body: body.into() }),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(RelayError::TransportFailure(message.to_string())),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GenerativeBackend for FakeBackend {
        fn name(&self) -> &str {
            "fake"
        }

        async fn send(&self, request: &OutboundRequest) -> RelayResult<UpstreamResponse> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(resp) => Ok(resp.clone()),
                Err(RelayError::TransportFailure(m)) => Err(RelayError::TransportFailure(m.clone())),
                Err(other) => panic!("unsupported fake reply: {other}"),
            }
        }
    }

    fn keys(pairs: &[(&str, &str)]) -> SourceChain {
        SourceChain::new()
            .with(Arc::new(MapSource::from_pairs(pairs)), "GEMINI_API_KEY")
            .with(Arc::new(MapSource::new()), "GoogleAI:ApiKey")
    }

    fn extractor(backend: Arc<FakeBackend>, keys: SourceChain) -> Extractor {
        Extractor::new(
            RequestBuilder::new("https://example.test", "gemini-1.5-flash"),
            backend,
            keys,
            DEFAULT_FILL_FIELDS.to_vec(),
        )
    }

    fn envelope_with(text: &str) -> String {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }).to_string()
    }

    #[tokio::test]
    async fn empty_image_never_reaches_upstream() {
        let backend = FakeBackend::replying(200, "{}");
        let ex = extractor(backend.clone(), keys(&[("GEMINI_API_KEY", "k")]));

        let err = ex.extract(&[], Some("image/png")).await.unwrap_err();
        assert!(matches!(err, RelayError::MissingInput));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn missing_key_is_misconfiguration() {
        let backend = FakeBackend::replying(200, "{}");
        let ex = extractor(backend.clone(), keys(&[]));

        let err = ex.extract(b"img", None).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Gemini API key is not configured. Set GEMINI_API_KEY or GoogleAI:ApiKey."
        );
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn sends_key_and_image_then_fills_result() {
        let text = json!({
            "vendorName": "Acme",
            "lineItems": [
                { "particulars": "Widget", "colour": "Red", "size": "" },
                { "particulars": "", "colour": "", "size": "M" },
                { "particulars": "Gadget", "colour": "", "size": "" }
            ]
        })
        .to_string();
        let backend = FakeBackend::replying(200, envelope_with(&text));
        let ex = extractor(backend.clone(), keys(&[("GEMINI_API_KEY", "AIza-env")]));

        let outcome = ex.extract(b"\x89PNG", Some("image/jpeg")).await.unwrap();

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].header(API_KEY_HEADER), Some("AIza-env"));
        assert_eq!(
            seen[0].url,
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert!(matches!(
            &seen[0].body.contents[0].parts[1],
            Part::InlineData { inline_data } if inline_data.mime_type == "image/jpeg"
        ));

        let ExtractionOutcome::Structured(result) = outcome else {
            panic!("expected structured outcome");
        };
        let items = &result.line_items;
        assert_eq!(items[1].particulars, Some("Widget".into()));
        assert_eq!(items[1].colour, Some("Red".into()));
        assert_eq!(items[1].size, Some("M".into()));
        assert_eq!(items[2].particulars, Some("Gadget".into()));
        assert_eq!(items[2].colour, Some("Red".into()));
        assert_eq!(items[2].size, Some("M".into()));
    }

    #[tokio::test]
    async fn upstream_status_and_body_are_forwarded() {
        let body = r#"{"error":{"code":429,"message":"Resource exhausted"}}"#;
        let backend = FakeBackend::replying(429, body);
        let ex = extractor(backend, keys(&[("GEMINI_API_KEY", "k")]));

        match ex.extract(b"img", None).await.unwrap_err() {
            RelayError::UpstreamError { status, body: forwarded } => {
                assert_eq!(status, 429);
                assert_eq!(forwarded, body);
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failures_propagate() {
        let backend = FakeBackend::failing("connection reset");
        let ex = extractor(backend.clone(), keys(&[("GEMINI_API_KEY", "k")]));

        let err = ex.extract(b"img", None).await.unwrap_err();
        assert!(matches!(err, RelayError::TransportFailure(ref m) if m == "connection reset"));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn non_json_model_output_degrades() {
        let envelope = envelope_with("I could not find an invoice.");
        let backend = FakeBackend::replying(200, envelope.clone());
        let ex = extractor(backend, keys(&[("GEMINI_API_KEY", "k")]));

        let outcome = ex.extract(b"img", None).await.unwrap();
        assert_eq!(
            outcome,
            ExtractionOutcome::Degraded {
                raw: "I could not find an invoice.".into(),
                full_response: envelope,
            }
        );
    }

    #[test]
    fn from_config_rejects_unknown_fill_fields() {
        let mut cfg = RelayConfig::default();
        cfg.extraction.fill_fields = vec!["shade".into()];
        assert!(Extractor::from_config(&cfg, Arc::new(MapSource::new())).is_err());
    }

    #[test]
    fn from_config_resolves_fill_columns() {
        let mut cfg = RelayConfig::default();
        let ex = Extractor::from_config(&cfg, Arc::new(MapSource::new())).unwrap();
        assert_eq!(ex.fill_fields(), DEFAULT_FILL_FIELDS);

        cfg.extraction.forward_fill = false;
        let ex = Extractor::from_config(&cfg, Arc::new(MapSource::new())).unwrap();
        assert!(ex.fill_fields().is_empty());
    }
}
