//! Upstream transport.

use async_trait::async_trait;
use ocrelay_core::{RelayError, RelayResult};
use std::time::Duration;
use tracing::{debug, info};

use crate::builder::OutboundRequest;

/// Status and body of an upstream reply, whatever the status.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can execute an [`OutboundRequest`].
///
/// Errors are reserved for transport failures; non-2xx replies are returned
/// as an [`UpstreamResponse`].
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, request: &OutboundRequest) -> RelayResult<UpstreamResponse>;
}

/// Gemini over HTTPS.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn send(&self, request: &OutboundRequest) -> RelayResult<UpstreamResponse> {
        info!(url = %request.url, "[Gemini] Sending generateContent request");
        let mut builder = self.http.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| RelayError::TransportFailure(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| RelayError::TransportFailure(e.to_string()))?;

        debug!(status, bytes = body.len(), "[Gemini] Response received");
        Ok(UpstreamResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::RequestBuilder;

    #[test]
    fn success_is_2xx_only() {
        let ok = UpstreamResponse { status: 200, body: String::new() };
        let redirect = UpstreamResponse { status: 302, body: String::new() };
        let denied = UpstreamResponse { status: 403, body: String::new() };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
        assert!(!denied.is_success());
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_failure() {
        let client = GeminiClient::new(Duration::from_secs(2)).unwrap();
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let request = RequestBuilder::new(format!("http://127.0.0.1:{port}"), "gemini-1.5-flash")
            .build(b"img", None, "k")
            .unwrap();
        let err = client.send(&request).await.unwrap_err();
        assert!(matches!(err, RelayError::TransportFailure(_)));
    }
}
