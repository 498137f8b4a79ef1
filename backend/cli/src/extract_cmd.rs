//! CLI Extract Command
//!
//! Runs the same pipeline as the HTTP endpoint against a local file.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::info;

use ocrelay_config::{ConfigProvider, RelayConfig};
use ocrelay_core::{ExtractionOutcome, RelayError};
use ocrelay_extraction::{detect_image_mime, Extractor};

pub async fn run(
    config: &RelayConfig,
    env: Arc<dyn ConfigProvider>,
    image: &Path,
    mime: Option<&str>,
) -> Result<()> {
    let bytes = fs::read(image)
        .await
        .with_context(|| format!("Could not read {}", image.display()))?;
    let mime = mime.or_else(|| detect_image_mime(image));
    info!(path = %image.display(), bytes = bytes.len(), mime = mime.unwrap_or("-"), "Extracting");

    let extractor = Extractor::from_config(config, env)?;
    let outcome = extractor.extract(&bytes, mime).await.map_err(describe)?;

    if let ExtractionOutcome::Degraded { .. } = &outcome {
        eprintln!("warning: model output was not valid JSON; printing raw response");
    }
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn describe(err: RelayError) -> anyhow::Error {
    match err {
        RelayError::UpstreamError { status, body } => {
            anyhow!("Gemini API error (HTTP {status}): {body}")
        }
        RelayError::TransportFailure(details) => anyhow!("Failed to call Gemini API: {details}"),
        other => anyhow!(other),
    }
}
