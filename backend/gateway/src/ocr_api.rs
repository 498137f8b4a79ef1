//! Image upload endpoint (`POST /api/OcrProcess/image-to-json`).

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use ocrelay_core::{ExtractionOutcome, RelayError};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

struct ImageUpload {
    bytes: Bytes,
    content_type: Option<String>,
    file_name: Option<String>,
}

/// Handler for `POST /api/OcrProcess/image-to-json`.
///
/// A request that is not multipart at all is treated like one without an image.
pub async fn image_to_json(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractionOutcome>, ApiError> {
    let span = info_span!("image_to_json", request_id = %Uuid::new_v4());
    handle_upload(state, multipart).instrument(span).await
}

async fn handle_upload(
    state: GatewayState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractionOutcome>, ApiError> {
    let multipart = multipart.map_err(|rejection| {
        warn!(reason = %rejection, "Request is not a multipart upload");
        RelayError::MissingInput
    })?;

    let upload = read_image(multipart).await?.ok_or(RelayError::MissingInput)?;
    info!(
        bytes = upload.bytes.len(),
        content_type = upload.content_type.as_deref().unwrap_or("-"),
        file_name = upload.file_name.as_deref().unwrap_or("-"),
        "Received image upload"
    );

    let outcome = state
        .extractor
        .extract(&upload.bytes, upload.content_type.as_deref())
        .await?;
    if outcome.is_degraded() {
        info!("Returning raw model output");
    }
    Ok(Json(outcome))
}

/// Pull the first `image` field out of the form, skipping any others.
async fn read_image(mut multipart: Multipart) -> Result<Option<ImageUpload>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_owned);
        let file_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await?;
        return Ok(Some(ImageUpload {
            bytes,
            content_type,
            file_name,
        }));
    }
    Ok(None)
}
