//! Invoice extraction through Gemini.
//!
//! Builds the `generateContent` request for an uploaded image, sends it, and
//! normalizes the reply into an [`ocrelay_core::ExtractionOutcome`].

pub mod builder;
pub mod client;
pub mod envelope;
pub mod mime;
pub mod normalize;
pub mod payload;
pub mod pipeline;
pub mod prompt;

pub use builder::{OutboundRequest, RequestBuilder, API_KEY_HEADER};
pub use client::{GeminiClient, GenerativeBackend, UpstreamResponse};
pub use envelope::extract_candidate_text;
pub use mime::{detect_image_mime, effective_mime, DEFAULT_IMAGE_MIME};
pub use normalize::{normalize, try_parse_result};
pub use pipeline::Extractor;
pub use prompt::EXTRACTION_PROMPT;
