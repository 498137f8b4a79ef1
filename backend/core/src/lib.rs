pub mod error;
pub mod fill;
pub mod types;

pub use error::{ParseFailure, RelayError, RelayResult};
pub use fill::{forward_fill, forward_fill_json, LineItemField, UnknownField, DEFAULT_FILL_FIELDS};
pub use types::{ExtractionOutcome, ExtractionResult, FieldValue, LineItem};
