//! ocrelay Gateway HTTP API Server
//!
//! Accepts invoice images and answers with the extracted JSON.

pub mod error;
pub mod health_api;
pub mod ocr_api;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState};
