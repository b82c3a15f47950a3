//! Presentation layer for review-reply
//!
//! This crate contains the HTTP surface and the CLI definitions.

pub mod cli;
pub mod http;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use http::{ApiError, AppState, build_router, serve};
